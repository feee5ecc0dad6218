//! Ledger primitives: the append-only transaction log and the balance
//! mutation helpers composed by every money-moving operation.

mod model;
mod service;

pub use model::*;
pub use service::*;
