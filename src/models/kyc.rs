//! KYC document models
//!
//! Documents are a tagged union over the accepted kinds, each with fixed
//! front/back/selfie URL fields, stored as JSONB. The shape is closed: an
//! unknown kind fails deserialization instead of being carried around as an
//! untyped map.

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// A KYC identity document. The `kind` tag selects the variant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KycDocument {
    DriversLicense {
        front_url: String,
        back_url: String,
        selfie_url: String,
    },
    NationalId {
        front_url: String,
        back_url: String,
        selfie_url: String,
    },
    Passport {
        front_url: String,
        back_url: String,
        selfie_url: String,
    },
    VotersCard {
        front_url: String,
        back_url: String,
        selfie_url: String,
    },
}

impl KycDocument {
    /// Human-readable document kind
    pub fn kind(&self) -> &'static str {
        match self {
            KycDocument::DriversLicense { .. } => "drivers_license",
            KycDocument::NationalId { .. } => "national_id",
            KycDocument::Passport { .. } => "passport",
            KycDocument::VotersCard { .. } => "voters_card",
        }
    }

    /// All three URLs must be non-empty
    pub fn validate(&self) -> Result<(), String> {
        let (front, back, selfie) = match self {
            KycDocument::DriversLicense {
                front_url,
                back_url,
                selfie_url,
            }
            | KycDocument::NationalId {
                front_url,
                back_url,
                selfie_url,
            }
            | KycDocument::Passport {
                front_url,
                back_url,
                selfie_url,
            }
            | KycDocument::VotersCard {
                front_url,
                back_url,
                selfie_url,
            } => (front_url, back_url, selfie_url),
        };

        if front.is_empty() || back.is_empty() || selfie.is_empty() {
            return Err("All document image URLs are required".to_string());
        }
        Ok(())
    }
}

/// KYC submission status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "kyc_status", rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
}

/// KYC submission model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct KycSubmission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document: sqlx::types::Json<KycDocument>,
    pub status: KycStatus,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let doc = KycDocument::Passport {
            front_url: "https://img.example/front.png".to_string(),
            back_url: "https://img.example/back.png".to_string(),
            selfie_url: "https://img.example/selfie.png".to_string(),
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""kind":"passport""#));

        let parsed: KycDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind":"library_card","front_url":"a","back_url":"b","selfie_url":"c"}"#;
        assert!(serde_json::from_str::<KycDocument>(json).is_err());
    }

    #[test]
    fn test_validate_requires_urls() {
        let doc = KycDocument::NationalId {
            front_url: "https://img.example/front.png".to_string(),
            back_url: String::new(),
            selfie_url: "https://img.example/selfie.png".to_string(),
        };
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_kind_labels() {
        let doc = KycDocument::VotersCard {
            front_url: "f".into(),
            back_url: "b".into(),
            selfie_url: "s".into(),
        };
        assert_eq!(doc.kind(), "voters_card");
    }
}
