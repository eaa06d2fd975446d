use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::product::ProductResponse;
use crate::models::product::ProductDraft;
use crate::models::submission::{Submission, SubmissionKind, SubmissionStatus};

#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    #[serde(flatten)]
    pub product: ProductDraft,
    pub contact_email: Option<String>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    New,
    Edit,
}

impl KindFilter {
    pub fn kind(self) -> Option<SubmissionKind> {
        match self {
            KindFilter::All => None,
            KindFilter::New => Some(SubmissionKind::New),
            KindFilter::Edit => Some(SubmissionKind::Edit),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmissionListQuery {
    #[serde(default)]
    pub kind: KindFilter,
    pub status: Option<SubmissionStatus>,
}

impl SubmissionListQuery {
    /// The review queue shows pending work unless asked otherwise.
    pub fn status(&self) -> SubmissionStatus {
        self.status.unwrap_or(SubmissionStatus::Pending)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    pub overrides: Option<ProductDraft>,
    pub feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub kind: SubmissionKind,
    pub product_id: Option<i64>,
    pub product: ProductDraft,
    pub status: SubmissionStatus,
    pub submitted_by: Option<String>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub reviewed_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl TryFrom<Submission> for SubmissionResponse {
    type Error = sqlx::Error;

    fn try_from(s: Submission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: s.id,
            kind: s.kind()?,
            status: s.status()?,
            product_id: s.product_id,
            product: s.payload.0,
            submitted_by: s.submitted_by,
            source_url: s.source_url,
            notes: s.notes,
            feedback: s.feedback,
            reviewed_by: s.reviewed_by,
            created_at: s.created_at,
            reviewed_at: s.reviewed_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub submission: SubmissionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_to_pending_of_any_kind() {
        let q: SubmissionListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.kind, KindFilter::All);
        assert_eq!(q.kind.kind(), None);
        assert_eq!(q.status(), SubmissionStatus::Pending);

        let q: SubmissionListQuery = serde_json::from_str(r#"{"kind":"edit","status":"rejected"}"#).unwrap();
        assert_eq!(q.kind.kind(), Some(SubmissionKind::Edit));
        assert_eq!(q.status(), SubmissionStatus::Rejected);
    }

    #[test]
    fn submission_request_keeps_contact_fields_apart() {
        let req: SubmissionRequest = serde_json::from_str(
            r#"{"name":"Bournvita","brand":"Cadbury","contact_email":"a@b.co","notes":"check sugar"}"#,
        )
        .unwrap();
        assert_eq!(req.product.name.as_deref(), Some("Bournvita"));
        assert_eq!(req.contact_email.as_deref(), Some("a@b.co"));
        assert_eq!(req.notes.as_deref(), Some("check sugar"));
    }
}
