use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgExecutor};

use super::product::ProductDraft;

const SUBMISSION_COLUMNS: &str = "id, kind, product_id, payload, status, submitted_by, source_url,
    notes, feedback, reviewed_by, created_at, reviewed_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    New,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionKind::New => "new",
            SubmissionKind::Edit => "edit",
        }
    }
}

impl FromStr for SubmissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(SubmissionKind::New),
            "edit" => Ok(SubmissionKind::Edit),
            other => Err(format!("Invalid submission kind: {other}")),
        }
    }
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    /// Only pending submissions can be reviewed; the other states are final.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (SubmissionStatus::Pending, SubmissionStatus::Approved)
                | (SubmissionStatus::Pending, SubmissionStatus::Rejected)
        )
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(format!("Invalid submission status: {other}")),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: i64,
    pub kind: String,
    pub product_id: Option<i64>,
    pub payload: Json<ProductDraft>,
    pub status: String,
    pub submitted_by: Option<String>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub reviewed_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn kind(&self) -> Result<SubmissionKind, sqlx::Error> {
        self.kind.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))
    }

    pub fn status(&self) -> Result<SubmissionStatus, sqlx::Error> {
        self.status.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))
    }
}

pub struct NewSubmission {
    pub kind: SubmissionKind,
    pub product_id: Option<i64>,
    pub payload: ProductDraft,
    pub submitted_by: Option<String>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
}

impl Submission {
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        new: &NewSubmission,
    ) -> Result<Submission, sqlx::Error> {
        sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (kind, product_id, payload, submitted_by, source_url, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(new.kind.as_str())
        .bind(new.product_id)
        .bind(Json(&new.payload))
        .bind(new.submitted_by.as_deref())
        .bind(new.source_url.as_deref())
        .bind(new.notes.as_deref())
        .fetch_one(executor)
        .await
    }

    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: Option<SubmissionKind>,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE ($1::TEXT IS NULL OR kind = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(kind.map(SubmissionKind::as_str))
        .bind(status.map(SubmissionStatus::as_str))
        .fetch_all(executor)
        .await
    }

    pub async fn find<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(&format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Locks the row for the rest of the transaction.
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn mark_reviewed<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        status: SubmissionStatus,
        product_id: Option<i64>,
        feedback: Option<&str>,
        reviewer: i64,
    ) -> Result<Submission, sqlx::Error> {
        sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions SET
                status = $2,
                product_id = COALESCE($3, product_id),
                feedback = $4,
                reviewed_by = $5,
                reviewed_at = NOW()
             WHERE id = $1
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(product_id)
        .bind(feedback)
        .bind(reviewer)
        .fetch_one(executor)
        .await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn submission(id: i64, kind: SubmissionKind, status: SubmissionStatus, payload: ProductDraft) -> Submission {
        Submission {
            id,
            kind: kind.as_str().to_string(),
            product_id: None,
            payload: Json(payload),
            status: status.as_str().to_string(),
            submitted_by: None,
            source_url: None,
            notes: None,
            feedback: None,
            reviewed_by: None,
            created_at: Utc::now(),
            reviewed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_can_be_reviewed() {
        use SubmissionStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn kinds_and_statuses_parse() {
        assert_eq!("edit".parse::<SubmissionKind>().unwrap(), SubmissionKind::Edit);
        assert_eq!("rejected".parse::<SubmissionStatus>().unwrap(), SubmissionStatus::Rejected);
        assert!("archived".parse::<SubmissionStatus>().is_err());
    }
}
