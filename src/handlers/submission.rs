use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument, warn};

use crate::dtos::product::ProductResponse;
use crate::dtos::submission::{
    ApproveRequest, RejectRequest, ReviewResponse, SubmissionListQuery, SubmissionRequest,
    SubmissionResponse,
};
use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthContext;
use crate::models::product::{Product, ProductDraft, Publication};
use crate::models::submission::{NewSubmission, Submission, SubmissionKind, SubmissionStatus};
use crate::state::AppState;
use crate::validation;

fn clean_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn contact_fields(req: &SubmissionRequest) -> Result<(Option<String>, Option<String>, Option<String>), AppError> {
    let contact_email = clean_text(req.contact_email.clone());
    if let Some(email) = contact_email.as_deref() {
        validation::validate_email(email)?;
    }
    Ok((contact_email, clean_text(req.source_url.clone()), clean_text(req.notes.clone())))
}

// POST /submissions - Contributor proposes a new product
#[instrument(skip(state, req))]
pub async fn create_submission(
    State(state): State<AppState>,
    AppJson(req): AppJson<SubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let (submitted_by, source_url, notes) = contact_fields(&req)?;
    let draft = validation::normalize(req.product);
    validation::require_submission_fields(&draft)?;

    let submission = Submission::insert(
        &state.db_pool,
        &NewSubmission {
            kind: SubmissionKind::New,
            product_id: None,
            payload: draft,
            submitted_by,
            source_url,
            notes,
        },
    )
    .await?;

    info!(id = submission.id, "New product submitted for review");
    Ok((StatusCode::CREATED, Json(submission.try_into()?)))
}

// POST /products/{id}/edits - Contributor proposes changes to a published product
#[instrument(skip(state, req))]
pub async fn suggest_edit(
    AppPath(product_id): AppPath<i64>,
    State(state): State<AppState>,
    AppJson(req): AppJson<SubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let (submitted_by, source_url, notes) = contact_fields(&req)?;
    let draft = validation::normalize(req.product.clone());
    validation::validate_edit(&req.product, &draft)?;

    Product::find_published(&state.db_pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let submission = Submission::insert(
        &state.db_pool,
        &NewSubmission {
            kind: SubmissionKind::Edit,
            product_id: Some(product_id),
            payload: draft,
            submitted_by,
            source_url,
            notes,
        },
    )
    .await?;

    info!(id = submission.id, product_id, "Product edit submitted for review");
    Ok((StatusCode::CREATED, Json(submission.try_into()?)))
}

// GET /admin/submissions?kind=&status=
#[instrument(skip(state))]
pub async fn list_submissions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SubmissionListQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let submissions = Submission::list(&state.db_pool, query.kind.kind(), Some(query.status())).await?;
    let response = submissions
        .into_iter()
        .map(SubmissionResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(response))
}

// GET /admin/submissions/{id}
#[instrument(skip(state))]
pub async fn get_submission(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = Submission::find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    Ok(Json(submission.try_into()?))
}

fn ensure_reviewable(submission: &Submission, next: SubmissionStatus) -> Result<(), AppError> {
    let current = submission.status()?;
    if current.can_transition_to(next) {
        Ok(())
    } else {
        warn!(id = submission.id, status = current.as_str(), "Submission already reviewed");
        Err(AppError::conflict("Submission has already been reviewed"))
    }
}

const MISSING_TARGET: &str = "The product this edit targets no longer exists";

/// What approving a submission writes.
#[derive(Debug, PartialEq)]
enum ApprovalTarget {
    Insert(ProductDraft),
    Update(i64, ProductDraft),
}

fn approval_target(submission: &Submission, overrides: ProductDraft) -> Result<ApprovalTarget, AppError> {
    let draft = submission.payload.0.clone().merge(overrides);
    match submission.kind()? {
        SubmissionKind::New => {
            validation::require_product_fields(&draft)?;
            Ok(ApprovalTarget::Insert(draft))
        }
        SubmissionKind::Edit => {
            let product_id = submission
                .product_id
                .ok_or_else(|| AppError::conflict(MISSING_TARGET))?;
            Ok(ApprovalTarget::Update(product_id, draft))
        }
    }
}

// POST /admin/submissions/{id}/approve - Publish, optionally with admin edits
#[instrument(skip(state, auth, body), fields(admin = %auth.username))]
pub async fn approve_submission(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Option<AppJson<ApproveRequest>>,
) -> Result<Json<ReviewResponse>, AppError> {
    let req = body.map(|AppJson(req)| req).unwrap_or_default();
    let mut tx = state.db_pool.begin().await?;

    let submission = Submission::find_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    ensure_reviewable(&submission, SubmissionStatus::Approved)?;

    let overrides = validation::normalize(req.overrides.unwrap_or_default());
    let product = match approval_target(&submission, overrides)? {
        ApprovalTarget::Insert(draft) => {
            let publication = Publication {
                is_published: true,
                requires_approval: false,
                user_submitted: true,
                submitted_by: submission.submitted_by.clone(),
            };
            Product::insert(&mut *tx, &draft, &publication).await?
        }
        ApprovalTarget::Update(product_id, draft) => {
            Product::apply_draft(&mut *tx, product_id, &draft, None, Some(false))
                .await?
                .ok_or_else(|| AppError::conflict(MISSING_TARGET))?
        }
    };

    let feedback = clean_text(req.feedback);
    let reviewed = Submission::mark_reviewed(
        &mut *tx,
        id,
        SubmissionStatus::Approved,
        Some(product.id),
        feedback.as_deref(),
        auth.user_id,
    )
    .await?;

    tx.commit().await?;
    info!(id, product_id = product.id, "Submission approved");

    Ok(Json(ReviewResponse {
        submission: reviewed.try_into()?,
        product: Some(ProductResponse::from(product)),
    }))
}

// POST /admin/submissions/{id}/reject
#[instrument(skip(state, auth, body), fields(admin = %auth.username))]
pub async fn reject_submission(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Option<AppJson<RejectRequest>>,
) -> Result<Json<ReviewResponse>, AppError> {
    let req = body.map(|AppJson(req)| req).unwrap_or_default();
    let mut tx = state.db_pool.begin().await?;

    let submission = Submission::find_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    ensure_reviewable(&submission, SubmissionStatus::Rejected)?;

    let feedback = clean_text(req.feedback);
    let reviewed = Submission::mark_reviewed(
        &mut *tx,
        id,
        SubmissionStatus::Rejected,
        None,
        feedback.as_deref(),
        auth.user_id,
    )
    .await?;

    tx.commit().await?;
    info!(id, "Submission rejected");

    Ok(Json(ReviewResponse { submission: reviewed.try_into()?, product: None }))
}
