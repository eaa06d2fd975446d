// src/handlers/product.rs
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use crate::dtos::product::{to_responses, CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthContext;
use crate::models::product::{Product, ProductFilter, Publication};
use crate::state::AppState;
use crate::validation;
use tracing::{error, info, instrument};

// GET /products - Published products, optionally filtered by column
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ProductFilter>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    match Product::fetch_published_filtered(&state.db_pool, &filter).await {
        Ok(products) => Ok(Json(to_responses(&products))),
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /products/{id} - Single published product
#[instrument(skip(state))]
pub async fn get_product(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = Product::find_published(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// GET /products/category/{name}
#[instrument(skip(state))]
pub async fn products_by_category(
    AppPath(category): AppPath<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let filter = ProductFilter { category: Some(category), ..ProductFilter::default() };
    let products = Product::fetch_published_filtered(&state.db_pool, &filter).await?;
    Ok(Json(to_responses(&products)))
}

// POST /products - Admins publish directly, contributors land in the approval queue
#[instrument(skip(state, auth, payload), fields(user = %auth.username))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let draft = validation::normalize(payload.product);
    validation::require_product_fields(&draft)?;

    let publication = Publication::for_creator(&auth, payload.is_published);

    let product = Product::insert(&state.db_pool, &draft, &publication).await?;
    info!(id = product.id, published = product.is_published, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// GET /admin/products - Every product, any status
#[instrument(skip(state))]
pub async fn admin_list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = Product::fetch_all(&state.db_pool).await?;
    Ok(Json(to_responses(&products)))
}

// GET /admin/products/{id}
#[instrument(skip(state))]
pub async fn admin_get_product(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = Product::find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// PUT /admin/products/{id} - Partial update
#[instrument(skip(state, payload))]
pub async fn update_product(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let draft = validation::normalize(payload.product.clone());
    let flags_only = payload.is_published.is_some() || payload.requires_approval.is_some();
    if !flags_only {
        validation::validate_edit(&payload.product, &draft)?;
    } else if payload.product.name.is_some() && draft.name.is_none() {
        return Err(AppError::validation("Product name is required"));
    }

    let product = Product::apply_draft(
        &state.db_pool,
        id,
        &draft,
        payload.is_published,
        payload.requires_approval,
    )
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    info!(id, "Product updated");
    Ok(Json(ProductResponse::from(product)))
}

// DELETE /admin/products/{id}
#[instrument(skip(state))]
pub async fn delete_product(
    AppPath(id): AppPath<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if !Product::delete(&state.db_pool, id).await? {
        return Err(AppError::not_found("Product not found"));
    }

    info!(id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductDraft;

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let payload = UpdateProductRequest {
            product: ProductDraft::default(),
            is_published: None,
            requires_approval: None,
        };
        let err = update_product(AppPath(1), State(AppState::lazy_for_tests()), AppJson(payload))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blanking_the_name_is_rejected() {
        let payload = UpdateProductRequest {
            product: ProductDraft { name: Some("   ".into()), ..ProductDraft::default() },
            is_published: Some(true),
            requires_approval: None,
        };
        let err = update_product(AppPath(1), State(AppState::lazy_for_tests()), AppJson(payload))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
