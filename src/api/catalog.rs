//! Categories and tags: flat lookup tables with the same CRUD shape.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::catalog::{
    CategoryCreate, CategoryResponse, CategoryUpdate, TagCreate, TagResponse, TagUpdate,
};
use crate::services::merge::Merge;

pub(crate) fn categories_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:category_id", get(get_category).patch(update_category).delete(delete_category))
}

pub(crate) fn tags_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/:tag_id", get(get_tag).patch(update_tag).delete(delete_tag))
}

async fn list_categories(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = repositories::categories::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from_db).collect()))
}

async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = repositories::categories::create(state.db(), &payload.name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create category"))?;
    tracing::info!(category_id = category.id, "Created category");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from_db(category))))
}

async fn get_category(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = repositories::categories::find_by_id(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: ID={category_id}")))?;
    Ok(Json(CategoryResponse::from_db(category)))
}

async fn update_category(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = repositories::categories::find_by_id(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: ID={category_id}")))?;

    let mut next = category.clone();
    let mut merge = Merge::default();
    merge.field(&mut next.name, payload.name);

    if !merge.changed() {
        return Ok(Json(CategoryResponse::from_db(category)));
    }

    let updated = repositories::categories::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update category"))?;
    Ok(Json(CategoryResponse::from_db(updated)))
}

async fn delete_category(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::categories::delete(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete category"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Category not found: ID={category_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tags(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = repositories::tags::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tags"))?;
    Ok(Json(tags.into_iter().map(TagResponse::from_db).collect()))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<TagCreate>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let tag = repositories::tags::create(state.db(), &payload.name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create tag"))?;
    tracing::info!(tag_id = tag.id, "Created tag");
    Ok((StatusCode::CREATED, Json(TagResponse::from_db(tag))))
}

async fn get_tag(
    Path(tag_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = repositories::tags::find_by_id(state.db(), tag_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch tag"))?
        .ok_or_else(|| ApiError::NotFound(format!("Tag not found: ID={tag_id}")))?;
    Ok(Json(TagResponse::from_db(tag)))
}

async fn update_tag(
    Path(tag_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<TagUpdate>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = repositories::tags::find_by_id(state.db(), tag_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch tag"))?
        .ok_or_else(|| ApiError::NotFound(format!("Tag not found: ID={tag_id}")))?;

    let mut next = tag.clone();
    let mut merge = Merge::default();
    merge.field(&mut next.name, payload.name);

    if !merge.changed() {
        return Ok(Json(TagResponse::from_db(tag)));
    }

    let updated = repositories::tags::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update tag"))?;
    Ok(Json(TagResponse::from_db(updated)))
}

async fn delete_tag(
    Path(tag_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::tags::delete(state.db(), tag_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete tag"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Tag not found: ID={tag_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
