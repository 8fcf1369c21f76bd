use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::target::{Lookup, Target};
use crate::app::AppState;
use crate::auth::models::Session;
use crate::db::like_repository::LikeRepository;
use crate::db::models::Like;
use crate::error::AppError;

/// Whether the current user likes a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeState {
    NotLiked,
    Liked,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub state: LikeState,
    pub liked: bool,
}

impl From<LikeState> for LikeResponse {
    fn from(state: LikeState) -> Self {
        Self {
            state,
            liked: state == LikeState::Liked,
        }
    }
}

/// Flip the caller's like on `target`.
///
/// With no like record one is inserted; otherwise every matching record is
/// deleted, which also clears duplicates left behind by racing toggles.
pub async fn process_toggle_like(
    lookup: Lookup<'_>,
    likes: &dyn LikeRepository,
    session: &Session,
    target: &Target,
) -> Result<LikeState, AppError> {
    let user = session.require("like recipes and posts")?;
    lookup.ensure_exists(target).await?;

    let subject = target.like_subject();
    let existing = likes.find(&subject, &user.user_id).await?;

    if existing.is_empty() {
        likes.insert(Like::new(&subject, &user.user_id)).await?;
        tracing::debug!(user_id = %user.user_id, ?target, "Liked");
        return Ok(LikeState::Liked);
    }

    futures::future::try_join_all(existing.iter().map(|like| likes.delete(&like.id))).await?;
    tracing::debug!(user_id = %user.user_id, ?target, removed = existing.len(), "Unliked");
    Ok(LikeState::NotLiked)
}

/// The caller's like state on `target`. Anonymous callers never like
/// anything, and are answered without a store read.
pub async fn process_like_status(
    likes: &dyn LikeRepository,
    session: &Session,
    target: &Target,
) -> Result<LikeState, AppError> {
    let Some(user) = session.user() else {
        return Ok(LikeState::NotLiked);
    };

    let existing = likes.find(&target.like_subject(), &user.user_id).await?;
    Ok(if existing.is_empty() {
        LikeState::NotLiked
    } else {
        LikeState::Liked
    })
}

async fn toggle(state: AppState, session: Session, target: Target) -> Result<Json<LikeResponse>, AppError> {
    let like_state =
        process_toggle_like(state.lookup(), state.like_repo.as_ref(), &session, &target).await?;
    Ok(Json(like_state.into()))
}

async fn status(state: AppState, session: Session, target: Target) -> Result<Json<LikeResponse>, AppError> {
    let like_state = process_like_status(state.like_repo.as_ref(), &session, &target).await?;
    Ok(Json(like_state.into()))
}

/// `POST /api/v1/posts/{id}/like`
pub async fn toggle_post_like_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    toggle(state, session, Target::Post(id)).await
}

/// `POST /api/v1/catalog/{id}/like`
pub async fn toggle_catalog_like_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    toggle(state, session, Target::CatalogRecipe(id)).await
}

/// `POST /api/v1/recipes/{id}/like`
pub async fn toggle_recipe_like_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    toggle(state, session, Target::CommunityRecipe(id)).await
}

/// `GET /api/v1/posts/{id}/like`
pub async fn post_like_status_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    status(state, session, Target::Post(id)).await
}

/// `GET /api/v1/catalog/{id}/like`
pub async fn catalog_like_status_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    status(state, session, Target::CatalogRecipe(id)).await
}

/// `GET /api/v1/recipes/{id}/like`
pub async fn recipe_like_status_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    status(state, session, Target::CommunityRecipe(id)).await
}
