use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::target::{Lookup, Target};
use crate::app::AppState;
use crate::auth::models::Session;
use crate::db::comment_repository::CommentRepository;
use crate::db::models::{Comment, NewCommentRequest};
use crate::db::post_repository::PostRepository;
use crate::error::AppError;

/// Store a comment on `target`.
///
/// Comments on a post also bump the post's comment counter. The counter is
/// read, incremented and written back, so concurrent submissions can lose an
/// increment.
pub async fn process_submit_comment(
    lookup: Lookup<'_>,
    comments: &dyn CommentRepository,
    session: &Session,
    target: &Target,
    request: NewCommentRequest,
) -> Result<Comment, AppError> {
    let user = session.require("leave a comment")?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".into()));
    }

    lookup.ensure_exists(target).await?;

    let comment = Comment::new(user, target.comment_parent(), body.to_string());
    comments.insert(comment.clone()).await?;

    if let Target::Post(post_id) = target {
        increment_comment_count(lookup.posts, post_id).await?;
    }

    tracing::debug!(comment_id = %comment.id, ?target, "Comment stored");
    Ok(comment)
}

async fn increment_comment_count(posts: &dyn PostRepository, post_id: &str) -> Result<(), AppError> {
    match posts.find_by_id(post_id).await? {
        Some(post) => {
            posts
                .set_comment_count(post_id, post.comments.saturating_add(1))
                .await
        }
        None => {
            tracing::warn!(post_id, "Post vanished before its comment counter was updated");
            Ok(())
        }
    }
}

/// Comments on `target`, oldest first.
pub async fn process_list_comments(
    lookup: Lookup<'_>,
    comments: &dyn CommentRepository,
    target: &Target,
) -> Result<Vec<Comment>, AppError> {
    lookup.ensure_exists(target).await?;
    comments.list_for_parent(&target.comment_parent()).await
}

async fn submit(
    state: AppState,
    session: Session,
    target: Target,
    request: NewCommentRequest,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = process_submit_comment(
        state.lookup(),
        state.comment_repo.as_ref(),
        &session,
        &target,
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list(state: AppState, target: Target) -> Result<Json<Vec<Comment>>, AppError> {
    let comments =
        process_list_comments(state.lookup(), state.comment_repo.as_ref(), &target).await?;
    Ok(Json(comments))
}

/// `POST /api/v1/posts/{id}/comments`
pub async fn submit_post_comment_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    submit(state, session, Target::Post(id), request).await
}

/// `POST /api/v1/catalog/{id}/comments`
pub async fn submit_catalog_comment_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    submit(state, session, Target::CatalogRecipe(id), request).await
}

/// `POST /api/v1/recipes/{id}/comments`
pub async fn submit_recipe_comment_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    submit(state, session, Target::CommunityRecipe(id), request).await
}

/// `GET /api/v1/posts/{id}/comments`
pub async fn list_post_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    list(state, Target::Post(id)).await
}

/// `GET /api/v1/catalog/{id}/comments`
pub async fn list_catalog_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    list(state, Target::CatalogRecipe(id)).await
}

/// `GET /api/v1/recipes/{id}/comments`
pub async fn list_recipe_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    list(state, Target::CommunityRecipe(id)).await
}
