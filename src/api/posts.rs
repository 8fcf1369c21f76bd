use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::models::Session;
use crate::db::comment_repository::CommentRepository;
use crate::db::models::{Comment, CommentParent, NewPostRequest, Post};
use crate::db::post_repository::PostRepository;
use crate::error::AppError;
use crate::listing::{paginate, ListQuery, ListSpec, Page, POSTS_PER_PAGE};
use crate::rendering::markup::sanitize_html;
use crate::speech::Narration;

/// A post as shown in lists: everything but the body.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub comments: u32,
    pub views: u32,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            created_at: post.created_at,
            comments: post.comments,
            views: post.views,
        }
    }
}

/// A post with sanitized content and its comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// `?rate=` for narration endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NarrationQuery {
    #[serde(default)]
    pub rate: Option<f32>,
}

/// The free board searches titles only.
pub fn board_spec() -> ListSpec<Post> {
    ListSpec::paged(POSTS_PER_PAGE, |p| vec![p.title.as_str()])
}

pub async fn process_list_posts(
    posts: &dyn PostRepository,
    query: &ListQuery,
) -> Result<Page<PostSummary>, AppError> {
    let all = posts.list_all().await?;
    Ok(paginate(all, board_spec(), query.search(), query.page()).map(PostSummary::from))
}

pub async fn process_create_post(
    posts: &dyn PostRepository,
    session: &Session,
    request: NewPostRequest,
) -> Result<Post, AppError> {
    let user = session.require("write a post")?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".into()));
    }

    let post = Post::new(user, title.to_string(), request.content);
    posts.insert(post.clone()).await?;
    tracing::info!(post_id = %post.id, author = %post.author_id, "Post created");

    Ok(post)
}

/// Load a post for reading. Every call counts as a view.
pub async fn process_post_detail(
    posts: &dyn PostRepository,
    comments: &dyn CommentRepository,
    id: &str,
) -> Result<PostDetail, AppError> {
    let mut post = posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{id}' not found")))?;

    post.views = post.views.saturating_add(1);
    posts.set_views(id, post.views).await?;

    post.content = sanitize_html(&post.content);
    let comments = comments
        .list_for_parent(&CommentParent::Post(id.to_string()))
        .await?;

    Ok(PostDetail { post, comments })
}

pub async fn process_post_narration(
    posts: &dyn PostRepository,
    id: &str,
    rate: Option<f32>,
) -> Result<Narration, AppError> {
    let post = posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{id}' not found")))?;

    Ok(Narration::for_post(&post, rate))
}

/// `GET /api/v1/posts`
pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<PostSummary>>, AppError> {
    Ok(Json(process_list_posts(state.post_repo.as_ref(), &query).await?))
}

/// `POST /api/v1/posts`
pub async fn create_post_handler(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<NewPostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = process_create_post(state.post_repo.as_ref(), &session, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /api/v1/posts/{id}`
pub async fn post_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    let detail = process_post_detail(
        state.post_repo.as_ref(),
        state.comment_repo.as_ref(),
        &id,
    )
    .await?;

    Ok(Json(detail))
}

/// `GET /api/v1/posts/{id}/narration`
pub async fn post_narration_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NarrationQuery>,
) -> Result<Json<Narration>, AppError> {
    Ok(Json(
        process_post_narration(state.post_repo.as_ref(), &id, query.rate).await?,
    ))
}
