use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;

use crate::api::catalog::catalog_spec;
use crate::api::posts::PostSummary;
use crate::app::AppState;
use crate::auth::models::Session;
use crate::catalog::{Catalog, OfficialRecipe};
use crate::db::comment_repository::CommentRepository;
use crate::db::like_repository::LikeRepository;
use crate::db::models::{Comment, Post, SubjectKind};
use crate::db::post_repository::PostRepository;
use crate::error::AppError;
use crate::listing::{
    paginate, sort_by_date, ListQuery, ListSpec, Page, COMMENTS_PER_PAGE, POSTS_PER_PAGE,
};

fn my_posts_spec() -> ListSpec<Post> {
    ListSpec::paged(POSTS_PER_PAGE, |p| vec![p.title.as_str(), p.content.as_str()])
}

fn my_comments_spec() -> ListSpec<Comment> {
    ListSpec::paged(COMMENTS_PER_PAGE, |c| vec![c.body.as_str()])
}

/// The caller's posts, sorted by date in the requested direction (newest
/// first by default). Search covers title and body.
pub async fn process_my_posts(
    posts: &dyn PostRepository,
    session: &Session,
    query: &ListQuery,
) -> Result<Page<PostSummary>, AppError> {
    let user = session.require("see your posts")?;

    let mut mine = posts.list_by_author(&user.user_id).await?;
    sort_by_date(&mut mine, query.sort.unwrap_or_default(), |p| p.created_at);

    Ok(paginate(mine, my_posts_spec(), query.search(), query.page()).map(PostSummary::from))
}

/// The caller's comments, newest first.
pub async fn process_my_comments(
    comments: &dyn CommentRepository,
    session: &Session,
    query: &ListQuery,
) -> Result<Page<Comment>, AppError> {
    let user = session.require("see your comments")?;

    let mine = comments.list_by_author(&user.user_id).await?;
    Ok(paginate(mine, my_comments_spec(), query.search(), query.page()))
}

/// Official recipes the caller has liked, in catalog order, on one page.
pub async fn process_my_likes(
    catalog: &Catalog,
    likes: &dyn LikeRepository,
    session: &Session,
    query: &ListQuery,
) -> Result<Page<OfficialRecipe>, AppError> {
    let user = session.require("see your liked recipes")?;

    let liked: HashSet<String> = likes
        .list_by_user(&user.user_id)
        .await?
        .into_iter()
        .filter(|like| like.subject_kind == SubjectKind::Recipe)
        .map(|like| like.subject_id)
        .collect();

    let recipes: Vec<OfficialRecipe> = catalog
        .list()
        .iter()
        .filter(|r| liked.contains(&r.id))
        .cloned()
        .collect();

    let spec = ListSpec::unpaged(catalog_spec().fields);
    Ok(paginate(recipes, spec, query.search(), 1))
}

/// `GET /api/v1/me/posts`
pub async fn my_posts_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<PostSummary>>, AppError> {
    Ok(Json(
        process_my_posts(state.post_repo.as_ref(), &session, &query).await?,
    ))
}

/// `GET /api/v1/me/comments`
pub async fn my_comments_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Comment>>, AppError> {
    Ok(Json(
        process_my_comments(state.comment_repo.as_ref(), &session, &query).await?,
    ))
}

/// `GET /api/v1/me/likes`
pub async fn my_likes_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<OfficialRecipe>>, AppError> {
    Ok(Json(
        process_my_likes(&state.catalog, state.like_repo.as_ref(), &session, &query).await?,
    ))
}
