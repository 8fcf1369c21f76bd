use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::posts::NarrationQuery;
use crate::app::AppState;
use crate::auth::models::Session;
use crate::db::comment_repository::CommentRepository;
use crate::db::models::{Comment, CommentParent, NewRecipeRequest, UserRecipe};
use crate::db::recipe_repository::RecipeRepository;
use crate::error::AppError;
use crate::listing::{paginate, ListQuery, ListSpec, Page, RECIPES_PER_PAGE};
use crate::speech::Narration;

/// A community recipe with its comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub recipe: UserRecipe,
    /// Whether the caller owns the recipe and may delete it.
    pub can_delete: bool,
    pub comments: Vec<Comment>,
}

pub fn community_spec() -> ListSpec<UserRecipe> {
    ListSpec::paged(RECIPES_PER_PAGE, |r| {
        vec![r.title.as_str(), r.description.as_str()]
    })
}

/// User submissions, newest first, followed by the curated recipes.
pub async fn community_recipes(recipes: &dyn RecipeRepository) -> Result<Vec<UserRecipe>, AppError> {
    let mut all = recipes.list_user_recipes().await?;
    all.extend(recipes.list_curated_recipes().await?);
    Ok(all)
}

/// A user recipe, or a curated one when no user recipe has that id.
pub async fn find_community_recipe(
    recipes: &dyn RecipeRepository,
    id: &str,
) -> Result<UserRecipe, AppError> {
    if let Some(recipe) = recipes.find_user_recipe(id).await? {
        return Ok(recipe);
    }

    recipes
        .find_curated_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe '{id}' not found")))
}

pub async fn process_list_recipes(
    recipes: &dyn RecipeRepository,
    query: &ListQuery,
) -> Result<Page<UserRecipe>, AppError> {
    let all = community_recipes(recipes).await?;
    Ok(paginate(all, community_spec(), query.search(), query.page()))
}

pub async fn process_create_recipe(
    recipes: &dyn RecipeRepository,
    session: &Session,
    mut request: NewRecipeRequest,
) -> Result<UserRecipe, AppError> {
    let user = session.require("share a recipe")?;

    request.title = request.title.trim().to_string();
    if request.title.is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".into()));
    }
    request.ingredients.retain(|i| !i.name.trim().is_empty());
    request.steps.retain(|s| !s.description.trim().is_empty());

    let recipe = UserRecipe::new(user, request);
    recipes.insert_user_recipe(recipe.clone()).await?;
    tracing::info!(recipe_id = %recipe.id, author = %recipe.author_id, "Recipe created");

    Ok(recipe)
}

pub async fn process_recipe_detail(
    recipes: &dyn RecipeRepository,
    comments: &dyn CommentRepository,
    session: &Session,
    id: &str,
) -> Result<RecipeDetail, AppError> {
    let recipe = find_community_recipe(recipes, id).await?;
    let can_delete = session.user().is_some_and(|user| recipe.is_owned_by(user));
    let comments = comments
        .list_for_parent(&CommentParent::Recipe(id.to_string()))
        .await?;

    Ok(RecipeDetail {
        recipe,
        can_delete,
        comments,
    })
}

/// Delete a recipe on behalf of its owner.
///
/// Ownership is checked against the stored author before any delete is
/// issued; curated recipes have no owner and can never be deleted.
pub async fn process_delete_recipe(
    recipes: &dyn RecipeRepository,
    session: &Session,
    id: &str,
) -> Result<(), AppError> {
    let user = session.require("delete recipes")?;

    let recipe = find_community_recipe(recipes, id).await?;
    if !recipe.is_owned_by(user) {
        tracing::warn!(recipe_id = id, user_id = %user.user_id, "Refused to delete a recipe owned by someone else");
        return Err(AppError::Forbidden("Only the author can delete this recipe".into()));
    }

    recipes.delete_user_recipe(id).await?;
    tracing::info!(recipe_id = id, "Recipe deleted");
    Ok(())
}

pub async fn process_recipe_narration(
    recipes: &dyn RecipeRepository,
    id: &str,
    rate: Option<f32>,
) -> Result<Narration, AppError> {
    let recipe = find_community_recipe(recipes, id).await?;
    Ok(Narration::for_user_recipe(&recipe, rate))
}

/// `GET /api/v1/recipes`
pub async fn list_recipes_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<UserRecipe>>, AppError> {
    Ok(Json(
        process_list_recipes(state.recipe_repo.as_ref(), &query).await?,
    ))
}

/// `POST /api/v1/recipes`
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<NewRecipeRequest>,
) -> Result<(StatusCode, Json<UserRecipe>), AppError> {
    let recipe = process_create_recipe(state.recipe_repo.as_ref(), &session, request).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `GET /api/v1/recipes/{id}`
pub async fn recipe_detail_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>, AppError> {
    let detail = process_recipe_detail(
        state.recipe_repo.as_ref(),
        state.comment_repo.as_ref(),
        &session,
        &id,
    )
    .await?;

    Ok(Json(detail))
}

/// `DELETE /api/v1/recipes/{id}`
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    process_delete_recipe(state.recipe_repo.as_ref(), &session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/recipes/{id}/narration`
pub async fn recipe_narration_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NarrationQuery>,
) -> Result<Json<Narration>, AppError> {
    Ok(Json(
        process_recipe_narration(state.recipe_repo.as_ref(), &id, query.rate).await?,
    ))
}
