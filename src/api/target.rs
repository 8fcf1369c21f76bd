use crate::catalog::Catalog;
use crate::db::models::{CommentParent, LikeSubject};
use crate::db::post_repository::PostRepository;
use crate::db::recipe_repository::RecipeRepository;
use crate::error::AppError;

/// Content that can be liked and commented on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Post(String),
    /// A recipe from the official catalog.
    CatalogRecipe(String),
    /// A user-submitted or curated community recipe.
    CommunityRecipe(String),
}

impl Target {
    pub fn like_subject(&self) -> LikeSubject {
        match self {
            Target::Post(id) => LikeSubject::post(id.as_str()),
            Target::CatalogRecipe(id) | Target::CommunityRecipe(id) => {
                LikeSubject::recipe(id.as_str())
            }
        }
    }

    pub fn comment_parent(&self) -> CommentParent {
        match self {
            Target::Post(id) => CommentParent::Post(id.clone()),
            Target::CatalogRecipe(id) | Target::CommunityRecipe(id) => {
                CommentParent::Recipe(id.clone())
            }
        }
    }
}

/// Read access to everything a [`Target`] can point at.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    pub posts: &'a dyn PostRepository,
    pub recipes: &'a dyn RecipeRepository,
    pub catalog: &'a Catalog,
}

impl Lookup<'_> {
    /// Fail with `NotFound` unless the target exists.
    pub async fn ensure_exists(&self, target: &Target) -> Result<(), AppError> {
        let found = match target {
            Target::Post(id) => self.posts.find_by_id(id).await?.is_some(),
            Target::CatalogRecipe(id) => self.catalog.find(id).is_some(),
            Target::CommunityRecipe(id) => {
                self.recipes.find_user_recipe(id).await?.is_some()
                    || self.recipes.find_curated_recipe(id).await?.is_some()
            }
        };

        if found {
            Ok(())
        } else {
            Err(AppError::NotFound(match target {
                Target::Post(id) => format!("Post '{id}' not found"),
                Target::CatalogRecipe(id) | Target::CommunityRecipe(id) => {
                    format!("Recipe '{id}' not found")
                }
            }))
        }
    }
}
