use async_trait::async_trait;

use crate::db::models::UserRecipe;
use crate::error::AppError;

/// Repository trait for community recipes.
///
/// User submissions live in `userRecipe`; curated entries live in
/// `testRecipe` and are read-only.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All user-submitted recipes, newest first.
    async fn list_user_recipes(&self) -> Result<Vec<UserRecipe>, AppError>;

    /// All curated recipes, in store order.
    async fn list_curated_recipes(&self) -> Result<Vec<UserRecipe>, AppError>;

    async fn find_user_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError>;

    async fn find_curated_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError>;

    /// Store a new user recipe.
    async fn insert_user_recipe(&self, recipe: UserRecipe) -> Result<(), AppError>;

    /// Delete a user recipe. Ownership is checked by the caller.
    async fn delete_user_recipe(&self, id: &str) -> Result<(), AppError>;
}

/// MongoDB implementation of the RecipeRepository.
pub struct MongoRecipeRepository {
    user_recipes: mongodb::Collection<UserRecipe>,
    curated_recipes: mongodb::Collection<UserRecipe>,
}

impl MongoRecipeRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            user_recipes: db.collection(crate::db::models::USER_RECIPES_COLLECTION),
            curated_recipes: db.collection(crate::db::models::CURATED_RECIPES_COLLECTION),
        }
    }
}

#[async_trait]
impl RecipeRepository for MongoRecipeRepository {
    async fn list_user_recipes(&self) -> Result<Vec<UserRecipe>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.user_recipes.find(doc! {}).with_options(options).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn list_curated_recipes(&self) -> Result<Vec<UserRecipe>, AppError> {
        use mongodb::bson::doc;

        let cursor = self.curated_recipes.find(doc! {}).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn find_user_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError> {
        use mongodb::bson::doc;

        Ok(self.user_recipes.find_one(doc! { "id": id }).await?)
    }

    async fn find_curated_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError> {
        use mongodb::bson::doc;

        Ok(self.curated_recipes.find_one(doc! { "id": id }).await?)
    }

    async fn insert_user_recipe(&self, recipe: UserRecipe) -> Result<(), AppError> {
        self.user_recipes.insert_one(&recipe).await?;
        Ok(())
    }

    async fn delete_user_recipe(&self, id: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.user_recipes.delete_one(doc! { "id": id }).await?;
        Ok(())
    }
}
