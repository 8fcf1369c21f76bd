use crate::auth::models::SessionUser;
use crate::catalog::Catalog;
use crate::db::memory::MemoryStore;
use crate::db::models::{Post, UserRecipe};
use crate::db::post_repository::PostRepository;
use crate::db::recipe_repository::RecipeRepository;
use crate::error::AppError;

const CURATED_RECIPES: &str = include_str!("../demo_data/curated_recipes.json");
const WELCOME_POST: &str = include_str!("../demo_data/welcome_post.html");
const DEMO_CATALOG: &str = include_str!("../demo_data/siterecipe.xml");

/// Small official catalog bundled with the binary, used in demo mode when
/// no catalog file is configured.
pub fn demo_catalog() -> Result<Catalog, AppError> {
    Catalog::from_xml(DEMO_CATALOG)
}

/// Fill an in-memory store with curated recipes and a welcome post. Entries
/// that already exist are skipped.
pub async fn seed_demo_data(store: &MemoryStore) {
    tracing::info!("Starting demo data seeding...");

    match serde_json::from_str::<Vec<UserRecipe>>(CURATED_RECIPES) {
        Ok(recipes) => {
            for recipe in recipes {
                match store.find_curated_recipe(&recipe.id).await {
                    Ok(Some(_)) => {
                        tracing::info!("Curated recipe '{}' already exists, skipping.", recipe.id);
                    }
                    Ok(None) => {
                        tracing::info!("Adding curated recipe '{}'.", recipe.id);
                        store.add_curated_recipe(recipe);
                    }
                    Err(e) => {
                        tracing::error!("Failed to check curated recipe '{}': {}", recipe.id, e)
                    }
                }
            }
        }
        Err(e) => tracing::error!("Bundled curated recipes are malformed: {e}"),
    }

    let board_admin = SessionUser {
        user_id: "demo-chef".to_string(),
        email: "chef@demo.potluck.dev".to_string(),
    };

    match store.list_by_author(&board_admin.user_id).await {
        Ok(existing) if !existing.is_empty() => {
            tracing::info!("Welcome post already exists, skipping.");
        }
        Ok(_) => {
            let post = Post::new(
                &board_admin,
                "Welcome to Potluck".to_string(),
                WELCOME_POST.to_string(),
            );
            if let Err(e) = PostRepository::insert(store, post).await {
                tracing::error!("Failed to insert welcome post: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to look up existing posts: {e}"),
    }

    tracing::info!("Demo data seeding completed.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_parses() {
        let catalog = demo_catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.find("31").map(|r| r.image.as_str()), Some("/svg/logo.svg"));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await;
        seed_demo_data(&store).await;

        assert_eq!(store.list_curated_recipes().await.unwrap().len(), 2);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
