use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;

use crate::api;
use crate::api::target::Lookup;
use crate::auth::demo_auth;
use crate::catalog::Catalog;
use crate::db::comment_repository::CommentRepository;
use crate::db::like_repository::LikeRepository;
use crate::db::memory::MemoryStore;
use crate::db::post_repository::PostRepository;
use crate::db::recipe_repository::RecipeRepository;
use crate::storage::client::StorageClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub post_repo: Arc<dyn PostRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub like_repo: Arc<dyn LikeRepository>,
    pub recipe_repo: Arc<dyn RecipeRepository>,
    pub storage_client: Arc<dyn StorageClient>,
    /// Official recipes, parsed once at startup.
    pub catalog: Arc<Catalog>,
    /// Signs and verifies the session cookie.
    pub session_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}

impl AppState {
    /// State backed entirely by one in-memory store, with a fresh random
    /// session key.
    pub fn in_memory(
        store: Arc<MemoryStore>,
        storage_client: Arc<dyn StorageClient>,
        catalog: Catalog,
    ) -> Self {
        Self {
            post_repo: store.clone(),
            comment_repo: store.clone(),
            like_repo: store.clone(),
            recipe_repo: store,
            storage_client,
            catalog: Arc::new(catalog),
            session_key: Key::generate(),
        }
    }

    pub fn lookup(&self) -> Lookup<'_> {
        Lookup {
            posts: self.post_repo.as_ref(),
            recipes: self.recipe_repo.as_ref(),
            catalog: &self.catalog,
        }
    }
}

/// Sign-in against the built-in demo accounts.
fn demo_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(demo_auth::login_handler))
        .route("/api/auth/me", get(demo_auth::me_handler))
        .route("/api/auth/logout", post(demo_auth::logout_handler))
}

/// All API routes. Static assets are layered on by the binary.
///
/// The demo sign-in routes are mounted only when `demo_auth` is set.
pub fn router(state: AppState, demo_auth: bool) -> Router {
    let routes = if demo_auth {
        demo_auth_routes()
    } else {
        Router::new()
    };

    routes
        // Home
        .route("/api/v1/home", get(api::catalog::home_handler))
        // Free board
        .route(
            "/api/v1/posts",
            get(api::posts::list_posts_handler).post(api::posts::create_post_handler),
        )
        .route("/api/v1/posts/{id}", get(api::posts::post_detail_handler))
        .route(
            "/api/v1/posts/{id}/narration",
            get(api::posts::post_narration_handler),
        )
        .route(
            "/api/v1/posts/{id}/comments",
            get(api::comments::list_post_comments_handler)
                .post(api::comments::submit_post_comment_handler),
        )
        .route(
            "/api/v1/posts/{id}/like",
            get(api::likes::post_like_status_handler).post(api::likes::toggle_post_like_handler),
        )
        // Official catalog
        .route("/api/v1/catalog", get(api::catalog::list_catalog_handler))
        .route("/api/v1/catalog/{id}", get(api::catalog::catalog_detail_handler))
        .route(
            "/api/v1/catalog/{id}/narration",
            get(api::catalog::catalog_narration_handler),
        )
        .route(
            "/api/v1/catalog/{id}/comments",
            get(api::comments::list_catalog_comments_handler)
                .post(api::comments::submit_catalog_comment_handler),
        )
        .route(
            "/api/v1/catalog/{id}/like",
            get(api::likes::catalog_like_status_handler)
                .post(api::likes::toggle_catalog_like_handler),
        )
        // Community recipes
        .route(
            "/api/v1/recipes",
            get(api::recipes::list_recipes_handler).post(api::recipes::create_recipe_handler),
        )
        .route(
            "/api/v1/recipes/{id}",
            get(api::recipes::recipe_detail_handler).delete(api::recipes::delete_recipe_handler),
        )
        .route(
            "/api/v1/recipes/{id}/narration",
            get(api::recipes::recipe_narration_handler),
        )
        .route(
            "/api/v1/recipes/{id}/comments",
            get(api::comments::list_recipe_comments_handler)
                .post(api::comments::submit_recipe_comment_handler),
        )
        .route(
            "/api/v1/recipes/{id}/like",
            get(api::likes::recipe_like_status_handler)
                .post(api::likes::toggle_recipe_like_handler),
        )
        // Profile
        .route("/api/v1/me/posts", get(api::profile::my_posts_handler))
        .route("/api/v1/me/comments", get(api::profile::my_comments_handler))
        .route("/api/v1/me/likes", get(api::profile::my_likes_handler))
        // Images
        .route(
            "/api/v1/upload-image",
            post(api::upload::upload_image_handler),
        )
        .route(
            "/api/v1/image/{filename}",
            get(api::upload::serve_image_handler),
        )
        .with_state(state)
}
