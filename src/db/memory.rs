use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::db::comment_repository::CommentRepository;
use crate::db::like_repository::LikeRepository;
use crate::db::models::{Comment, CommentParent, Like, LikeSubject, Post, UserRecipe};
use crate::db::post_repository::PostRepository;
use crate::db::recipe_repository::RecipeRepository;
use crate::error::AppError;

/// In-process document store used in demo mode and tests.
///
/// Mirrors the remote store's contract: whole-collection reads, single
/// document writes, no uniqueness constraints.
#[derive(Default)]
pub struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    likes: Mutex<Vec<Like>>,
    user_recipes: Mutex<Vec<UserRecipe>>,
    curated_recipes: Mutex<Vec<UserRecipe>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a curated recipe. The curated collection has no write path in the
    /// application itself.
    pub fn add_curated_recipe(&self, recipe: UserRecipe) {
        lock(&self.curated_recipes).push(recipe);
    }

    /// Number of like records currently stored.
    pub fn like_count(&self) -> usize {
        lock(&self.likes).len()
    }

    /// Number of comments currently stored.
    pub fn comment_count(&self) -> usize {
        lock(&self.comments).len()
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Post>, AppError> {
        let mut posts = lock(&self.posts).clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, AppError> {
        Ok(lock(&self.posts)
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, AppError> {
        Ok(lock(&self.posts).iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<(), AppError> {
        lock(&self.posts).push(post);
        Ok(())
    }

    async fn set_views(&self, id: &str, views: u32) -> Result<(), AppError> {
        if let Some(post) = lock(&self.posts).iter_mut().find(|p| p.id == id) {
            post.views = views;
        }
        Ok(())
    }

    async fn set_comment_count(&self, id: &str, comments: u32) -> Result<(), AppError> {
        if let Some(post) = lock(&self.posts).iter_mut().find(|p| p.id == id) {
            post.comments = comments;
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: Comment) -> Result<(), AppError> {
        lock(&self.comments).push(comment);
        Ok(())
    }

    async fn list_for_parent(&self, parent: &CommentParent) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = lock(&self.comments)
            .iter()
            .filter(|c| c.parent().as_ref() == Some(parent))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = lock(&self.comments)
            .iter()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn find(&self, subject: &LikeSubject, user_id: &str) -> Result<Vec<Like>, AppError> {
        Ok(lock(&self.likes)
            .iter()
            .filter(|l| l.matches(subject, user_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, like: Like) -> Result<(), AppError> {
        lock(&self.likes).push(like);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        lock(&self.likes).retain(|l| l.id != id);
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Like>, AppError> {
        Ok(lock(&self.likes)
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn list_user_recipes(&self) -> Result<Vec<UserRecipe>, AppError> {
        let mut recipes = lock(&self.user_recipes).clone();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn list_curated_recipes(&self) -> Result<Vec<UserRecipe>, AppError> {
        Ok(lock(&self.curated_recipes).clone())
    }

    async fn find_user_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError> {
        Ok(lock(&self.user_recipes).iter().find(|r| r.id == id).cloned())
    }

    async fn find_curated_recipe(&self, id: &str) -> Result<Option<UserRecipe>, AppError> {
        Ok(lock(&self.curated_recipes)
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn insert_user_recipe(&self, recipe: UserRecipe) -> Result<(), AppError> {
        lock(&self.user_recipes).push(recipe);
        Ok(())
    }

    async fn delete_user_recipe(&self, id: &str) -> Result<(), AppError> {
        lock(&self.user_recipes).retain(|r| r.id != id);
        Ok(())
    }
}
