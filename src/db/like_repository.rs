use async_trait::async_trait;

use crate::db::models::{Like, LikeSubject};
use crate::error::AppError;

/// Repository trait for like records.
///
/// Nothing here enforces one like per (subject, user); callers check for
/// existing records before inserting.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Every like `user_id` left on `subject`. More than one can exist.
    async fn find(&self, subject: &LikeSubject, user_id: &str) -> Result<Vec<Like>, AppError>;

    /// Store a new like.
    async fn insert(&self, like: Like) -> Result<(), AppError>;

    /// Delete a like by its id.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Every like left by `user_id`.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Like>, AppError>;
}

/// MongoDB implementation of the LikeRepository.
pub struct MongoLikeRepository {
    collection: mongodb::Collection<Like>,
}

impl MongoLikeRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(crate::db::models::LIKES_COLLECTION),
        }
    }
}

#[async_trait]
impl LikeRepository for MongoLikeRepository {
    async fn find(&self, subject: &LikeSubject, user_id: &str) -> Result<Vec<Like>, AppError> {
        use mongodb::bson::doc;

        let filter = doc! {
            "subject_kind": subject.kind.as_str(),
            "subject_id": &subject.id,
            "user_id": user_id,
        };

        let cursor = self.collection.find(filter).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn insert(&self, like: Like) -> Result<(), AppError> {
        self.collection.insert_one(&like).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection.delete_one(doc! { "id": id }).await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Like>, AppError> {
        use mongodb::bson::doc;

        let cursor = self.collection.find(doc! { "user_id": user_id }).await?;
        crate::db::collect_cursor(cursor).await
    }
}
