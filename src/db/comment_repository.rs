use async_trait::async_trait;

use crate::db::models::{Comment, CommentParent};
use crate::error::AppError;

/// Repository trait for comments on posts and recipes.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a new comment.
    async fn insert(&self, comment: Comment) -> Result<(), AppError>;

    /// All comments attached to `parent`, oldest first.
    async fn list_for_parent(&self, parent: &CommentParent) -> Result<Vec<Comment>, AppError>;

    /// All comments written by the given account, newest first.
    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Comment>, AppError>;
}

/// MongoDB implementation of the CommentRepository.
pub struct MongoCommentRepository {
    collection: mongodb::Collection<Comment>,
}

impl MongoCommentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(crate::db::models::COMMENTS_COLLECTION),
        }
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<(), AppError> {
        self.collection.insert_one(&comment).await?;
        Ok(())
    }

    async fn list_for_parent(&self, parent: &CommentParent) -> Result<Vec<Comment>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let filter = match parent {
            CommentParent::Post(id) => doc! { "post_id": id },
            CommentParent::Recipe(id) => doc! { "recipe_id": id },
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Comment>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "author_id": author_id })
            .with_options(options)
            .await?;
        crate::db::collect_cursor(cursor).await
    }
}
