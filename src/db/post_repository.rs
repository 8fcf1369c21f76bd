use async_trait::async_trait;

use crate::db::models::Post;
use crate::error::AppError;

/// Repository trait for free-board posts.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, AppError>;

    /// All posts written by the given account, in store order.
    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, AppError>;

    /// Find a post by its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, AppError>;

    /// Store a new post.
    async fn insert(&self, post: Post) -> Result<(), AppError>;

    /// Overwrite the view counter. Callers compute the new value themselves.
    async fn set_views(&self, id: &str, views: u32) -> Result<(), AppError>;

    /// Overwrite the comment counter. Callers compute the new value themselves.
    async fn set_comment_count(&self, id: &str, comments: u32) -> Result<(), AppError>;
}

/// MongoDB implementation of the PostRepository.
pub struct MongoPostRepository {
    collection: mongodb::Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(crate::db::models::POSTS_COLLECTION),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, AppError> {
        use mongodb::bson::doc;

        let cursor = self.collection.find(doc! { "author_id": author_id }).await?;
        crate::db::collect_cursor(cursor).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn insert(&self, post: Post) -> Result<(), AppError> {
        self.collection.insert_one(&post).await?;
        Ok(())
    }

    async fn set_views(&self, id: &str, views: u32) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let views = i64::from(views);
        self.collection
            .update_one(doc! { "id": id }, doc! { "$set": { "views": views } })
            .await?;
        Ok(())
    }

    async fn set_comment_count(&self, id: &str, comments: u32) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let comments = i64::from(comments);
        self.collection
            .update_one(doc! { "id": id }, doc! { "$set": { "comments": comments } })
            .await?;
        Ok(())
    }
}
