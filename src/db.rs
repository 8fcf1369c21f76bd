pub mod comment_repository;
pub mod like_repository;
pub mod memory;
pub mod models;
pub mod post_repository;
pub mod recipe_repository;
pub mod timestamp;

use futures::TryStreamExt;

use crate::error::AppError;

/// Drain a MongoDB cursor into a vector, keeping the server's order.
pub(crate) async fn collect_cursor<T>(mut cursor: mongodb::Cursor<T>) -> Result<Vec<T>, AppError>
where
    T: serde::de::DeserializeOwned + Send + Sync + Unpin,
{
    let mut documents = Vec::new();
    while let Some(doc) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        documents.push(doc);
    }

    Ok(documents)
}
