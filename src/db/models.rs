use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::models::SessionUser;

/// Collection holding free-board posts.
pub const POSTS_COLLECTION: &str = "posts";
/// Collection holding comments on posts and recipes.
pub const COMMENTS_COLLECTION: &str = "comments";
/// Collection holding like records.
pub const LIKES_COLLECTION: &str = "likes";
/// Collection holding recipes submitted by users.
pub const USER_RECIPES_COLLECTION: &str = "userRecipe";
/// Collection holding the curated, read-only community recipes.
pub const CURATED_RECIPES_COLLECTION: &str = "testRecipe";

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A free-board post stored in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Identifier of the author's account.
    pub author_id: String,
    /// Display name of the author (their email).
    pub author: String,
    /// Raw markup produced by the rich-text editor.
    pub content: String,
    #[serde(with = "crate::db::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Denormalized comment counter.
    #[serde(default)]
    pub comments: u32,
    /// Denormalized view counter.
    #[serde(default)]
    pub views: u32,
}

impl Post {
    pub fn new(author: &SessionUser, title: String, content: String) -> Self {
        Self {
            id: new_id(),
            title,
            author_id: author.user_id.clone(),
            author: author.email.clone(),
            content,
            created_at: Utc::now(),
            comments: 0,
            views: 0,
        }
    }
}

/// The single parent a comment belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentParent {
    Post(String),
    Recipe(String),
}

/// A comment stored in the `comments` collection.
///
/// Exactly one of `post_id` / `recipe_id` is set; [`Comment::new`] is the
/// only constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author: String,
    pub body: String,
    #[serde(with = "crate::db::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

impl Comment {
    pub fn new(author: &SessionUser, parent: CommentParent, body: String) -> Self {
        let (post_id, recipe_id) = match parent {
            CommentParent::Post(id) => (Some(id), None),
            CommentParent::Recipe(id) => (None, Some(id)),
        };

        Self {
            id: new_id(),
            author_id: author.user_id.clone(),
            author: author.email.clone(),
            body,
            created_at: Utc::now(),
            post_id,
            recipe_id,
        }
    }

    pub fn parent(&self) -> Option<CommentParent> {
        match (&self.post_id, &self.recipe_id) {
            (Some(id), None) => Some(CommentParent::Post(id.clone())),
            (None, Some(id)) => Some(CommentParent::Recipe(id.clone())),
            _ => None,
        }
    }
}

/// Kind of content a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Post,
    Recipe,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Post => "post",
            SubjectKind::Recipe => "recipe",
        }
    }
}

/// The content a like refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LikeSubject {
    pub kind: SubjectKind,
    pub id: String,
}

impl LikeSubject {
    pub fn post(id: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::Post,
            id: id.into(),
        }
    }

    pub fn recipe(id: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::Recipe,
            id: id.into(),
        }
    }
}

/// A like record stored in the `likes` collection.
///
/// `(subject_kind, subject_id, user_id)` is meant to be unique, but only a
/// read-before-write check backs that up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub subject_kind: SubjectKind,
    pub subject_id: String,
    pub user_id: String,
    #[serde(with = "crate::db::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(subject: &LikeSubject, user_id: &str) -> Self {
        Self {
            id: new_id(),
            subject_kind: subject.kind,
            subject_id: subject.id.clone(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, subject: &LikeSubject, user_id: &str) -> bool {
        self.subject_kind == subject.kind && self.subject_id == subject.id && self.user_id == user_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCategory {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub ingredient: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeInfo {
    #[serde(default)]
    pub servings: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A community recipe, stored in `userRecipe` (user submissions) or
/// `testRecipe` (curated entries, which have no owner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: RecipeCategory,
    #[serde(default)]
    pub info: RecipeInfo,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    /// Named image URLs, e.g. `main-image`.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    /// Owner's account id; empty for curated recipes.
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "Utc::now", with = "crate::db::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl UserRecipe {
    pub fn new(author: &SessionUser, request: NewRecipeRequest) -> Self {
        Self {
            id: new_id(),
            title: request.title,
            description: request.description,
            category: request.category,
            info: request.info,
            ingredients: request.ingredients,
            steps: request.steps,
            images: request.images,
            author_id: author.user_id.clone(),
            author: author.email.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn main_image(&self) -> Option<&str> {
        self.images.get("main-image").map(String::as_str)
    }

    pub fn is_owned_by(&self, user: &SessionUser) -> bool {
        !self.author_id.is_empty() && self.author_id == user.user_id
    }
}

/// Request body for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostRequest {
    pub title: String,
    pub content: String,
}

/// Request body for submitting a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommentRequest {
    pub body: String,
}

/// Request body for submitting a recipe. Image URLs come from prior uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: RecipeCategory,
    #[serde(default)]
    pub info: RecipeInfo,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            user_id: "demo-cook".to_string(),
            email: "cook@demo.potluck.dev".to_string(),
        }
    }

    #[test]
    fn test_comment_has_exactly_one_parent() {
        let on_post = Comment::new(&user(), CommentParent::Post("p1".into()), "hi".into());
        assert_eq!(on_post.parent(), Some(CommentParent::Post("p1".into())));
        assert!(on_post.recipe_id.is_none());

        let on_recipe = Comment::new(&user(), CommentParent::Recipe("r1".into()), "yum".into());
        assert_eq!(on_recipe.parent(), Some(CommentParent::Recipe("r1".into())));
        assert!(on_recipe.post_id.is_none());
    }

    #[test]
    fn test_comment_serialization_skips_missing_parent() {
        let comment = Comment::new(&user(), CommentParent::Post("p1".into()), "hi".into());
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["post_id"], "p1");
        assert!(json.get("recipe_id").is_none());
    }

    #[test]
    fn test_created_at_is_stored_fixed_width() {
        use chrono::TimeZone;

        let mut post = Post::new(&user(), "Kimchi tips".into(), String::new());
        post.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00.000000Z");

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, post.created_at);
    }

    #[test]
    fn test_new_post_starts_with_zero_counters() {
        let post = Post::new(&user(), "Kimchi tips".into(), "<p>Salt first</p>".into());
        assert_eq!(post.comments, 0);
        assert_eq!(post.views, 0);
        assert_eq!(post.author_id, "demo-cook");
        assert_eq!(post.author, "cook@demo.potluck.dev");
    }

    #[test]
    fn test_like_matches() {
        let like = Like::new(&LikeSubject::recipe("28"), "demo-cook");
        assert!(like.matches(&LikeSubject::recipe("28"), "demo-cook"));
        assert!(!like.matches(&LikeSubject::post("28"), "demo-cook"));
        assert!(!like.matches(&LikeSubject::recipe("28"), "someone-else"));
    }

    #[test]
    fn test_subject_kind_serialization() {
        assert_eq!(serde_json::to_string(&SubjectKind::Recipe).unwrap(), "\"recipe\"");
        assert_eq!(SubjectKind::Post.as_str(), "post");
    }

    #[test]
    fn test_new_recipe_is_owned_by_author() {
        let request: NewRecipeRequest = serde_json::from_value(serde_json::json!({
            "title": "Egg Rice",
            "ingredients": [{ "name": "egg", "quantity": "2" }]
        }))
        .unwrap();

        let recipe = UserRecipe::new(&user(), request);
        assert!(recipe.is_owned_by(&user()));
        assert_eq!(recipe.ingredients[0].unit, "");
        assert_eq!(recipe.author, "cook@demo.potluck.dev");
    }

    #[test]
    fn test_curated_recipe_defaults() {
        // Curated documents carry only a subset of the fields.
        let json = r###"{
            "id": "curated-1",
            "title": "Doenjang Jjigae",
            "images": { "main-image": "https://img.example/jjigae.png" }
        }"###;

        let recipe: UserRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.author_id, "");
        assert!(recipe.steps.is_empty());
        assert_eq!(recipe.main_image(), Some("https://img.example/jjigae.png"));
        assert!(!recipe.is_owned_by(&user()));
    }
}
