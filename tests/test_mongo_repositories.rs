//! Repository behaviour against a real MongoDB. Needs Docker.

use potluck::auth::models::SessionUser;
use potluck::db::comment_repository::{CommentRepository, MongoCommentRepository};
use potluck::db::like_repository::{LikeRepository, MongoLikeRepository};
use potluck::db::models::{
    Comment, CommentParent, Like, LikeSubject, NewRecipeRequest, Post, UserRecipe,
    CURATED_RECIPES_COLLECTION,
};
use potluck::db::post_repository::{MongoPostRepository, PostRepository};
use potluck::db::recipe_repository::{MongoRecipeRepository, RecipeRepository};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

struct MongoEnv {
    _container: ContainerAsync<Mongo>,
    db: mongodb::Database,
}

async fn start_mongo() -> MongoEnv {
    let container = Mongo::default()
        .start()
        .await
        .expect("Failed to start MongoDB container");
    let port = container
        .get_host_port_ipv4(27017)
        .await
        .expect("Failed to get MongoDB port");

    let client = mongodb::Client::with_uri_str(format!("mongodb://127.0.0.1:{port}"))
        .await
        .expect("Failed to connect to MongoDB");

    MongoEnv {
        _container: container,
        db: client.database("potluck_test"),
    }
}

fn cook() -> SessionUser {
    SessionUser {
        user_id: "demo-cook".to_string(),
        email: "cook@demo.potluck.dev".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn post_counters_are_written_back() {
    let env = start_mongo().await;
    let repo = MongoPostRepository::new(&env.db);

    let post = Post::new(&cook(), "Dumplings".into(), "<p>pleat</p>".into());
    repo.insert(post.clone()).await.unwrap();
    repo.set_views(&post.id, 5).await.unwrap();
    repo.set_comment_count(&post.id, 2).await.unwrap();

    let stored = repo.find_by_id(&post.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 5);
    assert_eq!(stored.comments, 2);
    assert_eq!(repo.list_by_author("demo-cook").await.unwrap().len(), 1);
    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn comments_filter_by_parent() {
    let env = start_mongo().await;
    let repo = MongoCommentRepository::new(&env.db);

    for parent in [
        CommentParent::Post("p1".into()),
        CommentParent::Post("p1".into()),
        CommentParent::Recipe("p1".into()),
    ] {
        repo.insert(Comment::new(&cook(), parent, "nice".into()))
            .await
            .unwrap();
    }

    let on_post = repo
        .list_for_parent(&CommentParent::Post("p1".into()))
        .await
        .unwrap();
    assert_eq!(on_post.len(), 2);
    assert!(on_post.iter().all(|c| c.recipe_id.is_none()));

    let on_recipe = repo
        .list_for_parent(&CommentParent::Recipe("p1".into()))
        .await
        .unwrap();
    assert_eq!(on_recipe.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn likes_match_on_subject_and_user() {
    let env = start_mongo().await;
    let repo = MongoLikeRepository::new(&env.db);
    let subject = LikeSubject::recipe("28");

    let like = Like::new(&subject, "demo-cook");
    repo.insert(like.clone()).await.unwrap();
    repo.insert(Like::new(&LikeSubject::post("28"), "demo-cook"))
        .await
        .unwrap();

    assert_eq!(repo.find(&subject, "demo-cook").await.unwrap().len(), 1);
    assert!(repo.find(&subject, "demo-chef").await.unwrap().is_empty());

    repo.delete(&like.id).await.unwrap();
    assert!(repo.find(&subject, "demo-cook").await.unwrap().is_empty());
    assert_eq!(repo.list_by_user("demo-cook").await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn user_and_curated_recipes_live_apart() {
    let env = start_mongo().await;
    let repo = MongoRecipeRepository::new(&env.db);

    let request: NewRecipeRequest =
        serde_json::from_value(serde_json::json!({ "title": "Japchae" })).unwrap();
    let mine = UserRecipe::new(&cook(), request);
    repo.insert_user_recipe(mine.clone()).await.unwrap();

    let curated: UserRecipe = serde_json::from_value(serde_json::json!({
        "id": "curated-1",
        "title": "Bibimbap"
    }))
    .unwrap();
    env.db
        .collection::<UserRecipe>(CURATED_RECIPES_COLLECTION)
        .insert_one(&curated)
        .await
        .unwrap();

    assert_eq!(repo.list_user_recipes().await.unwrap().len(), 1);
    assert_eq!(repo.list_curated_recipes().await.unwrap().len(), 1);
    assert!(repo.find_user_recipe("curated-1").await.unwrap().is_none());
    assert!(repo.find_curated_recipe("curated-1").await.unwrap().is_some());

    repo.delete_user_recipe(&mine.id).await.unwrap();
    assert!(repo.find_user_recipe(&mine.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn newest_first_across_fractional_seconds() {
    use chrono::{Duration, TimeZone, Utc};

    let env = start_mongo().await;
    let repo = MongoPostRepository::new(&env.db);
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    for (title, at) in [
        ("whole second", base),
        ("half second", base + Duration::milliseconds(500)),
        ("next second", base + Duration::seconds(1)),
    ] {
        let mut post = Post::new(&cook(), title.into(), String::new());
        post.created_at = at;
        repo.insert(post).await.unwrap();
    }

    let titles: Vec<String> = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["next second", "half second", "whole second"]);
}
