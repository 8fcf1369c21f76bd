pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod demo_seeder;
pub mod error;
pub mod listing;
pub mod speech;
pub mod api {
    pub mod catalog;
    pub mod comments;
    pub mod errors;
    pub mod likes;
    pub mod posts;
    pub mod profile;
    pub mod recipes;
    pub mod target;
    pub mod upload;
}
pub mod rendering {
    pub mod markup;
}
pub mod storage {
    pub mod client;
}
