pub mod auth;
pub mod board;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

pub use db::create_pool;
