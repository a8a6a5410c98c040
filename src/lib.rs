use sqlx::{Pool, Sqlite};

pub mod authz;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod password;
pub mod route;
pub mod schema;
pub mod service;
pub mod token;

use crate::config::Config;

// Struct representing the application state shared with every handler
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Config,
}
