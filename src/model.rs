use chrono::{DateTime, Utc};

// A registered account. Deliberately not Serialize: the public wire form is
// schema::PublicUser, so the password hash can never leave the process.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub registration_time: DateTime<Utc>,
}

// A named to-do list owned by exactly one user
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct TodoList {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub registration_time: DateTime<Utc>,
}

// A to-do item attached to exactly one list
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Todo {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub registration_time: DateTime<Utc>,
}

// Identity attached to the request once the bearer token has been verified
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}
