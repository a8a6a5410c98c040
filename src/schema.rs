use serde::{Deserialize, Serialize};

use crate::model::User;

// Struct representing the request body for registering a new user
#[derive(Debug, Deserialize)]
pub struct SignupSchema {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

// Struct representing the request body for logging in
#[derive(Debug, Deserialize)]
pub struct LoginSchema {
    pub username: String,
    pub password: String,
}

// Struct representing the request body for creating a new list
#[derive(Debug, Deserialize)]
pub struct CreateListSchema {
    pub name: String,
}

// Struct representing the request body for creating a new Todo
#[derive(Debug, Deserialize)]
pub struct CreateTodoSchema {
    pub list_id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

// Public view of an account; never carries password material
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            name: user.name,
        }
    }
}
