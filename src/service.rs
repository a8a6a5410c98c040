use chrono::Utc;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::{query_as, Pool, Sqlite};

use crate::model::{Todo, TodoList, User};

// True when the database rejected a write for a duplicate unique key. The
// pre-checks in the handlers race with concurrent writers; the constraint
// is authoritative and this classifies its failure.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::UniqueViolation)
    )
}

// Fields required to persist a new account; the password is already hashed.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

pub struct UserService<'a> {
    db: &'a Pool<Sqlite>,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(
            "SELECT username, email, name, password_hash, registration_time \
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.db)
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(
            "SELECT username, email, name, password_hash, registration_time \
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.db)
        .await
    }

    // Inserts a new user row. Uniqueness of username and email is the
    // caller's pre-check plus the table constraints.
    pub async fn create(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        query_as::<_, User>(
            "INSERT INTO users (username, email, name, password_hash, registration_time) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING username, email, name, password_hash, registration_time",
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.name)
        .bind(new_user.password_hash)
        .bind(Utc::now())
        .fetch_one(self.db)
        .await
    }
}

pub struct ListService<'a> {
    db: &'a Pool<Sqlite>,
}

impl<'a> ListService<'a> {
    pub fn new(db: &'a Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<TodoList>, sqlx::Error> {
        query_as::<_, TodoList>(
            "SELECT id, username, name, registration_time FROM lists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db)
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<TodoList>, sqlx::Error> {
        query_as::<_, TodoList>(
            "SELECT id, username, name, registration_time FROM lists WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.db)
        .await
    }

    // All lists owned by one user
    pub async fn lists_for_user(&self, username: &str) -> Result<Vec<TodoList>, sqlx::Error> {
        query_as::<_, TodoList>(
            "SELECT id, username, name, registration_time \
             FROM lists WHERE username = ? ORDER BY id",
        )
        .bind(username)
        .fetch_all(self.db)
        .await
    }

    pub async fn create(&self, username: &str, name: &str) -> Result<TodoList, sqlx::Error> {
        query_as::<_, TodoList>(
            "INSERT INTO lists (username, name, registration_time) VALUES (?, ?, ?) \
             RETURNING id, username, name, registration_time",
        )
        .bind(username)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.db)
        .await
    }
}

pub struct TodoService<'a> {
    db: &'a Pool<Sqlite>,
}

impl<'a> TodoService<'a> {
    pub fn new(db: &'a Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(
            "SELECT id, list_id, title, description, completed, registration_time \
             FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db)
        .await
    }

    // Titles are unique within one list, not across lists.
    pub async fn find_by_title_in_list(
        &self,
        list_id: i64,
        title: &str,
    ) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(
            "SELECT id, list_id, title, description, completed, registration_time \
             FROM todos WHERE list_id = ? AND title = ?",
        )
        .bind(list_id)
        .bind(title)
        .fetch_optional(self.db)
        .await
    }

    // All todos attached to one list
    pub async fn todos_for_list(&self, list_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
        query_as::<_, Todo>(
            "SELECT id, list_id, title, description, completed, registration_time \
             FROM todos WHERE list_id = ? ORDER BY id",
        )
        .bind(list_id)
        .fetch_all(self.db)
        .await
    }

    pub async fn create(
        &self,
        list_id: i64,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Todo, sqlx::Error> {
        query_as::<_, Todo>(
            "INSERT INTO todos (list_id, title, description, completed, registration_time) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, list_id, title, description, completed, registration_time",
        )
        .bind(list_id)
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(Utc::now())
        .fetch_one(self.db)
        .await
    }
}
