use sqlx::{Pool, Sqlite};

use crate::error::ApiError;
use crate::model::{CurrentUser, Todo, TodoList};
use crate::service::ListService;

// Outcome of walking a resource back to the user responsible for it.
// Malformed data (a todo whose list is gone) resolves to Unresolved instead
// of being skipped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Resolved(String),
    Unresolved,
}

// A list carries its owner directly.
pub fn owner_of_list(list: &TodoList) -> Owner {
    Owner::Resolved(list.username.clone())
}

// A todo resolves through its parent list.
pub async fn owner_of_todo(db: &Pool<Sqlite>, todo: &Todo) -> Result<Owner, sqlx::Error> {
    let list = ListService::new(db).find_by_id(todo.list_id).await?;

    Ok(match list {
        Some(list) => Owner::Resolved(list.username),
        None => Owner::Unresolved,
    })
}

// Grants access only when the chain ends at the authenticated user. An
// unresolved owner is denied, not ignored.
pub fn ensure_owner(owner: &Owner, user: &CurrentUser) -> Result<(), ApiError> {
    match owner {
        Owner::Resolved(username) if *username == user.username => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db;
    use crate::service::{NewUser, TodoService, UserService};

    fn current(username: &str) -> CurrentUser {
        CurrentUser {
            username: username.to_string(),
        }
    }

    #[test]
    fn grants_the_resolved_owner() {
        let owner = Owner::Resolved("alice".to_string());
        assert!(ensure_owner(&owner, &current("alice")).is_ok());
    }

    #[test]
    fn denies_a_different_user() {
        let owner = Owner::Resolved("alice".to_string());
        let result = ensure_owner(&owner, &current("bob"));
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[test]
    fn denies_when_the_owner_is_unresolved() {
        let result = ensure_owner(&Owner::Unresolved, &current("alice"));
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn todo_owner_resolves_through_its_list() {
        let pool = db::connect("sqlite::memory:", 1).await.expect("pool");
        db::create_tables(&pool).await.expect("tables");

        UserService::new(&pool)
            .create(NewUser {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
                name: "Alice".to_string(),
                password_hash: "salt$digest".to_string(),
            })
            .await
            .expect("user");
        let list = ListService::new(&pool)
            .create("alice", "Groceries")
            .await
            .expect("list");
        let todo = TodoService::new(&pool)
            .create(list.id, "Milk", "two liters", false)
            .await
            .expect("todo");

        let owner = owner_of_todo(&pool, &todo).await.expect("resolution");
        assert_eq!(owner, Owner::Resolved("alice".to_string()));
    }

    #[tokio::test]
    async fn todo_with_a_missing_list_is_unresolved() {
        let pool = db::connect("sqlite::memory:", 1).await.expect("pool");
        db::create_tables(&pool).await.expect("tables");

        // A row like this cannot be inserted through the services; build the
        // value directly to model malformed data.
        let orphan = Todo {
            id: 1,
            list_id: 999,
            title: "Milk".to_string(),
            description: String::new(),
            completed: false,
            registration_time: Utc::now(),
        };

        let owner = owner_of_todo(&pool, &orphan).await.expect("resolution");
        assert_eq!(owner, Owner::Unresolved);
    }
}
