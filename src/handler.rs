use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::model::CurrentUser;
use crate::schema::{CreateListSchema, CreateTodoSchema, LoginSchema, PublicUser, SignupSchema};
use crate::service::{is_unique_violation, ListService, NewUser, TodoService, UserService};
use crate::{authz, password, token, AppState};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Multi-user to-do list API with Rust, SQLX, SQLite, and Axum";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

// Handler for registering a new user
pub async fn signup(
    State(data): State<Arc<AppState>>,
    Json(body): Json<SignupSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserService::new(&data.db);

    // Check-then-create; the table constraints close the race window below.
    if users.find_by_username(&body.username).await?.is_some() {
        return Err(ApiError::Conflict {
            entity: "user",
            field: "username",
            value: body.username,
        });
    }
    if users.find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Conflict {
            entity: "user",
            field: "email",
            value: body.email,
        });
    }

    // The plaintext credential is hashed here and dropped; only the digest
    // is persisted.
    let password_hash = password::hash_password(&body.password).map_err(|_| ApiError::Internal)?;

    let username = body.username.clone();
    let user = match users
        .create(NewUser {
            username: body.username,
            email: body.email,
            name: body.name,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            // A concurrent signup won the race after our pre-check passed.
            return Err(ApiError::Conflict {
                entity: "user",
                field: "username",
                value: username,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let user_response = json!({"status": "success","data": json!({
        "user": PublicUser::from(user)
    })});

    Ok((StatusCode::CREATED, Json(user_response)))
}

// Handler for logging in and issuing a bearer token
pub async fn login(
    State(data): State<Arc<AppState>>,
    Json(body): Json<LoginSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserService::new(&data.db);

    // Unknown username and wrong password get the same response.
    let user = users
        .find_by_username(&body.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::sign_token(&user.username, &data.config).map_err(|_| ApiError::Internal)?;

    Ok((StatusCode::OK, Json(token)))
}

// Handler for getting the authenticated user's lists
pub async fn get_lists(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let lists = ListService::new(&data.db)
        .lists_for_user(&user.username)
        .await?;

    let json_response = json!({
        "status": "success",
        "results": lists.len(),
        "lists": lists
    });

    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for creating a new list owned by the authenticated user
pub async fn create_list(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateListSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let lists = ListService::new(&data.db);

    if lists.find_by_name(&body.name).await?.is_some() {
        return Err(ApiError::Conflict {
            entity: "list",
            field: "name",
            value: body.name,
        });
    }

    let list = match lists.create(&user.username, &body.name).await {
        Ok(list) => list,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::Conflict {
                entity: "list",
                field: "name",
                value: body.name,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let list_response = json!({"status": "success","data": json!({
        "list": list
    })});

    Ok((StatusCode::CREATED, Json(list_response)))
}

// Handler for getting a specific list by ID
pub async fn get_list(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    // Existence first, then ownership.
    let list = ListService::new(&data.db)
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound { what: "List", id })?;

    authz::ensure_owner(&authz::owner_of_list(&list), &user)?;

    let list_response = json!({"status": "success","data": json!({
        "list": list
    })});

    Ok((StatusCode::OK, Json(list_response)))
}

// Handler for getting all todos of a list
pub async fn get_todos_for_list(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let list = ListService::new(&data.db)
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound { what: "List", id })?;

    authz::ensure_owner(&authz::owner_of_list(&list), &user)?;

    let todos = TodoService::new(&data.db).todos_for_list(list.id).await?;

    let json_response = json!({
        "status": "success",
        "results": todos.len(),
        "todos": todos
    });

    Ok((StatusCode::OK, Json(json_response)))
}

// Handler for creating a new Todo under one of the user's lists
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateTodoSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let lists = ListService::new(&data.db);
    let todos = TodoService::new(&data.db);

    // Existence, then ownership, then uniqueness. The conflict check runs
    // only against a list the caller is allowed to see.
    let list = lists
        .find_by_id(body.list_id)
        .await?
        .ok_or(ApiError::NotFound {
            what: "List",
            id: body.list_id,
        })?;

    authz::ensure_owner(&authz::owner_of_list(&list), &user)?;

    if todos
        .find_by_title_in_list(list.id, &body.title)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            entity: "to-do",
            field: "title",
            value: body.title,
        });
    }

    let todo = match todos
        .create(list.id, &body.title, &body.description, body.completed)
        .await
    {
        Ok(todo) => todo,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::Conflict {
                entity: "to-do",
                field: "title",
                value: body.title,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let todo_response = json!({"status": "success","data": json!({
        "todo": todo
    })});

    Ok((StatusCode::CREATED, Json(todo_response)))
}

// Handler for getting a specific Todo by ID
pub async fn get_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = TodoService::new(&data.db)
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound { what: "To-do", id })?;

    // Ownership of a todo runs through its parent list.
    let owner = authz::owner_of_todo(&data.db, &todo).await?;
    authz::ensure_owner(&owner, &user)?;

    let todo_response = json!({"status": "success","data": json!({
        "todo": todo
    })});

    Ok((StatusCode::OK, Json(todo_response)))
}
