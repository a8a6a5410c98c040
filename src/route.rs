use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/lists", get(get_lists).post(create_list))
        .route("/lists/:id", get(get_list))
        .route("/lists/:id/todos", get(get_todos_for_list))
        .route("/todos", post(create_todo))
        .route("/todos/:id", get(get_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/", get(health_checker_handler))
        .with_state(app_state);
    app
}
