use std::{net::SocketAddr, sync::Arc};

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Server,
};
use tower_http::cors::CorsLayer;

use todo_auth_api::{config::Config, db, route::create_router, AppState};

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    // Connect to the database, creating the file on first run
    let pool = match db::connect(&config.database_url, 10).await {
        Ok(pool) => {
            tracing::info!("connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("failed to connect to the database: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = db::create_tables(&pool).await {
        tracing::error!("failed to create tables: {err}");
        std::process::exit(1);
    }

    let app_state = Arc::new(AppState { db: pool, config });

    // Configure CORS settings for the browser client
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let app = create_router(app_state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    tracing::info!("server started on {addr}");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
