use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use assessment_backend::{
    config::{get_config, init_config},
    database::{pool::create_pool, postgres::PgAssessmentStore},
    middleware::cors::api_cors,
    routes,
    services::model_client::OpenAiClient,
    AppState,
};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,assessment_backend=debug,tower_http=info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    init_config()?;
    let config = get_config()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let http_client = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    if config.model.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
    }

    let model = Arc::new(OpenAiClient::new(config.model.clone(), http_client));
    let store = Arc::new(PgAssessmentStore::new(pool));
    let app_state = AppState::new(config, model, store);

    let app = routes::api_router(app_state, config.public_rps)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!(model = %config.model.model, "Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
