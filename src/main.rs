use shop::{app, auth::services::bootstrap_manager, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "shop=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.listen_addr();
    let bootstrap = config.bootstrap_manager.clone();

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await;

    let state = AppState::from_pool(config, pool);
    if let Some(manager) = bootstrap {
        bootstrap_manager(state.users.as_ref(), &manager).await?;
    }

    app::serve(app::build_app(state), &addr).await
}
