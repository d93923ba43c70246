use std::net::SocketAddr;

use recruitment_portal::{
    config::init_config,
    database::{pool::create_pool, seed::seed_default_admin},
    repository::Repositories,
    routes::build_router,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = init_config()?;

    let pool = create_pool(config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repos = Repositories::postgres(pool);
    seed_default_admin(repos.users.as_ref(), config).await?;

    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let app_state = AppState::new(config.clone(), repos);
    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
