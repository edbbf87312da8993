use menu_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging) and configuration
    let config = setup_environment()?;

    print_banner();

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Menu server starting..."
    );

    // 2. Database, storage, QR generator, JWT
    let state = ServerState::initialize(&config).await?;

    // 3. HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
