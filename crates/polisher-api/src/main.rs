use polisher_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, kv, separator, routes)
    let (state, router) = polisher_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    polisher_api::setup::server::start_server(&config, router, state.separation.shutdown.clone())
        .await?;

    Ok(())
}
