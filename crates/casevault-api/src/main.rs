use casevault_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (repositories, storage, services, routes)
    let (_state, router) = casevault_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    casevault_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
