use galleria_core::Config;

// Use mimalloc as the global allocator for lower fragmentation in containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    galleria_api::telemetry::init_telemetry(config.log_format())?;

    config.validate()?;
    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let (_state, router) = galleria_api::setup::initialize_app(config.clone()).await?;

    galleria_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
