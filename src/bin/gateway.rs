use anyhow::Context;
use cep_weather::app::{build_gateway, gateway_router, serve};
use cep_weather::utils::{logger, telemetry};
use cep_weather::{CliConfig, ServiceRole};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let role = ServiceRole::Gateway;

    let config = match cli.load(role) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logger::init_logger(config.logging.format, cli.verbose);
    tracing::info!(
        "Starting cep-gateway, forwarding to {} ({:?} validation)",
        config.backend.endpoint,
        config.gateway.validation
    );

    let guard = telemetry::init_telemetry(&config.telemetry, config.service_name(role))?;
    let gateway = build_gateway(&config, guard.telemetry())?;

    serve(gateway_router(gateway), config.bind_address(role))
        .await
        .context("HTTP server failed")?;

    guard.finish();
    tracing::info!("✅ cep-gateway stopped");
    Ok(())
}
