use anyhow::Context;
use cep_weather::app::{build_resolution_service, monolith_router, serve};
use cep_weather::utils::{logger, telemetry};
use cep_weather::{CliConfig, ServiceRole};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let role = ServiceRole::Monolith;

    let config = match cli.load(role) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.logging.format, cli.verbose);
    tracing::info!("Starting cep-weather (single process)");
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let guard = telemetry::init_telemetry(&config.telemetry, config.service_name(role))?;
    let service = build_resolution_service(&config, guard.telemetry())?;

    serve(monolith_router(service), config.bind_address(role))
        .await
        .context("HTTP server failed")?;

    guard.finish();
    tracing::info!("✅ cep-weather stopped");
    Ok(())
}
