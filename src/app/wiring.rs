use crate::adapters::http::{BackendClient, ViaCepClient, WeatherApiClient};
use crate::config::toml_config::TomlConfig;
use crate::core::gateway::FrontGateway;
use crate::core::resolver::WeatherResolutionService;
use crate::core::trace::Telemetry;
use crate::utils::error::{ConfigError, ConfigResult};
use crate::utils::validation::validate_required_field;
use secrecy::SecretString;

fn client_error(e: reqwest::Error) -> ConfigError {
    ConfigError::HttpClient {
        message: e.without_url().to_string(),
    }
}

/// 以設定組裝 ViaCEP + WeatherAPI 解析服務 (單體與後端共用)
pub fn build_resolution_service(
    config: &TomlConfig,
    telemetry: Telemetry,
) -> ConfigResult<WeatherResolutionService<ViaCepClient, WeatherApiClient>> {
    let api_key = validate_required_field("weather.api_key", &config.weather.api_key)?;

    let location = ViaCepClient::new(&config.directory.url_template, config.directory.timeout())
        .map_err(client_error)?;
    let weather = WeatherApiClient::new(
        &config.weather.endpoint,
        SecretString::from(api_key.clone()),
        config.weather.timeout(),
    )
    .map_err(client_error)?;

    Ok(WeatherResolutionService::new(location, weather, telemetry))
}

pub fn build_gateway(config: &TomlConfig, telemetry: Telemetry) -> ConfigResult<FrontGateway<BackendClient>> {
    let forwarder =
        BackendClient::new(&config.backend.endpoint, config.backend.timeout()).map_err(client_error)?;
    Ok(FrontGateway::new(forwarder, config.gateway.validation, telemetry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_service_requires_api_key() {
        let config = TomlConfig::default();
        let err = build_resolution_service(&config, Telemetry::disabled()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_gateway_builds_from_defaults() {
        let config = TomlConfig::default();
        assert!(build_gateway(&config, Telemetry::disabled()).is_ok());
    }
}
