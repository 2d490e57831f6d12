use crate::config::ServiceRole;
use crate::utils::error::{ConfigError, ConfigResult};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url,
    validate_url_template, PostalCodeRule, Validate,
};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DIRECTORY_URL: &str = "https://viacep.com.br/ws/{cep}/json/";
pub const DEFAULT_WEATHER_URL: &str = "http://api.weatherapi.com/v1/current.json";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8081/weather";
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318/v1/traces";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub directory: DirectoryConfig,
    pub weather: WeatherConfig,
    pub backend: BackendConfig,
    pub gateway: GatewayConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub url_template: String,
    pub timeout_seconds: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_DIRECTORY_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_WEATHER_URL.to_string(),
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

// API key 不可出現在日誌中
impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub validation: PostalCodeRule,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub service_name: Option<String>,
    pub endpoint: String,
    pub timeout_ms: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: None,
            endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConfigError::Parse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEATHER_API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> ConfigResult<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self, role: ServiceRole) -> &str {
        self.server
            .bind
            .as_deref()
            .unwrap_or_else(|| role.default_bind())
    }

    pub fn service_name(&self, role: ServiceRole) -> &str {
        self.telemetry
            .service_name
            .as_deref()
            .unwrap_or_else(|| role.default_service_name())
    }

    /// 依服務角色驗證所需的區段
    pub fn validate_for(&self, role: ServiceRole) -> ConfigResult<()> {
        if let Some(bind) = &self.server.bind {
            validate_non_empty_string("server.bind", bind)?;
        }

        match role {
            ServiceRole::Monolith | ServiceRole::Resolver => {
                self.directory.validate()?;
                self.weather.validate()?;
            }
            ServiceRole::Gateway => {
                self.backend.validate()?;
            }
        }

        if self.telemetry.enabled {
            self.telemetry.validate()?;
        }

        tracing::debug!("✅ Configuration validation passed for {:?}", role);
        Ok(())
    }
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for DirectoryConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url_template("directory.url_template", &self.url_template, "{cep}")?;
        validate_range("directory.timeout_seconds", self.timeout_seconds, 1, 300)
    }
}

impl Validate for WeatherConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url("weather.endpoint", &self.endpoint)?;
        validate_range("weather.timeout_seconds", self.timeout_seconds, 1, 300)?;

        let api_key = validate_required_field("weather.api_key", &self.api_key)?;
        validate_non_empty_string("weather.api_key", api_key)?;
        if api_key.contains("${") {
            return Err(ConfigError::InvalidValue {
                field: "weather.api_key".to_string(),
                value: "[REDACTED]".to_string(),
                reason: "Unresolved environment variable placeholder".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for BackendConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url("backend.endpoint", &self.endpoint)?;
        validate_range("backend.timeout_seconds", self.timeout_seconds, 1, 300)
    }
}

impl Validate for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url("telemetry.endpoint", &self.endpoint)?;
        if let Some(name) = &self.service_name {
            validate_non_empty_string("telemetry.service_name", name)?;
        }
        Ok(())
    }
}
