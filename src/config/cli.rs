use crate::config::{ServiceRole, TomlConfig};
use crate::utils::error::ConfigResult;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

/// 三個執行檔共用的命令列參數
#[derive(Debug, Clone, Parser)]
#[command(about = "Brazilian postal code to current temperature service")]
pub struct CliConfig {
    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Listen address, e.g. 0.0.0.0:8080")]
    pub bind: Option<String>,

    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    #[arg(long, env = "BACKEND_URL", help = "Resolver backend endpoint (gateway only)")]
    pub backend_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 讀取 TOML (若有)，套用命令列覆寫後依角色驗證
    pub fn load(&self, role: ServiceRole) -> ConfigResult<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        self.apply_overrides(&mut config);
        config.validate_for(role)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = Some(bind.clone());
        }
        if let Some(key) = &self.weather_api_key {
            config.weather.api_key = Some(key.clone());
        }
        if let Some(url) = &self.backend_url {
            config.backend.endpoint = url.clone();
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}
