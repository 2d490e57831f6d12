#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

/// 三種部署角色：單體、閘道、解析後端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Monolith,
    Gateway,
    Resolver,
}

impl ServiceRole {
    pub fn default_bind(self) -> &'static str {
        match self {
            ServiceRole::Monolith | ServiceRole::Gateway => "0.0.0.0:8080",
            ServiceRole::Resolver => "0.0.0.0:8081",
        }
    }

    pub fn default_service_name(self) -> &'static str {
        match self {
            ServiceRole::Monolith => "cep-weather",
            ServiceRole::Gateway => "cep-gateway",
            ServiceRole::Resolver => "cep-resolver",
        }
    }
}
