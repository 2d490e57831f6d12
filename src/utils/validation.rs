use crate::domain::model::PostalCode;
use crate::utils::error::{ConfigError, ConfigResult, PipelineError, Result};
use serde::Deserialize;
use url::Url;

pub const POSTAL_CODE_LENGTH: usize = 8;

pub trait Validate {
    fn validate(&self) -> ConfigResult<()>;
}

/// 郵遞區號檢查規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostalCodeRule {
    /// Trimmed, exactly eight ASCII digits.
    #[default]
    Strict,
    /// Untrimmed input of exactly eight characters, any content.
    LengthOnly,
}

impl PostalCodeRule {
    pub fn check(self, raw: &str) -> Result<PostalCode> {
        match self {
            PostalCodeRule::Strict => validate_postal_code(raw),
            PostalCodeRule::LengthOnly => {
                if raw.chars().count() != POSTAL_CODE_LENGTH {
                    return Err(PipelineError::invalid_input(format!(
                        "expected {} characters, got {}",
                        POSTAL_CODE_LENGTH,
                        raw.chars().count()
                    )));
                }
                Ok(PostalCode::from_checked(raw.to_string()))
            }
        }
    }
}

pub fn validate_postal_code(raw: &str) -> Result<PostalCode> {
    let cep = raw.trim();

    if cep.chars().count() != POSTAL_CODE_LENGTH {
        return Err(PipelineError::invalid_input(format!(
            "expected {} digits, got {} characters",
            POSTAL_CODE_LENGTH,
            cep.chars().count()
        )));
    }

    if !cep.chars().all(|c| c.is_ascii_digit()) {
        return Err(PipelineError::invalid_input("postal code must contain only digits"));
    }

    Ok(PostalCode::from_checked(cep.to_string()))
}

pub fn validate_url(field_name: &str, url_str: &str) -> ConfigResult<()> {
    if url_str.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::InvalidValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// The directory URL is a template; `{cep}` must be present and the rest must be a valid URL.
pub fn validate_url_template(field_name: &str, template: &str, placeholder: &str) -> ConfigResult<()> {
    if !template.contains(placeholder) {
        return Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: template.to_string(),
            reason: format!("Template must contain the {} placeholder", placeholder),
        });
    }
    validate_url(field_name, &template.replace(placeholder, "00000000"))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> ConfigResult<&'a T> {
    value.as_ref().ok_or_else(|| ConfigError::Missing {
        field: field_name.to_string(),
    })
}
