use serde::{Deserialize, Serialize};
use std::fmt;

/// 請求本體：`{"cep": "01001000"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepRequest {
    pub cep: String,
}

/// A postal code that has passed one of the [`PostalCodeRule`](crate::utils::validation::PostalCodeRule) checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    pub(crate) fn from_checked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 非空的地名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality(String);

impl Locality {
    /// Returns `None` for empty or whitespace-only names.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality_rejects_empty() {
        assert!(Locality::new("").is_none());
        assert!(Locality::new("   ").is_none());
        assert_eq!(Locality::new("Recife").unwrap().as_str(), "Recife");
    }

    #[test]
    fn test_temperature_result_field_names() {
        let result = TemperatureResult {
            city: "Recife".to_string(),
            temp_c: 30.0,
            temp_f: 86.0,
            temp_k: 303.0,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"city":"Recife","temp_C":30.0,"temp_F":86.0,"temp_K":303.0}"#
        );
    }
}
