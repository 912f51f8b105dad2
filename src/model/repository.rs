//! Custom software repositories

use super::form::{check_required, field_value, parse_bool, FormError, FormField};
use super::platform::Platform;
use crate::grid::GridRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub kind: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl GridRecord for Repository {
    fn record_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepository {
    pub name: String,
    pub url: String,
    pub kind: String,
    pub enabled: bool,
}

impl NewRepository {
    pub fn form_fields(platform: Platform) -> Vec<FormField> {
        let kind = match platform {
            Platform::Android => "apk",
            Platform::Ios | Platform::Macos => "ipa",
            Platform::Windows => "msi",
            Platform::Linux => "apt",
        };
        vec![
            FormField::new("name", "Name", "").required(),
            FormField::new("url", "URL", "https://").required(),
            FormField::new("kind", "Package kind", kind),
            FormField::new("enabled", "Enabled", "yes"),
        ]
    }

    pub fn from_fields(fields: &[FormField]) -> Result<Self, FormError> {
        check_required(fields)?;
        let url = field_value(fields, "url");
        if !URL_REGEX.is_match(url) {
            return Err(FormError::OutOfRange {
                field: "url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        let enabled = match field_value(fields, "enabled") {
            "" => true,
            value => parse_bool("enabled", value)?,
        };
        Ok(Self {
            name: field_value(fields, "name").to_string(),
            url: url.to_string(),
            kind: field_value(fields, "kind").to_string(),
            enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> Vec<FormField> {
        let mut fields = NewRepository::form_fields(Platform::Linux);
        fields[0].value = "Internal mirror".to_string();
        fields[1].value = url.to_string();
        fields
    }

    #[test]
    fn test_url_validation() {
        assert!(NewRepository::from_fields(&with_url("https://repo.example.com/apt")).is_ok());
        assert!(NewRepository::from_fields(&with_url("ftp://repo.example.com")).is_err());
        assert!(NewRepository::from_fields(&with_url("https://")).is_err());
    }

    #[test]
    fn test_defaults_follow_platform() {
        let repo = NewRepository::from_fields(&with_url("http://10.0.0.5/pkgs")).unwrap();
        assert_eq!(repo.kind, "apt");
        assert!(repo.enabled);
    }

    #[test]
    fn test_enabled_defaults_to_true_when_missing() {
        let repo: Repository =
            serde_json::from_str(r#"{"id": "r1", "name": "m", "url": "https://x"}"#).unwrap();
        assert!(repo.enabled);
    }
}
