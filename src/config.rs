use crate::application::context::{ShopContext, ShopSettings};
use crate::domain::coins::Coins;
use crate::domain::label::NameFormat;
use crate::domain::tag::Catalog;
use crate::error::{Result, ShopError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Shop configuration as read from YAML.
///
/// ```yaml
/// tags:
///   - "&6VIP:100"
///   - "&cLegend:500"
/// display-name-format: "{label} {tag}"
/// economy:
///   enabled: true
///   starting-balances:
///     alice: 150
/// data-location: data/ownership
/// log-level: info
/// ```
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ShopConfig {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub display_name_format: Option<String>,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default = "default_data_location")]
    pub data_location: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EconomyConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Seeds the in-memory ledger. Ignored by external ledgers.
    #[serde(default)]
    pub starting_balances: BTreeMap<String, Coins>,
}

fn default_data_location() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            display_name_format: None,
            economy: EconomyConfig::default(),
            data_location: default_data_location(),
            log_level: default_log_level(),
        }
    }
}

impl ShopConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ShopError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ShopError::Config(e.to_string()))
    }

    /// Parses the catalog and freezes everything the engine needs.
    pub fn to_context(&self) -> Result<ShopContext> {
        let catalog = Catalog::parse(&self.tags)?;
        let settings = ShopSettings {
            name_format: NameFormat::new(self.display_name_format.as_deref()),
            data_location: self.data_location.clone(),
        };
        Ok(ShopContext::new(catalog, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::TagId;

    #[test]
    fn test_full_config() {
        let config = ShopConfig::from_yaml(
            r#"
tags:
  - "&6VIP:100"
  - "Legend:500"
display-name-format: "{tag} {label}"
economy:
  enabled: true
  starting-balances:
    alice: 150
data-location: /var/lib/tagshop
log-level: debug
"#,
        )
        .unwrap();

        assert!(config.economy.enabled);
        assert_eq!(config.economy.starting_balances["alice"], Coins::new(150));
        assert_eq!(config.log_level, "debug");

        let context = config.to_context().unwrap();
        assert_eq!(context.catalog.name(TagId(0)), Some("§6VIP§r"));
        assert_eq!(context.settings.name_format.as_str(), "{tag} {label}");
        assert_eq!(context.settings.data_location, PathBuf::from("/var/lib/tagshop"));
    }

    #[test]
    fn test_defaults() {
        let config = ShopConfig::from_yaml("display-name-format: \"\"\n").unwrap();
        let context = config.to_context().unwrap();

        assert!(!config.economy.enabled);
        assert!(context.catalog.is_empty());
        assert_eq!(context.settings.name_format, NameFormat::default());
    }

    #[test]
    fn test_bad_catalog_entry() {
        let config = ShopConfig::from_yaml("tags:\n  - \"Broken\"\n").unwrap();
        assert!(matches!(config.to_context(), Err(ShopError::Config(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            ShopConfig::from_yaml("tags: [unterminated"),
            Err(ShopError::Config(_))
        ));
    }
}
