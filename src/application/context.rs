use crate::domain::label::NameFormat;
use crate::domain::tag::Catalog;
use std::path::PathBuf;

/// Immutable settings handed to the engine at construction.
#[derive(Debug, Clone)]
pub struct ShopSettings {
    pub name_format: NameFormat,
    /// Where the backing store keeps its data. A hint only.
    pub data_location: PathBuf,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            name_format: NameFormat::default(),
            data_location: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShopContext {
    pub catalog: Catalog,
    pub settings: ShopSettings,
}

impl ShopContext {
    pub fn new(catalog: Catalog, settings: ShopSettings) -> Self {
        Self { catalog, settings }
    }
}
