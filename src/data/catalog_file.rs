use serde::{Deserialize, Serialize};

use crate::model::{CatalogError, ItemCatalog, ItemDefinition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(rename = "_source", default)]
    pub source: String,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

impl CatalogFile {
    pub fn into_catalog(self) -> Result<ItemCatalog, CatalogError> {
        ItemCatalog::new(self.items)
    }
}
