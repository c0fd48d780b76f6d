use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::model::ItemCatalog;

use super::{CatalogFile, GameTuning};

const BUNDLED_CATALOG: &str = include_str!("../../data/item_catalog.json");

pub fn load_bundled_catalog() -> Result<ItemCatalog> {
    let file: CatalogFile =
        serde_json::from_str(BUNDLED_CATALOG).context("failed parsing bundled item catalog")?;
    let catalog = file
        .into_catalog()
        .context("bundled item catalog is misconfigured")?;
    log::info!("loaded bundled item catalog with {} items", catalog.len());
    Ok(catalog)
}

pub fn load_item_catalog_from_path(path: impl AsRef<Path>) -> Result<ItemCatalog> {
    let path = path.as_ref();
    let file: CatalogFile = read_json(path, "item catalog")?;
    let catalog = file
        .into_catalog()
        .with_context(|| format!("item catalog is misconfigured: {}", path.display()))?;
    log::info!(
        "loaded item catalog with {} items from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

pub fn load_tuning_from_path(path: impl AsRef<Path>) -> Result<GameTuning> {
    read_json(path.as_ref(), "tuning")
}

fn read_json<T>(path: &Path, label: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {label} file: {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing {label} file as JSON: {}", path.display()))
}
