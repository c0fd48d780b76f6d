use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::SaveSnapshot;

pub fn save_to_json_string(snapshot: &SaveSnapshot) -> Result<String> {
    serde_json::to_string(snapshot).context("failed to serialize save snapshot to JSON")
}

pub fn load_from_json_string(json: &str) -> Result<SaveSnapshot> {
    serde_json::from_str(json).context("failed to parse save JSON")
}

pub fn export_to_base64(snapshot: &SaveSnapshot) -> Result<String> {
    let json = save_to_json_string(snapshot)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn import_from_base64(encoded: &str) -> Result<SaveSnapshot> {
    let trimmed = encoded.trim();
    let raw = STANDARD
        .decode(trimmed)
        .context("failed to decode base64 save code")?;
    let json = String::from_utf8(raw).context("decoded save code is not UTF-8")?;
    load_from_json_string(&json)
}
