//! インベントリローダー
//!
//! ファイル読み込み、YAMLパース、検証、パス解決を統合

use crate::error::{InventoryError, Result};
use crate::model::Inventory;
use std::path::Path;
use tracing::{debug, info, instrument};

/// YAML文字列をパースして検証する
pub fn parse_inventory(content: &str) -> Result<Inventory> {
    let inventory: Inventory = serde_yaml::from_str(content)?;
    inventory.validate()?;
    Ok(inventory)
}

/// インベントリファイルを読み込む
///
/// `path` / `test` の相対パスはインベントリファイルのあるディレクトリ基準で解決する。
#[instrument(fields(path = %path.display()))]
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    debug!("Reading inventory file");
    let content = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let inventory = parse_inventory(&content)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let inventory = inventory.rebase(base_dir);

    info!(images = inventory.len(), "Inventory loaded");
    Ok(inventory)
}
