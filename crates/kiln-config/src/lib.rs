pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};

/// インベントリファイルのパスを直接指定する環境変数
pub const INVENTORY_PATH_ENV: &str = "KILN_INVENTORY_PATH";

/// 検索するファイル名（優先順）
const CANDIDATES: [&str; 2] = ["inventory.yml", "inventory.yaml"];

/// ワーカーごとの作業ディレクトリを置く場所（base_dir 相対）
const WORKSPACE_DIR: &str = ".kiln-work";

/// インベントリファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 KILN_INVENTORY_PATH (直接パス指定)
/// 2. カレントディレクトリ: inventory.yml, inventory.yaml
/// 3. ./.kiln/ ディレクトリ内: 同様の順序
pub fn find_inventory_file() -> Result<PathBuf> {
    if let Ok(inventory_path) = std::env::var(INVENTORY_PATH_ENV) {
        let path = PathBuf::from(inventory_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at a missing file: {}",
            INVENTORY_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    find_inventory_file_in(&current_dir)
}

/// 指定ディレクトリを起点にインベントリファイルを探す
pub fn find_inventory_file_in(dir: &Path) -> Result<PathBuf> {
    for filename in &CANDIDATES {
        let path = dir.join(filename);
        if path.is_file() {
            return Ok(path);
        }
    }

    let kiln_dir = dir.join(".kiln");
    if kiln_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = kiln_dir.join(filename);
            if path.is_file() {
                return Ok(path);
            }
        }
    }

    Err(ConfigError::InventoryNotFound)
}

/// インベントリの置き場所（相対パスの解決基準）
pub fn base_dir_of(inventory_path: &Path) -> PathBuf {
    match inventory_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// ワーカー作業ディレクトリのデフォルトルート
pub fn default_workspace_root(base_dir: &Path) -> PathBuf {
    base_dir.join(WORKSPACE_DIR)
}
