//! kiln core
//!
//! インベントリ（ビルド・テスト対象イメージの宣言）のデータモデルと、
//! YAMLからの読み込み・正規化・検証を提供します。

pub mod error;
pub mod loader;
pub mod model;

pub use error::{InventoryError, Result};
pub use loader::{load_inventory, parse_inventory};
pub use model::{ImageDefinition, Inventory};
