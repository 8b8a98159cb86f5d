//! インベントリのデータモデル
//!
//! YAML形式：
//! ```yaml
//! images:
//!   - name: base
//!     path: ./base
//!     test: ./tests/base          # 単一 or リスト
//!     alias: [example/base:latest] # 単一 or リスト
//! ```

use crate::error::{InventoryError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// イメージ定義の一覧
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub images: Vec<ImageDefinition>,
}

impl Inventory {
    /// 名前の重複と空フィールドをチェック
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for (index, image) in self.images.iter().enumerate() {
            if image.name.trim().is_empty() {
                return Err(InventoryError::EmptyField {
                    index,
                    field: "name",
                });
            }
            if image.path.as_os_str().is_empty() {
                return Err(InventoryError::EmptyField {
                    index,
                    field: "path",
                });
            }
            if !seen.insert(image.name.as_str()) {
                return Err(InventoryError::DuplicateName(image.name.clone()));
            }
        }

        Ok(())
    }

    /// 相対パスを `base_dir` 基準の絶対パスに書き換える
    ///
    /// インベントリファイルの置き場所を基準にするため、ロード直後に一度だけ呼ぶ。
    pub fn rebase(mut self, base_dir: &Path) -> Self {
        for image in &mut self.images {
            image.path = base_dir.join(&image.path);
            for test in &mut image.tests {
                *test = base_dir.join(&*test);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// ビルド対象イメージの定義
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefinition {
    /// イメージ名（ビルド時のタグとしても使われる）
    pub name: String,
    /// ビルドコンテキストのパス
    pub path: PathBuf,
    /// テストコンテキストのパス（宣言順）
    #[serde(rename = "test", default, deserialize_with = "one_or_many")]
    pub tests: Vec<PathBuf>,
    /// 付与するタグ名
    #[serde(rename = "alias", default, deserialize_with = "one_or_many")]
    pub aliases: Vec<String>,
}

impl ImageDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_test(mut self, test: impl Into<PathBuf>) -> Self {
        self.tests.push(test.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// テストイメージ名: `<name>-test<index+1>`
    pub fn test_image_name(&self, index: usize) -> String {
        format!("{}-test{}", self.name, index + 1)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// 単一値・リストのどちらでも受け付け、`Vec` に正規化する
fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
