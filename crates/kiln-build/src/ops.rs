//! イメージ操作の抽象化
//!
//! ビルドエンジン本体は実装しない。build / push / tag は外部プロセスとして
//! 扱い、結合出力と成否だけを受け取る。

use crate::error::OpError;
use async_trait::async_trait;
use std::path::Path;

/// ビルドオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// false の場合はレイヤーキャッシュを使わない（--no-cache）
    pub cache: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { cache: true }
    }
}

/// 1回の操作結果（stdout + stderr の結合出力と成否）
#[derive(Debug)]
pub struct Execution {
    pub output: String,
    pub result: Result<(), OpError>,
}

impl Execution {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            result: Ok(()),
        }
    }

    pub fn failure(output: impl Into<String>, error: OpError) -> Self {
        Self {
            output: output.into(),
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// イメージ操作のバックエンド
///
/// ワーカー間で共有されるため `Send + Sync` が必要。
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// `context` をビルドし、結果を `name` としてタグ付けする
    async fn build(&self, name: &str, context: &Path, options: BuildOptions) -> Execution;

    /// `name` をレジストリにプッシュする
    async fn push(&self, name: &str) -> Execution;

    /// `name` に別名 `alias` を付ける
    async fn tag(&self, name: &str, alias: &str) -> Execution;
}
