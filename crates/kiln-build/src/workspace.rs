//! ワーカー専用の作業ディレクトリ
//!
//! パスはワーカーIDから決まり、実行中に変わらない。
//! 同時に動くワーカー同士が同じディレクトリを使うことはなく、
//! 同じワーカーの後続ジョブは使用前のリセットで前回の残骸を消す。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// テストのビルド定義ファイル名
pub const DOCKERFILE: &str = "Dockerfile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// `<root>/worker-<id>`
    pub fn for_worker(root: &Path, worker_id: usize) -> Self {
        Self {
            path: root.join(format!("worker-{}", worker_id)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 全ワーカーのワークスペースを置くディレクトリ
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.path.join(DOCKERFILE)
    }

    /// 削除してから空のディレクトリを作り直す
    pub fn reset(&self) -> io::Result<()> {
        self.clear()?;
        fs::create_dir_all(&self.path)
    }

    /// ディレクトリを削除（存在しなければ何もしない）
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
