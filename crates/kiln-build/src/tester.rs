//! テスト実行
//!
//! ビルド済みイメージをベースに、宣言順に各テストコンテキストをビルドする。
//! テストコンテキストはワーカー専用のワークスペースにコピーし、
//! コピー側の Dockerfile の先頭に `FROM <image>` を挿入してからビルドする。
//! 元のテストコンテキストには一切手を加えない。

use crate::error::StageError;
use crate::fs::{copy_dir_excluding, prepend_to_file};
use crate::ops::{BuildOptions, ImageOps};
use crate::report::Report;
use crate::retry::{Operation, RetryingBuilder};
use crate::workspace::Workspace;
use kiln_core::ImageDefinition;
use std::path::{Path, PathBuf};

pub struct TestRunner<'a> {
    ops: &'a dyn ImageOps,
    workspace: &'a Workspace,
    retry: RetryingBuilder,
    options: BuildOptions,
}

impl<'a> TestRunner<'a> {
    pub fn new(
        ops: &'a dyn ImageOps,
        workspace: &'a Workspace,
        retry: RetryingBuilder,
        options: BuildOptions,
    ) -> Self {
        Self {
            ops,
            workspace,
            retry,
            options,
        }
    }

    /// すべてのテストを実行し、全テスト成功なら true
    ///
    /// 1つのテストが失敗しても残りのテストは実行する。
    pub async fn run(&self, image: &ImageDefinition, report: &mut Report) -> bool {
        report.push(format!("Declared tests: {}\n\n", image.tests.len()));

        let mut success = true;
        for (index, test) in image.tests.iter().enumerate() {
            if !self.run_test(image, index, test, report).await {
                success = false;
            }
        }
        success
    }

    async fn run_test(
        &self,
        image: &ImageDefinition,
        index: usize,
        test: &Path,
        report: &mut Report,
    ) -> bool {
        report.push(format!("## Running test #{}\n\n", index + 1));

        let test_path = match std::fs::canonicalize(test) {
            Ok(path) => path,
            Err(e) => {
                report.push(format!(
                    "**Failed** Could not get path to file `{}`: `{}`\n\n",
                    test.display(),
                    e
                ));
                return false;
            }
        };

        report.push(format!("Copying `{}` to workspace\n\n", test_path.display()));
        tracing::debug!(
            image = %image.name,
            workspace = %self.workspace.path().display(),
            "Staging test #{}",
            index + 1
        );

        let contents = match self.stage(&image.name, test_path).await {
            Ok(contents) => contents,
            Err(e) => {
                report.push(format!(
                    "**Failed** Could not stage test `{}`: `{}`\n\n",
                    test.display(),
                    e
                ));
                return false;
            }
        };
        report.push(format!("Contents of Dockerfile:\n\n```\n{}\n```\n\n", contents));

        let test_image = image.test_image_name(index);
        report.push(format!("Building `{}` from workspace\n\n", test_image));

        let operation = Operation::Build {
            name: &test_image,
            context: self.workspace.path(),
            options: self.options,
        };
        self.retry.run(self.ops, &operation, report).await
    }

    /// ワークスペースを準備し、書き換え後の Dockerfile の内容を返す
    async fn stage(&self, base_image: &str, test_path: PathBuf) -> Result<String, StageError> {
        let workspace = self.workspace.clone();
        let from = format!("FROM {}\n", base_image);

        tokio::task::spawn_blocking(move || stage_test(&workspace, &from, &test_path))
            .await
            .map_err(|e| StageError::Aborted(e.to_string()))?
    }
}

fn stage_test(workspace: &Workspace, from: &str, test_path: &Path) -> Result<String, StageError> {
    workspace.reset().map_err(|source| StageError::Reset {
        path: workspace.path().to_path_buf(),
        source,
    })?;

    // テストコンテキストがワークスペースのルートを含んでいても取り込まない
    let root = std::fs::canonicalize(workspace.root()).map_err(|source| StageError::Reset {
        path: workspace.root().to_path_buf(),
        source,
    })?;
    copy_dir_excluding(test_path, workspace.path(), Some(&root)).map_err(|source| StageError::Copy {
        from: test_path.to_path_buf(),
        to: workspace.path().to_path_buf(),
        source,
    })?;

    let dockerfile = workspace.dockerfile();
    prepend_to_file(&dockerfile, from).map_err(|source| StageError::Prepend {
        path: dockerfile.clone(),
        source,
    })?;

    std::fs::read_to_string(&dockerfile).map_err(|source| StageError::Read {
        path: dockerfile,
        source,
    })
}
