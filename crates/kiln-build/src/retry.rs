//! リトライ付きの操作実行
//!
//! イメージのビルド、テストイメージのビルド、プッシュのすべてが
//! 同じリトライポリシーを共有する。

use crate::ops::{BuildOptions, Execution, ImageOps};
use crate::report::Report;
use std::path::Path;

/// リトライ対象の操作
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Build {
        name: &'a str,
        context: &'a Path,
        options: BuildOptions,
    },
    Push {
        name: &'a str,
    },
}

impl Operation<'_> {
    pub fn name(&self) -> &str {
        match self {
            Operation::Build { name, .. } | Operation::Push { name } => name,
        }
    }

    async fn execute(&self, ops: &dyn ImageOps) -> Execution {
        match *self {
            Operation::Build {
                name,
                context,
                options,
            } => ops.build(name, context, options).await,
            Operation::Push { name } => ops.push(name).await,
        }
    }
}

/// 最大 `retries + 1` 回まで操作を試行する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryingBuilder {
    retries: u32,
}

impl RetryingBuilder {
    pub fn new(retries: u32) -> Self {
        Self { retries }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// 操作を実行し、成功したら true を返す
    ///
    /// 各試行の出力は成否にかかわらずすべてレポートに残す。
    pub async fn run(&self, ops: &dyn ImageOps, operation: &Operation<'_>, report: &mut Report) -> bool {
        for remaining in (0..=self.retries).rev() {
            let execution = operation.execute(ops).await;
            report.command_output(&execution.output);

            match execution.result {
                Ok(()) => {
                    tracing::debug!(name = operation.name(), "Operation succeeded");
                    return true;
                }
                Err(error) => {
                    tracing::warn!(
                        name = operation.name(),
                        remaining,
                        "Operation failed: {}",
                        error
                    );
                    report.attempt_failed(&error, remaining);
                }
            }
        }

        false
    }
}
