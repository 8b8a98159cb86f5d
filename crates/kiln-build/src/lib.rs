//! kiln build pipeline
//!
//! インベントリに宣言されたイメージを、固定サイズのワーカープールで
//! 並行にビルド・テスト・プッシュします。
//!
//! ```text
//! Dispatcher ──Job──▶ input queue ──▶ Worker 0..N ──Job──▶ Reporter ──▶ stdout
//!     ▲                                  │  RetryingBuilder            │
//!     └──────────── completion ──────────┼─ TestRunner (Workspace) ◀───┘
//! ```
//!
//! イメージ操作（docker build / push / tag）は [`ImageOps`] の背後にあり、
//! 既定の実装は `docker` CLIを呼び出す [`DockerCli`] です。

pub mod alias;
pub mod dispatcher;
pub mod docker;
pub mod error;
pub mod fs;
pub mod job;
pub mod ops;
pub mod report;
pub mod retry;
pub mod tester;
pub mod worker;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use alias::run_aliases;
pub use dispatcher::{Dispatcher, RunOptions, RunSummary};
pub use docker::DockerCli;
pub use error::{OpError, StageError};
pub use job::{Job, Pipeline};
pub use ops::{BuildOptions, Execution, ImageOps};
pub use report::Report;
pub use retry::{Operation, RetryingBuilder};
pub use tester::TestRunner;
pub use worker::Worker;
pub use workspace::Workspace;
