//! ワーカー
//!
//! 共有の入力キューからジョブを取り出し、処理して Reporter へ渡す。
//! 受け取ったジョブは必ず1つの完了ジョブとして送り出す（取りこぼしなし）。
//! 入力キューが閉じられたらループを抜ける。

use crate::job::{Job, Pipeline};
use crate::ops::{BuildOptions, ImageOps};
use crate::report::Report;
use crate::retry::{Operation, RetryingBuilder};
use crate::tester::TestRunner;
use crate::workspace::Workspace;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub struct Worker {
    id: usize,
    ops: Arc<dyn ImageOps>,
    workspace: Workspace,
    options: BuildOptions,
}

impl Worker {
    pub fn new(
        id: usize,
        ops: Arc<dyn ImageOps>,
        workspace: Workspace,
        options: BuildOptions,
    ) -> Self {
        Self {
            id,
            ops,
            workspace,
            options,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// 入力キューが閉じられるまでジョブを処理する
    pub async fn run(self, input: Arc<Mutex<mpsc::Receiver<Job>>>, output: mpsc::Sender<Job>) {
        tracing::debug!(worker = self.id, "Worker started");

        loop {
            let next = input.lock().await.recv().await;
            let Some(job) = next else {
                break;
            };

            tracing::info!(
                worker = self.id,
                job = job.id,
                image = %job.image.name,
                "Job received"
            );
            let job = self.process_guarded(job).await;
            tracing::info!(
                worker = self.id,
                job = job.id,
                success = job.success,
                "Job finished"
            );

            if output.send(job).await.is_err() {
                tracing::error!(worker = self.id, "Reporter is gone, stopping worker");
                break;
            }
        }

        tracing::debug!(worker = self.id, "Worker stopped");
    }

    /// パニックしても失敗ジョブとして返す
    async fn process_guarded(&self, job: Job) -> Job {
        let id = job.id;
        let image = job.image.clone();
        let retries = job.retries;
        let pipeline = job.pipeline;

        match AssertUnwindSafe(self.process(job)).catch_unwind().await {
            Ok(job) => job,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::warn!(worker = self.id, job = id, "Job panicked: {}", message);

                let mut report = Report::new();
                report.push(pipeline.header(&image.name));
                report.push(format!("**Failed** worker panicked: `{}`\n\n", message));
                self.clear_workspace().await;

                Job::new(id, image, retries, pipeline).finish(false, report)
            }
        }
    }

    /// 1ジョブを処理する
    pub async fn process(&self, job: Job) -> Job {
        match job.pipeline {
            Pipeline::Test => self.build_and_test(job).await,
            Pipeline::Push => self.push(job).await,
        }
    }

    async fn build_and_test(&self, job: Job) -> Job {
        let mut report = Report::new();
        report.push(job.pipeline.header(&job.image.name));

        let retry = RetryingBuilder::new(job.retries);
        let operation = Operation::Build {
            name: &job.image.name,
            context: &job.image.path,
            options: self.options,
        };

        // ビルドできなかったイメージに対してテストは実行しない
        let success = if retry.run(self.ops.as_ref(), &operation, &mut report).await {
            let runner = TestRunner::new(self.ops.as_ref(), &self.workspace, retry, self.options);
            runner.run(&job.image, &mut report).await
        } else {
            false
        };

        self.clear_workspace().await;

        job.finish(success, report)
    }

    async fn push(&self, job: Job) -> Job {
        let mut report = Report::new();
        report.push(job.pipeline.header(&job.image.name));

        let retry = RetryingBuilder::new(job.retries);
        let operation = Operation::Push {
            name: &job.image.name,
        };
        let success = retry.run(self.ops.as_ref(), &operation, &mut report).await;

        job.finish(success, report)
    }

    /// 次のジョブに残骸を残さないよう、ワークスペースを削除する
    async fn clear_workspace(&self) {
        let workspace = self.workspace.clone();
        match tokio::task::spawn_blocking(move || workspace.clear()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(worker = self.id, "Failed to clear workspace: {}", e),
            Err(e) => tracing::warn!(worker = self.id, "Workspace cleanup aborted: {}", e),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
