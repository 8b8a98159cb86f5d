//! Dispatcher / Reporter
//!
//! イメージごとに1ジョブを作成して N 個のワーカーに配り、
//! 完了ジョブは単一の Reporter が直列に出力する。
//! Dispatcher は全ジョブ分の完了通知を受け取るまで待機し、失敗数を返す。

use crate::job::{Job, Pipeline};
use crate::ops::{BuildOptions, ImageOps};
use crate::worker::Worker;
use crate::workspace::Workspace;
use futures_util::future::join_all;
use kiln_core::ImageDefinition;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// 並列数とリトライ回数
///
/// 不正な値はエラーにせず丸める（threads >= 1, retries >= 0）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    threads: usize,
    retries: u32,
}

impl RunOptions {
    pub fn new(threads: i64, retries: i64) -> Self {
        Self {
            threads: usize::try_from(threads.max(1)).unwrap_or(usize::MAX),
            retries: u32::try_from(retries.max(0)).unwrap_or(u32::MAX),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// 1回の実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 投入したジョブ数
    pub total: usize,
    /// 失敗したイメージ名（完了順）
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reporter から Dispatcher への完了通知
struct Completion {
    name: String,
    success: bool,
}

pub struct Dispatcher {
    ops: Arc<dyn ImageOps>,
    workspace_root: PathBuf,
    build_options: BuildOptions,
}

impl Dispatcher {
    pub fn new(ops: Arc<dyn ImageOps>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            ops,
            workspace_root: workspace_root.into(),
            build_options: BuildOptions::default(),
        }
    }

    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// 全イメージをビルドし、それぞれのテストを実行する
    pub async fn run_tests<W>(
        &self,
        images: &[ImageDefinition],
        options: RunOptions,
        sink: W,
    ) -> RunSummary
    where
        W: Write + Send + 'static,
    {
        self.run(Pipeline::Test, images, options, sink).await
    }

    /// 全イメージをプッシュする
    pub async fn run_pushes<W>(
        &self,
        images: &[ImageDefinition],
        options: RunOptions,
        sink: W,
    ) -> RunSummary
    where
        W: Write + Send + 'static,
    {
        self.run(Pipeline::Push, images, options, sink).await
    }

    async fn run<W>(
        &self,
        pipeline: Pipeline,
        images: &[ImageDefinition],
        options: RunOptions,
        sink: W,
    ) -> RunSummary
    where
        W: Write + Send + 'static,
    {
        let total = images.len();
        // ジョブ数より多いワーカーは起動しない（チャネル容量の上限も兼ねる）
        let workers_count = options.threads().min(total.max(1));
        tracing::info!(
            ?pipeline,
            images = total,
            workers = workers_count,
            retries = options.retries(),
            "Dispatching jobs"
        );

        let (input_tx, input_rx) = mpsc::channel::<Job>(workers_count);
        let (output_tx, output_rx) = mpsc::channel::<Job>(workers_count);
        // 完了通知は全件分バッファし、Reporter が Dispatcher を待たないようにする
        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(total.max(1));

        let input_rx = Arc::new(Mutex::new(input_rx));
        let workers: Vec<_> = (0..workers_count)
            .map(|id| {
                let worker = Worker::new(
                    id,
                    Arc::clone(&self.ops),
                    Workspace::for_worker(&self.workspace_root, id),
                    self.build_options,
                );
                tokio::spawn(worker.run(Arc::clone(&input_rx), output_tx.clone()))
            })
            .collect();
        // Reporter はワーカー側の Sender がすべて落ちたら終了する
        drop(output_tx);

        let reporter = tokio::spawn(report(output_rx, done_tx, sink));

        for (id, image) in images.iter().enumerate() {
            let job = Job::new(id, image.clone(), options.retries(), pipeline);
            if input_tx.send(job).await.is_err() {
                tracing::error!(job = id, "All workers exited before the job was queued");
                break;
            }
        }
        // キューを閉じてワーカーを終了させる
        drop(input_tx);

        let mut summary = RunSummary {
            total,
            failed: Vec::new(),
        };
        let mut completed = 0;
        while completed < total {
            match done_rx.recv().await {
                Some(completion) => {
                    completed += 1;
                    if !completion.success {
                        summary.failed.push(completion.name);
                    }
                }
                None => {
                    let missing = total - completed;
                    tracing::error!(missing, "Reporter stopped before all jobs completed");
                    summary
                        .failed
                        .extend(std::iter::repeat_n("(unreported job)".to_string(), missing));
                    break;
                }
            }
        }

        for result in join_all(workers).await {
            if let Err(e) = result {
                tracing::warn!("Worker task failed: {}", e);
            }
        }
        if let Err(e) = reporter.await {
            tracing::warn!("Reporter task failed: {}", e);
        }

        tracing::info!(
            ?pipeline,
            total,
            failed = summary.failure_count(),
            "All jobs accounted for"
        );
        summary
    }
}

/// 完了ジョブを1件ずつ出力し、完了を通知する
///
/// レポートの出力はここだけで行うため、ジョブ同士の出力が混ざることはない。
async fn report<W: Write>(
    mut output: mpsc::Receiver<Job>,
    done: mpsc::Sender<Completion>,
    mut sink: W,
) {
    while let Some(job) = output.recv().await {
        let written = sink
            .write_all(job.report.as_str().as_bytes())
            .and_then(|()| sink.flush());
        if let Err(e) = written {
            tracing::warn!(job = job.id, "Failed to write report: {}", e);
        }

        let completion = Completion {
            name: job.image.name,
            success: job.success,
        };
        if done.send(completion).await.is_err() {
            break;
        }
    }
}
