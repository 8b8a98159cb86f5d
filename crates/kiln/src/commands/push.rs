use super::{Wording, load_inventory, print_status, write_conclusion};
use crate::{DockerArgs, InventoryArgs, RunArgs};
use kiln_build::{Dispatcher, DockerCli, RunOptions};
use std::sync::Arc;

const WORDING: Wording = Wording {
    failed: "pushes failed.",
    passed: "all pushes succeeded.",
};

/// 全イメージをプッシュし、失敗数を返す
pub async fn handle(
    args: &InventoryArgs,
    docker: &DockerArgs,
    run: &RunArgs,
) -> anyhow::Result<usize> {
    let loaded = load_inventory(args)?;
    let ops = Arc::new(DockerCli::with_program(&docker.docker));
    // プッシュはワークスペースを使わない
    let dispatcher = Dispatcher::new(ops, kiln_config::default_workspace_root(&loaded.base_dir));

    let summary = dispatcher
        .run_pushes(
            &loaded.inventory.images,
            RunOptions::new(run.threads, run.retries),
            std::io::stdout(),
        )
        .await;

    write_conclusion(&mut std::io::stdout(), &summary.failed, &WORDING)?;
    print_status(summary.total, summary.failure_count());

    Ok(summary.failure_count())
}
