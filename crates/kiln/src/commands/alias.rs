use super::{load_inventory, print_status};
use crate::{DockerArgs, InventoryArgs};
use kiln_build::{DockerCli, run_aliases};

/// 全エイリアスを付与し、失敗数を返す
pub async fn handle(args: &InventoryArgs, docker: &DockerArgs) -> anyhow::Result<usize> {
    let loaded = load_inventory(args)?;
    let ops = DockerCli::with_program(&docker.docker);

    let total = loaded
        .inventory
        .images
        .iter()
        .map(|image| image.aliases.len())
        .sum();
    let failures = run_aliases(&ops, &loaded.inventory.images, &mut std::io::stdout()).await?;
    print_status(total, failures);

    Ok(failures)
}
