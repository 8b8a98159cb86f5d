use super::load_inventory;
use crate::InventoryArgs;
use colored::Colorize;

/// インベントリを検証してサマリーを表示
pub fn handle(args: &InventoryArgs) -> anyhow::Result<()> {
    let loaded = load_inventory(args)?;

    println!("Inventory: {}", loaded.path.display().to_string().cyan());
    println!("{}", "✓ Inventory is valid".green().bold());
    println!();
    println!("Images: {}", loaded.inventory.len());
    for image in &loaded.inventory.images {
        println!(
            "  - {} ({} tests, {} aliases)",
            image.name.cyan(),
            image.tests.len(),
            image.aliases.len()
        );
        for test in &image.tests {
            if !test.is_dir() {
                println!("    {} test context not found: {}", "⚠".yellow(), test.display());
            }
        }
    }

    Ok(())
}
