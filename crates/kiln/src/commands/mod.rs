pub mod alias;
pub mod push;
pub mod validate;

use crate::InventoryArgs;
use anyhow::Context;
use colored::Colorize;
use kiln_core::Inventory;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 読み込んだインベントリと、その置き場所
pub struct Loaded {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub inventory: Inventory,
}

/// インベントリを探して読み込む
pub fn load_inventory(args: &InventoryArgs) -> anyhow::Result<Loaded> {
    let path = match &args.inventory {
        Some(path) => path.clone(),
        None => kiln_config::find_inventory_file()?,
    };

    let inventory = kiln_core::load_inventory(&path)
        .with_context(|| format!("could not load inventory {}", path.display()))?;
    let base_dir = kiln_config::base_dir_of(&path);

    Ok(Loaded {
        path,
        base_dir,
        inventory,
    })
}

/// 結果のまとめ方（コマンドごとの文言）
pub struct Wording {
    pub failed: &'static str,
    pub passed: &'static str,
}

/// Markdown の Conclusion セクションを書き出す
pub fn write_conclusion(
    out: &mut impl Write,
    failed: &[String],
    wording: &Wording,
) -> io::Result<()> {
    write!(out, "# Conclusion\n\n")?;
    if failed.is_empty() {
        write!(out, "{}\n\n", wording.passed)?;
    } else {
        write!(out, "{} {}\n\n", failed.len(), wording.failed)?;
        for (i, name) in failed.iter().enumerate() {
            writeln!(out, "{}. `{}`", i + 1, name)?;
        }
    }
    out.flush()
}

/// stderr に一行サマリーを出す
pub fn print_status(total: usize, failures: usize) {
    if failures == 0 {
        eprintln!("{} {} of {} succeeded", "✓".green(), total, total);
    } else {
        eprintln!(
            "{} {} of {} failed",
            "✗".red(),
            failures.to_string().red().bold(),
            total
        );
    }
}

/// 空になったワークスペースルートを片付ける
pub fn remove_if_empty(dir: &Path) {
    if let Err(e) = std::fs::remove_dir(dir) {
        tracing::debug!("Leaving {} in place: {}", dir.display(), e);
    }
}
