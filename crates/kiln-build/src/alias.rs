//! エイリアス（タグ）付与
//!
//! 並列化は不要なので、インベントリ順に1件ずつ `tag` を実行する。

use crate::ops::ImageOps;
use crate::report::Report;
use kiln_core::ImageDefinition;
use std::io::{self, Write};

/// 全イメージのエイリアスを付与し、失敗数を返す
pub async fn run_aliases<W: Write>(
    ops: &dyn ImageOps,
    images: &[ImageDefinition],
    sink: &mut W,
) -> io::Result<usize> {
    let mut report = Report::new();
    report.push("# Tagging Aliases\n\n");

    let mut index = 0;
    let mut failures = 0;
    for image in images {
        for alias in &image.aliases {
            report.push(format!("{}. {} -> {}\n", index, image.name, alias));
            index += 1;

            let execution = ops.tag(&image.name, alias).await;
            if let Err(e) = execution.result {
                tracing::warn!(image = %image.name, alias = %alias, "Tagging failed: {}", e);
                report.push(format!(
                    "Error creating tag:\n\n```\n{}\n```\n\n{}\n",
                    execution.output, e
                ));
                failures += 1;
            }
        }
    }
    report.push("\n");

    sink.write_all(report.as_str().as_bytes())?;
    sink.flush()?;

    tracing::info!(tags = index, failures, "Aliases applied");
    Ok(failures)
}
