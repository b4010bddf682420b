//! Knowledge index status.

use anyhow::Result;
use colored::Colorize;
use deskbot_core::search::IndexStatusProvider;

use super::AppContext;

pub async fn run(context: &AppContext, reindex: Option<&str>) -> Result<()> {
    if let Some(space) = reindex {
        context.search_agent.reindex(space).await?;
        println!(
            "{}",
            format!("Reindex of '{}' completed.", space).bright_green()
        );
    }

    let status = context.search_agent.status().await?;

    println!("{}", "Knowledge index".bright_magenta().bold());
    println!(
        "{:<8} {:<22} {:>6} {:>7}  {}",
        "KEY", "NAME", "DOCS", "ERRORS", "LAST UPDATE"
    );
    for space in &status.spaces {
        println!(
            "{:<8} {:<22} {:>6} {:>7}  {}",
            space.key,
            space.name,
            space.docs,
            space.errors,
            space.last_updated_at.format("%Y-%m-%d %H:%M"),
        );
        if space.errors > 0 {
            println!(
                "{}",
                format!(
                    "         {} document(s) failed to index in {}",
                    space.errors, space.key
                )
                .yellow()
            );
        }
    }
    println!(
        "{}",
        format!(
            "Index is as fresh as its most stale space: {}",
            status.last_global_update_at.format("%Y-%m-%d %H:%M")
        )
        .bright_black()
    );
    Ok(())
}
