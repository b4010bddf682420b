//! Analytics event inspection.

use anyhow::Result;
use colored::Colorize;

use super::AppContext;

/// Prints the last `limit` events as JSON lines, oldest first.
pub async fn run(context: &AppContext, limit: usize) -> Result<()> {
    let events = context.session.recent_events(limit).await;
    if events.is_empty() {
        println!("{}", "No recorded events.".bright_black());
        return Ok(());
    }

    for event in events {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
