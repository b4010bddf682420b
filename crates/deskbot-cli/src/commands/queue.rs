//! Escalation retry queue inspection and draining.

use anyhow::Result;
use colored::Colorize;

use super::AppContext;

pub async fn run(context: &AppContext, drain: bool) -> Result<()> {
    if drain {
        let report = context.escalation.drain().await?;
        for draft in &report.submitted {
            println!(
                "{}",
                format!("Submitted: {} ({})", draft.summary, draft.link).bright_green()
            );
        }
        if report.remaining > 0 {
            println!(
                "{}",
                format!(
                    "{} draft(s) still queued; the tracker is not back yet.",
                    report.remaining
                )
                .yellow()
            );
        } else if report.submitted.is_empty() {
            println!("{}", "Queue is empty.".bright_black());
        }
        return Ok(());
    }

    let (items, last_attempt) = context.escalation.queue().await;
    if items.is_empty() {
        println!("{}", "No queued escalations.".bright_black());
    } else {
        println!(
            "{}",
            format!("{} queued escalation(s):", items.len()).bright_magenta()
        );
        for (i, item) in items.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, item.priority, item.summary);
        }
        println!(
            "{}",
            "Run 'deskbot queue --drain' to retry them.".bright_black()
        );
    }
    if let Some(at) = last_attempt {
        println!(
            "{}",
            format!("Last attempt: {}", at.format("%Y-%m-%d %H:%M:%S")).bright_black()
        );
    }
    Ok(())
}
