//! Interactive support chat.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use deskbot_application::QueryOutcome;
use deskbot_core::feedback::Feedback;
use deskbot_core::session::Message;

use super::AppContext;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/select".to_string(),
                "/feedback".to_string(),
                "/escalate".to_string(),
                "/sources".to_string(),
                "/queue".to_string(),
                "/clear".to_string(),
                "/export".to_string(),
                "/help".to_string(),
                "/quit".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

pub async fn run(context: &AppContext) -> Result<()> {
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    banner(context).await;

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                let _ = rl.add_history_entry(&line);

                if let Err(error) = dispatch(context, trimmed).await {
                    eprintln!("{}", format!("Error: {}", error).red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn banner(context: &AppContext) {
    println!("{}", "=== Deskbot Support Chat ===".bright_magenta().bold());
    if let Some(session) = context.session.current_session().await {
        println!(
            "{}",
            format!(
                "Signed in as {} ({}) in {}",
                session.user, session.role, session.environment
            )
            .bright_black()
        );
        if !session.messages.is_empty() {
            println!(
                "{}",
                format!(
                    "Resuming a conversation with {} messages.",
                    session.messages.len()
                )
                .bright_black()
            );
        }
    }
    println!(
        "{}",
        "Ask a question, or type '/help' for the command list.".bright_black()
    );
    println!();
}

async fn dispatch(context: &AppContext, input: &str) -> Result<()> {
    if let Some(rest) = input.strip_prefix("/select ") {
        return select(context, rest).await;
    }
    if input == "/feedback" || input.starts_with("/feedback ") {
        return feedback(context, input["/feedback".len()..].trim()).await;
    }
    if input == "/export" || input.starts_with("/export ") {
        return export(context, input["/export".len()..].trim()).await;
    }

    match input {
        "/help" => {
            help();
            Ok(())
        }
        "/sources" => sources(context).await,
        "/escalate" => escalate(context).await,
        "/queue" => super::queue::run(context, false).await,
        "/clear" => {
            context.session.clear_history().await?;
            println!("{}", "History cleared.".bright_black());
            Ok(())
        }
        _ if input.starts_with('/') => {
            println!(
                "{}",
                "Unknown command. Type '/help' for the list.".bright_black()
            );
            Ok(())
        }
        _ => query(context, input).await,
    }
}

fn help() {
    println!("{}", "Commands".bright_magenta());
    println!("  /select <option>=<value>   answer a clarification question");
    println!("  /feedback up|down [text]   rate the last answer");
    println!("  /escalate                  file a ticket draft from the last answer");
    println!("  /sources                   show sources for the last query");
    println!("  /queue                     show queued escalations");
    println!("  /clear                     empty the conversation history");
    println!("  /export <file>             write the transcript to a file");
    println!("  /quit                      exit");
}

async fn query(context: &AppContext, text: &str) -> Result<()> {
    let outcome = context.chat.handle_query(text).await?;
    render_outcome(&outcome);
    Ok(())
}

fn render_outcome(outcome: &QueryOutcome) {
    match outcome {
        QueryOutcome::Busy => {
            println!(
                "{}",
                "Still working on the previous question...".yellow()
            );
        }
        QueryOutcome::Answer(message) => render_bot_message(message),
        QueryOutcome::Clarification(message) => {
            println!("{}", message.body.content().bright_yellow());
            if let Some(request) = message.body.answer().and_then(|a| a.clarification.as_ref()) {
                for option in &request.options {
                    println!("{}", format!("  - {}", option).yellow());
                }
            }
            println!(
                "{}",
                "Pick with '/select <option>=<value>'; two selections refine the answer."
                    .bright_black()
            );
        }
        QueryOutcome::Failure(message) => {
            println!("{}", message.body.content().red());
        }
        QueryOutcome::Discarded => {
            println!(
                "{}",
                "The conversation changed while answering; the result was dropped.".bright_black()
            );
        }
    }
}

fn render_bot_message(message: &Message) {
    println!("{}", message.body.content().bright_blue());
    let Some(answer) = message.body.answer() else {
        return;
    };
    for (i, step) in answer.steps.iter().enumerate() {
        println!("{}", format!("  {}. {}", i + 1, step).bright_blue());
    }
    if !answer.sources.is_empty() {
        println!("{}", "Sources:".bright_magenta());
        for source in &answer.sources {
            if source.accessible {
                println!("  - {} ({})", source.title, source.url.bright_black());
            } else {
                println!("  - {} {}", source.title, "[restricted]".yellow());
            }
        }
    }
    println!(
        "{}",
        format!(
            "confidence {:.2} | {} ms | '/feedback up|down' to rate",
            answer.confidence, answer.latency_ms
        )
        .bright_black()
    );
}

async fn select(context: &AppContext, rest: &str) -> Result<()> {
    let Some((key, value)) = rest.split_once('=') else {
        println!("{}", "Usage: /select <option>=<value>".bright_black());
        return Ok(());
    };

    match context
        .chat
        .select_clarification(key.trim(), value.trim())
        .await?
    {
        Some(outcome) => render_outcome(&outcome),
        None => println!("{}", "Selection noted.".bright_black()),
    }
    Ok(())
}

async fn feedback(context: &AppContext, rest: &str) -> Result<()> {
    let (verdict, comment) = match rest.split_once(' ') {
        Some((verdict, comment)) => (verdict, Some(comment.trim().to_string())),
        None => (rest, None),
    };
    let helpful = match verdict {
        "up" => true,
        "down" => false,
        _ => {
            println!("{}", "Usage: /feedback up|down [comment]".bright_black());
            return Ok(());
        }
    };

    let Some(answer_id) = context
        .session
        .current_session()
        .await
        .and_then(|s| s.latest_answer().map(|a| a.answer_id.clone()))
    else {
        println!("{}", "Nothing to rate yet.".bright_black());
        return Ok(());
    };

    let feedback = Feedback::new(answer_id, helpful, comment)?;
    context.chat.submit_feedback(feedback).await?;
    println!("{}", "Thanks for the feedback!".bright_green());
    Ok(())
}

async fn escalate(context: &AppContext) -> Result<()> {
    let Some(answer_id) = context
        .session
        .current_session()
        .await
        .and_then(|s| s.latest_answer().map(|a| a.answer_id.clone()))
    else {
        println!(
            "{}",
            "Ask a question first; escalation builds on the last answer.".bright_black()
        );
        return Ok(());
    };

    let input = context.escalation.prefill(&answer_id).await?;
    println!(
        "{}",
        format!("Escalating: {}", input.summary).bright_magenta()
    );

    match context.escalation.submit(input, Some(&answer_id)).await {
        Ok(draft) => {
            println!(
                "{}",
                format!("Draft {} created: {}", draft.draft_id, draft.link).bright_green()
            );
        }
        Err(error) if error.is_collaborator() => {
            println!(
                "{}",
                "Tracker unavailable; the draft was queued ('/queue' to inspect).".yellow()
            );
        }
        Err(error) => return Err(error.into()),
    }
    Ok(())
}

async fn sources(context: &AppContext) -> Result<()> {
    let sources = context.session.current_sources().await;
    if sources.is_empty() {
        println!("{}", "No sources retrieved yet.".bright_black());
        return Ok(());
    }

    println!("{}", "Sources for the last query:".bright_magenta());
    for source in &sources {
        let access = if source.accessible {
            "open".green()
        } else {
            "restricted".yellow()
        };
        let link = match &source.anchor {
            Some(anchor) => format!("{}#{}", source.url, anchor),
            None => source.url.clone(),
        };
        println!("  [{}] {} - {}", access, source.title, link.bright_black());
        println!(
            "        {} | updated {}",
            source.space,
            source.updated_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn export(context: &AppContext, path: &str) -> Result<()> {
    if path.is_empty() {
        println!("{}", "Usage: /export <file>".bright_black());
        return Ok(());
    }

    match context.session.transcript().await {
        Some(transcript) => {
            tokio::fs::write(path, transcript)
                .await
                .with_context(|| format!("Failed to write {}", path))?;
            println!(
                "{}",
                format!("Transcript written to {}", path).bright_green()
            );
        }
        None => println!("{}", "No session to export.".bright_black()),
    }
    Ok(())
}
