//! Session CLI commands: chat, history, clear.

use anyhow::Result;
use console::style;

use chatgraph_types::chat::HistoryRole;
use chatgraph_types::llm::MessageRole;

use crate::state::AppState;

/// Run one chat turn and print the reply.
///
/// ```bash
/// chatgraph chat demo "What is a graph database?"
/// ```
pub async fn chat(state: &AppState, session: &str, message: &str, json: bool) -> Result<()> {
    let response = state.chat_service.chat(session, message).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!();
        println!("  {} {}", style("assistant").magenta().bold(), response.content);
        println!();
    }
    Ok(())
}

/// Print the stored messages of a session, oldest first.
pub async fn history(state: &AppState, session: &str, json: bool) -> Result<()> {
    let messages = state.chat_service.load_history(session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages stored for session '{}'.",
            style("i").blue().bold(),
            style(session).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  Session '{}'", style(session).cyan().bold());
    println!();
    for message in &messages {
        let role = match &message.role {
            HistoryRole::Known(MessageRole::User) => style("user".to_string()).green().bold(),
            HistoryRole::Known(MessageRole::Assistant) => {
                style("assistant".to_string()).magenta().bold()
            }
            HistoryRole::Known(MessageRole::System) => style("system".to_string()).dim(),
            HistoryRole::Unrecognized(raw) => style(raw.clone()).red(),
        };
        println!(
            "  {} {} {}",
            style(message.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
            role,
            message.content
        );
    }
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Clear a session. Failures are reported, and turned into a non-zero exit.
pub async fn clear(state: &AppState, session: &str, json: bool) -> Result<()> {
    let response = state.chat_service.clear_session(session).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.success {
        println!();
        println!("  {} {}", style("✓").green().bold(), response.message);
        println!();
    } else {
        println!();
        println!("  {} {}", style("✗").red().bold(), response.message);
        println!();
    }

    if !response.success {
        anyhow::bail!("clearing session '{session}' failed");
    }
    Ok(())
}
