use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use prettytable::{format, Table};

use crate::chat::ChatThread;
use crate::cli::RoleArg;
use crate::config::Config;
use crate::error::Result;
use crate::history::{new_session_id, summarize, Message, Role, SaveOutcome, SessionStore};

/// Print every stored session as a table, newest first
pub async fn list_sessions(store: &SessionStore) -> Result<()> {
    let sessions = store.read_all().await?;

    if sessions.is_empty() {
        println!("{}", "No chat history found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Started".bold(),
        "Messages".bold(),
        "Last Message".bold()
    ]);

    for summary in summarize(&sessions, &Local::now()) {
        table.add_row(prettytable::row![
            summary.id.cyan(),
            summary.label,
            summary.message_count,
            summary.preview
        ]);
    }

    println!("\nChat History:");
    table.printstd();
    println!();
    println!("Use {} to view a session.", "chatstore show <ID>".cyan());
    println!();

    Ok(())
}

/// Print the transcript of one session
pub async fn show_session(store: &SessionStore, id: &str) -> Result<()> {
    let Some(session) = store.get_session(id).await? else {
        println!("{}", format!("No chat session {}", id).yellow());
        return Ok(());
    };

    for message in &session.messages {
        let who = match message.role {
            Role::User => "you".green().bold(),
            Role::Bot => "bot".blue().bold(),
        };
        println!("[{}] {}: {}", message.time.dimmed(), who, message.text);
    }

    Ok(())
}

/// Open (or create) a session and print its id
pub async fn open_session(
    store: Arc<SessionStore>,
    config: &Config,
    id: Option<String>,
) -> Result<()> {
    let id = id.unwrap_or_else(new_session_id);
    let thread = ChatThread::open(store, id, &config.chat.greeting).await?;

    println!("{}", thread.session_id());
    for message in thread.messages() {
        println!("[{}] {}: {}", message.time.dimmed(), message.role, message.text);
    }

    Ok(())
}

/// Append one message to a session
pub async fn append_message(
    store: &SessionStore,
    id: &str,
    role: RoleArg,
    text: &str,
) -> Result<()> {
    let message = match Role::from(role) {
        Role::User => Message::user(text),
        Role::Bot => Message::bot(text),
    };

    let outcome = store.append_message(id, message).await?;
    report(outcome, &format!("Appended message to {}", id));
    Ok(())
}

/// Delete a session
pub async fn delete_session(store: &SessionStore, id: &str) -> Result<()> {
    let outcome = store.delete_session(id).await?;
    report(outcome, &format!("Deleted chat session {}", id));
    Ok(())
}

/// Remove every stored session
pub async fn clear_history(store: &SessionStore) -> Result<()> {
    let outcome = store.clear().await?;
    report(outcome, "Cleared chat history");
    Ok(())
}

fn report(outcome: SaveOutcome, done: &str) {
    match outcome {
        SaveOutcome::Persisted => println!("{}", done.green()),
        SaveOutcome::NotPersisted => {
            eprintln!("{}", "Change was not saved; see the log for details.".red())
        }
    }
}
