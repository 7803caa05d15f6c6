//! `chatrelay history <session-id>`: print a session's stored turns.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_core::chat::repository::ConversationStore;
use chatrelay_types::chat::{Role, SessionId, Turn};
use chatrelay_types::config::{RelayConfig, StoreBackend};

use crate::state::open_store;

/// Longest content shown per table row.
const PREVIEW_CHARS: usize = 80;

/// Load every stored turn of `session_id` from the configured store.
pub async fn load_history(config: &RelayConfig, data_dir: &Path, session_id: &str) -> Result<Vec<Turn>> {
    let session_id = SessionId::parse(session_id).context("invalid session id")?;

    if config.store.backend == StoreBackend::Memory {
        bail!("the in-memory store keeps nothing between runs; set [store] backend = \"sqlite\"");
    }

    let store = open_store(&config.store, data_dir).await?;
    let turns = store
        .load(&session_id)
        .await
        .with_context(|| format!("failed to load history for {session_id}"))?;
    Ok(turns)
}

/// Print the history as a table, or as JSON with `--json`.
///
/// # Examples
///
/// ```bash
/// chatrelay history session_8c1d0e6b2f5a4a7e9d3c1b0a2f4e6d8c
/// chatrelay history session_8c1d0e6b2f5a4a7e9d3c1b0a2f4e6d8c --json
/// ```
pub async fn show_history(config: &RelayConfig, data_dir: &Path, session_id: &str, json: bool) -> Result<()> {
    let turns = load_history(config, data_dir, session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!(
            "  {} No turns stored for {}",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for turn in &turns {
        let role_color = match turn.role {
            Role::User => Color::Cyan,
            Role::Assistant => Color::Green,
        };
        table.add_row(vec![
            Cell::new(turn.sequence),
            Cell::new(turn.role).fg(role_color),
            Cell::new(turn.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(preview(&turn.content)),
        ]);
    }

    println!();
    println!(
        "  {} {} ({} turns)",
        style("Session").bold(),
        style(session_id).cyan(),
        turns.len()
    );
    println!("{table}");
    println!();
    Ok(())
}

/// First line of `content`, cut to [`PREVIEW_CHARS`] characters.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::NewTurn;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("line one\nline two"), "line one…");
        let long = "y".repeat(200);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
    }

    #[tokio::test]
    async fn test_load_history_reads_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig::default();
        let session_id = SessionId::parse("session_cli").unwrap();

        let store = open_store(&config.store, dir.path()).await.unwrap();
        store
            .append_exchange(
                &session_id,
                &[NewTurn::user("hello").unwrap(), NewTurn::assistant("hi there").unwrap()],
            )
            .await
            .unwrap();
        drop(store);

        let turns = load_history(&config, dir.path(), "session_cli").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].content, "hi there");
    }

    #[tokio::test]
    async fn test_load_history_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig::default();
        assert!(load_history(&config, dir.path(), "nope").await.is_err());

        let mut memory = RelayConfig::default();
        memory.store.backend = StoreBackend::Memory;
        assert!(load_history(&memory, dir.path(), "session_x").await.is_err());
    }
}
