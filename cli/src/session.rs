use anyhow::{Context, Result};
use redact_core::{RedactConfig, RedactionClient};
use redact_ime::keyboard::{CODE_DELETE, CODE_ENTER, CODE_MODE_CHANGE, CODE_REDACT, CODE_SHIFT};
use redact_ime::{InMemoryConnection, KeyboardSession, TextAdapter};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::output::{print_buffer, print_keyboard, print_session_help, TerminalStatus};

type Session = KeyboardSession<InMemoryConnection, TerminalStatus>;

/// Run a simulated keyboard session: stdin lines are typed into an in-memory editor.
///
/// Successive lines are joined with a single space, so two lines read as
/// two words of the same message.
pub async fn run_session(config: &RedactConfig) -> Result<()> {
    let client = RedactionClient::new(config).context("Failed to create redaction client")?;
    info!(endpoint = client.endpoint(), "Redaction client ready");

    let adapter = TextAdapter::with_connection(InMemoryConnection::new(), config.lookback_chars());
    let mut session = KeyboardSession::new(adapter, Arc::new(client), TerminalStatus);

    print_session_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    ":quit" => break,
                    ":redact" => {
                        session.handle_primary(CODE_REDACT);
                    }
                    ":send" => {
                        session.handle_primary(CODE_ENTER);
                        if let Some(sent) = session.adapter().connection().and_then(|c| c.sent().last()) {
                            println!("Sent: {}", sent);
                        }
                    }
                    ":back" => {
                        session.handle_primary(CODE_DELETE);
                        print_buffer(&buffer(&session));
                    }
                    ":clear" => {
                        clear_buffer(&mut session);
                        print_buffer(&buffer(&session));
                    }
                    ":shift" => {
                        session.handle_primary(CODE_SHIFT);
                        print_keyboard(session.keyboard());
                    }
                    ":mode" => {
                        session.handle_primary(CODE_MODE_CHANGE);
                        print_keyboard(session.keyboard());
                    }
                    ":show" => print_buffer(&buffer(&session)),
                    _ => type_line(&mut session, &line),
                }
            }
            true = session.apply_next_completion() => {
                print_buffer(&buffer(&session));
            }
        }
    }

    session.settle().await;
    print_buffer(&buffer(&session));
    Ok(())
}

fn type_line(session: &mut Session, line: &str) {
    let needs_space = session
        .adapter()
        .connection()
        .and_then(|c| c.text().chars().last())
        .is_some_and(|last| !last.is_whitespace());
    if needs_space {
        session.type_text(" ");
    }
    session.type_text(line);
}

fn clear_buffer(session: &mut Session) {
    if let Some(conn) = session.adapter_mut().connection_mut() {
        conn.clear();
    }
}

fn buffer(session: &Session) -> String {
    session
        .adapter()
        .connection()
        .map(|c| c.text().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_session() -> Session {
        let client = RedactionClient::new(&RedactConfig::default()).unwrap();
        KeyboardSession::new(
            TextAdapter::with_connection(InMemoryConnection::new(), 1000),
            Arc::new(client),
            TerminalStatus,
        )
    }

    #[tokio::test]
    async fn test_lines_are_joined_with_a_space() {
        let mut session = offline_session();
        type_line(&mut session, "hi");
        type_line(&mut session, "there");
        assert_eq!(buffer(&session), "hi there");
    }

    #[tokio::test]
    async fn test_no_extra_space_after_trailing_whitespace() {
        let mut session = offline_session();
        type_line(&mut session, "call me ");
        type_line(&mut session, "later");
        assert_eq!(buffer(&session), "call me later");
    }

    #[tokio::test]
    async fn test_clear_wipes_the_buffer() {
        let mut session = offline_session();
        type_line(&mut session, "my ssn is 123-45-6789");
        clear_buffer(&mut session);
        assert_eq!(buffer(&session), "");

        type_line(&mut session, "fresh");
        assert_eq!(buffer(&session), "fresh");
    }
}
