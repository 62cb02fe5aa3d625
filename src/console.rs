//! Line-oriented front end for the `chat-sync` binary
//!
//! Parsing and rendering are pure so they can be tested without a terminal;
//! `main` only moves lines between stdin, the controller, and stdout.

use crate::session::SessionRef;
use crate::sync::{Message, Role, Snapshot};
use crate::wire::SessionSummary;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Open(SessionRef),
    Route(String),
    Refresh,
    Sessions,
    New,
    Suggest(usize),
    Help,
    Quit,
    Send(String),
    /// Malformed command, with the reason to show the user
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /open <id>      switch to a session
  /route <path>   navigate to a route such as /chat/<id>
  /refresh        reload the history
  /sessions       list sessions
  /new            create a session and switch to it
  /suggest <n>    send prompt suggestion n
  /quit           exit
Anything else is sent as a message.";

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Self::Send(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim_end(), ""),
        };

        match name {
            "open" if arg.is_empty() => Self::Invalid("usage: /open <id>".into()),
            "open" => Self::Open(SessionRef::new(arg)),
            "route" if arg.is_empty() => Self::Invalid("usage: /route <path>".into()),
            "route" => Self::Route(arg.to_string()),
            "refresh" => Self::Refresh,
            "sessions" => Self::Sessions,
            "new" => Self::New,
            "suggest" => match arg.parse() {
                Ok(index) => Self::Suggest(index),
                Err(_) => Self::Invalid("usage: /suggest <n>".into()),
            },
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

/// Turns successive snapshots into the lines that changed since the last one
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    last: Option<Snapshot>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, snapshot: &Snapshot) -> Vec<String> {
        let mut lines = Vec::new();
        let previous = self.last.take();

        let switched = previous
            .as_ref()
            .is_none_or(|p| p.session != snapshot.session);
        let retitled = previous.as_ref().is_none_or(|p| p.title != snapshot.title);

        if snapshot.session.is_some() && (switched || retitled) {
            lines.push(format!("== {} ==", snapshot.title));
        }

        // An append leaves the old transcript as a prefix; anything else is a
        // wholesale replace and gets reprinted in full.
        let shown = match &previous {
            Some(p) if !switched && snapshot.transcript.starts_with(&p.transcript) => {
                p.transcript.len()
            }
            Some(_) if !switched => {
                lines.push("-- history reloaded --".into());
                0
            }
            _ => 0,
        };
        lines.extend(snapshot.transcript.iter().skip(shown).map(format_message));

        if let Some(placeholder) = snapshot.placeholder() {
            let repeated = !switched
                && previous
                    .as_ref()
                    .is_some_and(|p| p.placeholder() == Some(placeholder));
            if !repeated {
                lines.push(placeholder.to_string());
            }
        }

        let was_typing = previous.as_ref().is_some_and(|p| p.send_in_flight);
        if snapshot.send_in_flight && !was_typing {
            lines.push("Assistant is typing…".into());
        }

        self.last = Some(snapshot.clone());
        lines
    }
}

pub fn format_message(message: &Message) -> String {
    let prefix = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{prefix}> {}", message.content)
}

pub fn format_sessions(sessions: &[SessionSummary]) -> Vec<String> {
    if sessions.is_empty() {
        return vec!["No sessions yet. Use /new to start one.".into()];
    }
    sessions
        .iter()
        .map(|s| {
            format!(
                "{}  {}  ({})",
                s.id,
                s.title,
                s.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect()
}

pub fn format_suggestions(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  /suggest {i}  {s}"))
        .collect()
}
