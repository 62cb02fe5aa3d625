//! chat-sync - terminal client for a conversational backend

use chat_sync::config::ClientConfig;
use chat_sync::console::{self, ConsoleRenderer, ReplCommand};
use chat_sync::runtime::{self, Outcome, SyncHandle};
use chat_sync::session::SessionRef;
use chat_sync::sessions;
use chat_sync::transport::{HttpTransport, LoggingTransport, Transport};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting chat-sync"
    );

    let http: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
    let transport = Arc::new(LoggingTransport::new(http));
    let handle = runtime::spawn(transport.clone());

    let render_task = tokio::spawn(render_loop(handle.clone()));

    match &config.initial_session {
        Some(session) => {
            handle.open(&SessionRef::new(session.as_str())).await?;
        }
        None => {
            print_lines(console::HELP.lines().map(str::to_string));
            show_sessions(transport.as_ref()).await;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                print_lines(console::HELP.lines().map(str::to_string));
                print_lines(console::format_suggestions(&handle.snapshot()));
            }
            ReplCommand::Invalid(reason) => println!("{reason}"),
            ReplCommand::Sessions => show_sessions(transport.as_ref()).await,
            ReplCommand::New => match sessions::create_session(transport.as_ref()).await {
                Ok(session) => report(handle.open(&session).await?),
                Err(e) => println!("Could not create session: {e}"),
            },
            ReplCommand::Open(session) => report(handle.open(&session).await?),
            ReplCommand::Route(route) => report(handle.navigate(&route).await?),
            ReplCommand::Refresh => spawn_and_report(&handle, |h| async move { h.refresh().await }),
            ReplCommand::Suggest(index) => {
                spawn_and_report(&handle, move |h| async move { h.send_suggestion(index).await });
            }
            ReplCommand::Send(text) => {
                spawn_and_report(&handle, move |h| async move { h.send(text).await });
            }
        }
    }

    drop(handle);
    render_task.abort();
    tracing::info!("Exiting");
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chat_sync=info".into());
    let json = std::env::var("CHAT_SYNC_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Print whatever changed each time the controller publishes
async fn render_loop(handle: SyncHandle) {
    let mut rx = handle.subscribe();
    drop(handle);
    let mut renderer = ConsoleRenderer::new();

    loop {
        let snapshot = rx.borrow_and_update().clone();
        print_lines(renderer.render(&snapshot));
        if rx.changed().await.is_err() {
            break;
        }
    }
}

/// Sends and refreshes settle only after a network round trip, so they run
/// off the input loop to keep it responsive.
fn spawn_and_report<F, Fut>(handle: &SyncHandle, op: F)
where
    F: FnOnce(SyncHandle) -> Fut,
    Fut: std::future::Future<Output = Result<Outcome, runtime::ControllerError>> + Send + 'static,
{
    let fut = op(handle.clone());
    tokio::spawn(async move {
        match fut.await {
            Ok(outcome) => report(outcome),
            Err(e) => tracing::warn!(error = %e, "Request not delivered"),
        }
    });
}

fn report(outcome: Outcome) {
    if let Outcome::Ignored(reason) = outcome {
        println!("({reason})");
    }
}

async fn show_sessions(transport: &dyn Transport) {
    match sessions::list_sessions(transport).await {
        Ok(list) => print_lines(console::format_sessions(&list)),
        Err(e) => println!("Could not list sessions: {e}"),
    }
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
