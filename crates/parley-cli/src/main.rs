//! parley - demo CLI for the chat block

mod config;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::broadcast;

use parley_chat::{ChatEvent, ChatSession, Delivery, Error, Role, SessionConfig};
use parley_mock::{DEMO_SCENARIOS, MockResponder};

/// parley - chat block demo over the mock responder
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prompt to submit; without one, starts an interactive session
    prompt: Option<String>,

    /// Stream the response word by word
    #[arg(short, long)]
    stream: bool,

    /// Minimum interval between streamed updates, in milliseconds
    #[arg(long)]
    throttle: Option<u64>,

    /// List the demo scenarios and exit
    #[arg(long)]
    scenarios: bool,

    /// Create an example config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("parley=debug")
            .init();
    }

    if args.scenarios {
        print_scenarios();
        return Ok(());
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file; CLI flags take precedence
    let cfg = config::Config::load();

    let delivery = if args.stream || cfg.stream.unwrap_or(false) {
        Delivery::Streaming
    } else {
        Delivery::Atomic
    };
    let throttle = args
        .throttle
        .or(cfg.throttle_ms)
        .map(Duration::from_millis);

    let mut session_config = SessionConfig {
        delivery,
        throttle,
        ..SessionConfig::default()
    };
    if let Some(placeholder) = cfg.placeholder {
        session_config.placeholder_text = placeholder;
    }

    tracing::debug!(?delivery, throttle_ms = ?args.throttle, "starting session");
    let session = ChatSession::new(session_config, Arc::new(MockResponder::new()));

    match args.prompt {
        Some(prompt) => run_once(session, &prompt).await,
        None => run_interactive(session).await,
    }
}

/// Submit a single prompt, print the response, and exit.
async fn run_once(mut session: ChatSession, prompt: &str) -> anyhow::Result<()> {
    let handle = session.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let printer = spawn_printer(session.subscribe());
    let result = session.submit(prompt).await;
    let _ = printer.await;

    if let Err(error) = result {
        if !error.is_cancelled() {
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Line-oriented interactive session.
async fn run_interactive(mut session: ChatSession) -> anyhow::Result<()> {
    println!("parley chat demo - /help for commands");

    // Ctrl-C cancels the in-flight request instead of killing the process
    let handle = session.handle();
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                break;
            }
            handle.cancel();
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/scenarios" => print_scenarios(),
            "/reset" => {
                session.reset();
                println!("[conversation cleared]");
            }
            "/stream" => {
                let next = match session.delivery() {
                    Delivery::Atomic => Delivery::Streaming,
                    Delivery::Streaming => Delivery::Atomic,
                };
                session.set_delivery(next);
                println!(
                    "[stream mode {}]",
                    if next == Delivery::Streaming { "on" } else { "off" }
                );
            }
            "/reload" => {
                if session.last_input().is_none() {
                    println!("[nothing to reload]");
                    continue;
                }
                let printer = spawn_printer(session.subscribe());
                let result = session.reload().await;
                finish_exchange(result, printer).await;
            }
            command if command.starts_with('/') => {
                println!("[unknown command: {command}]");
            }
            prompt => {
                let printer = spawn_printer(session.subscribe());
                let result = session.submit(prompt).await;
                finish_exchange(result, printer).await;
            }
        }
    }

    Ok(())
}

/// Let the printer drain the exchange's events; failures were already
/// rendered by the printer.
async fn finish_exchange(
    result: parley_chat::Result<()>,
    printer: tokio::task::JoinHandle<()>,
) {
    match result {
        Err(Error::Busy) => {
            // No exchange ran, so no events will arrive
            printer.abort();
            println!("[a request is already in flight]");
        }
        _ => {
            let _ = printer.await;
        }
    }
}

/// Render session events for one exchange to stdout.
///
/// Streaming chunks carry the full accumulated text; the printer emits only
/// the unseen suffix so the terminal shows a growing response.
fn spawn_printer(mut rx: broadcast::Receiver<ChatEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut printed = 0usize;
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                ChatEvent::MessageAppended { message } if message.role == Role::Tool => {
                    for invocation in &message.tool_invocations {
                        println!("[tool] {} called with {}", invocation.tool_name, invocation.args);
                    }
                }
                ChatEvent::MessageUpdated { message } => {
                    let content = message.content;
                    if content.len() > printed {
                        print!("{}", &content[printed..]);
                        let _ = std::io::stdout().flush();
                        printed = content.len();
                    }
                }
                ChatEvent::ToolCallUpdated { message } => {
                    for invocation in &message.tool_invocations {
                        if invocation.result.is_some() {
                            println!("[tool] {} completed", invocation.tool_name);
                        }
                    }
                }
                ChatEvent::MessageCompleted { message } => {
                    if printed == 0 {
                        print!("{}", message.content);
                    }
                    println!();
                    break;
                }
                ChatEvent::Cancelled => {
                    println!();
                    println!("[request cancelled]");
                    break;
                }
                ChatEvent::Failed { message } => {
                    println!();
                    eprintln!("[error] {message}");
                    break;
                }
                _ => {}
            }
        }
    })
}

fn print_scenarios() {
    println!("Demo scenarios (keyword -> canned response):");
    for scenario in DEMO_SCENARIOS {
        println!("  {:<10} {}", scenario.trigger, scenario.description);
        println!("  {:<10} e.g. \"{}\"", "", scenario.example);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /stream      toggle word-by-word streaming");
    println!("  /reload      retry the last prompt");
    println!("  /reset       clear the conversation");
    println!("  /scenarios   list demo scenarios");
    println!("  /quit        exit");
    println!("Ctrl-C cancels the request in flight.");
}
