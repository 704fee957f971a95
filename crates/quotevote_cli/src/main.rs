//! Command-line client for the QuoteVote API.

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use quotevote_client::backend::{spawn_backend, CoreCmd, CoreEvent};
use quotevote_client::{auth, HttpQuoteStore, QuoteController};
use quotevote_core::text::{is_password_secure, password_strength, PasswordStrength};
use quotevote_core::{
    ClientError, Config, FileSessionStore, QueryState, Quote, QuoteFilter, QuoteId, SessionStore,
    SortDirection,
};
use std::io::{self, BufRead, Read};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qv", about = "QuoteVote CLI", version)]
struct Cli {
    /// Server URL (can also be set via QV_SERVER env var)
    #[arg(short, long, env = "QV_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Log timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct QueryArgs {
    /// Search term
    #[arg(short = 'q', long, default_value = "")]
    search: String,

    /// all, voted, or unvoted
    #[arg(short, long, default_value = "all")]
    filter: QuoteFilter,

    /// desc or asc (by vote count)
    #[arg(long, default_value = "desc")]
    sort: SortDirection,
}

impl From<QueryArgs> for QueryState {
    fn from(args: QueryArgs) -> Self {
        Self {
            search: args.search,
            filter: args.filter,
            sort: args.sort,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Log in and store the session
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "QV_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List quotes
    List {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show the top voted quotes among the listed ones
    Top {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Vote for a quote
    Vote {
        id: QuoteId,
    },
    /// Create a quote (text read from stdin when omitted)
    New {
        text: Option<String>,
    },
    /// Replace the text of a quote that has no votes yet
    Edit {
        id: QuoteId,
        text: String,
    },
    /// Delete a quote
    Delete {
        id: QuoteId,
    },
    /// Interactive browsing with debounced search
    Browse,
}

/// Input accepted by `qv browse`, one line at a time.
#[derive(Debug)]
enum BrowseInput {
    Command(CoreCmd),
    Quit,
    Invalid(String),
}

fn parse_id(raw: Option<&str>) -> Result<QuoteId, String> {
    raw.and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| "expected a numeric quote id".to_string())
}

fn parse_browse_line(line: &str) -> BrowseInput {
    let Some(directive) = line.strip_prefix(':') else {
        return BrowseInput::Command(CoreCmd::SetSearch(line.trim_end().to_string()));
    };
    let (name, rest) = directive
        .split_once(' ')
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((directive.trim(), ""));
    let command = match name {
        "q" | "quit" => return BrowseInput::Quit,
        "filter" => rest.parse().map(CoreCmd::SetFilter),
        "sort" if rest.is_empty() => Ok(CoreCmd::ToggleSort),
        "sort" => rest.parse().map(CoreCmd::SetSort),
        "refresh" => Ok(CoreCmd::Refresh),
        "vote" => parse_id(Some(rest)).map(|id| CoreCmd::Vote { id }),
        "new" => Ok(CoreCmd::Create {
            text: rest.to_string(),
        }),
        "edit" => parse_id(Some(rest)).map(|id| CoreCmd::BeginEdit { id }),
        "save" => {
            let mut parts = rest.splitn(2, ' ');
            parse_id(parts.next()).map(|id| CoreCmd::Update {
                id,
                text: parts.next().unwrap_or_default().to_string(),
            })
        }
        "delete" => parse_id(Some(rest)).map(|id| CoreCmd::Delete { id }),
        "logout" => Ok(CoreCmd::Logout),
        other => Err(format!("unknown command ':{}'", other)),
    };
    match command {
        Ok(command) => BrowseInput::Command(command),
        Err(message) => BrowseInput::Invalid(message),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| {
            parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

fn format_quote_rows(quotes: &[Quote], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(quotes)
            .map_err(|err| format!("response encoding error: {}", err));
    }
    let rows: Vec<String> = quotes
        .iter()
        .map(|quote| {
            format!(
                "{:>6} {:>5} votes  {:<16} {:<16} \"{}\"",
                quote.id,
                quote.vote_count,
                quote.author,
                format_timestamp(&quote.created_at),
                single_line(&quote.text)
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

const CHART_WIDTH: u64 = 30;

/// Render the leaderboard as a horizontal bar chart scaled to the top count.
fn format_leaderboard(top: &[Quote], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(top)
            .map_err(|err| format!("response encoding error: {}", err));
    }
    let max_votes = top.iter().map(|quote| quote.vote_count).max().unwrap_or(0);
    let rows: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(rank, quote)| {
            let width = if max_votes == 0 {
                0
            } else {
                (quote.vote_count * CHART_WIDTH).div_ceil(max_votes)
            };
            let mut text = single_line(&quote.text);
            if text.chars().count() > 40 {
                text = text.chars().take(39).collect::<String>() + "…";
            }
            format!(
                "{}. {:<40} {:<30} {}",
                rank + 1,
                text,
                "#".repeat(width as usize),
                quote.vote_count
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

fn print_or_exit(output: Result<String, String>, action: &str) {
    match output {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn exit_for(err: &ClientError) -> ! {
    eprintln!("{}", err);
    if err.requires_login() {
        eprintln!("Run `qv login <username>` to authenticate.");
    }
    std::process::exit(1);
}

/// Whether a failed `vote` got past the vote request itself.
///
/// Only the follow-up search records `last_error`, so on a fresh controller
/// a set error means the vote was accepted.
fn vote_recorded_before<R: quotevote_client::QuoteRemote>(
    controller: &QuoteController<R>,
) -> bool {
    controller.last_error().is_some()
}

fn read_stdin_line(prompt: &str) -> io::Result<String> {
    eprint!("{}", prompt);
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn resolve_config(server: Option<String>, timeout: Option<u64>, timing: bool) -> Config {
    let mut config = Config::from_env();
    if let Some(server) = quotevote_core::text::normalize_optional_nonempty(server) {
        config.server_url = server;
    }
    if let Some(secs) = timeout.filter(|secs| *secs > 0) {
        config.request_timeout = Duration::from_secs(secs);
    }
    config.log_timing |= timing;
    config
}

fn run_browse(controller: QuoteController<HttpQuoteStore>, debounce: Duration, json: bool) {
    let backend = spawn_backend(controller, debounce);
    let events = backend.evt_rx.clone();
    let printer = std::thread::spawn(move || {
        for event in events.iter() {
            match event {
                CoreEvent::Loading => eprintln!("Loading..."),
                CoreEvent::QuotesLoaded { items, leaderboard }
                | CoreEvent::QuoteDeleted {
                    items, leaderboard, ..
                } => {
                    print_or_exit(format_quote_rows(&items, json), "Browse");
                    println!("-- Top Voted Quotes --");
                    print_or_exit(format_leaderboard(&leaderboard, json), "Browse");
                }
                CoreEvent::EditReady { id, text } => {
                    println!("Editing {}: \"{}\" (use :save {} <text>)", id, text, id)
                }
                CoreEvent::LoggedOut => println!("Logged out."),
                CoreEvent::LoginRequired { message } => {
                    eprintln!("{}", message);
                    eprintln!("Run `qv login <username>` to authenticate.");
                    std::process::exit(1);
                }
                CoreEvent::Error { message } => eprintln!("{}", message),
            }
        }
    });

    eprintln!("Type to search; :filter all|voted|unvoted, :sort [desc|asc], :vote <id>, :new <text>, :edit <id>, :save <id> <text>, :delete <id>, :refresh, :logout, :quit");
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match parse_browse_line(&line) {
            BrowseInput::Quit => break,
            BrowseInput::Invalid(message) => eprintln!("{}", message),
            BrowseInput::Command(command) => {
                if backend.cmd_tx.send(command).is_err() {
                    break;
                }
            }
        }
    }

    backend.shutdown();
    let _ = printer.join();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    let default_filter = if timing || quotevote_core::config::env_flag_enabled("QV_LOG_TIMING") {
        "quotevote=warn,quotevote::timing=info"
    } else {
        "quotevote=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = resolve_config(server, timeout, timing);
    tracing::debug!(
        server = %config.server_url,
        timeout_secs = config.request_timeout.as_secs(),
        "resolved client config"
    );
    let store = HttpQuoteStore::new(&config.server_url, config.request_timeout)
        .with_context(|| format!("invalid server URL '{}'", config.server_url))?
        .with_timing(config.log_timing);
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_path));

    match command {
        Commands::Completions { .. } => {}
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_stdin_line("Password: ")?,
            };
            match auth::login(&store, session.as_ref(), &username, &password).await {
                Ok(stored) => println!("Logged in as {} ({})", stored.username, stored.role),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let password = match password {
                Some(password) => password,
                None => read_stdin_line("Password: ")?,
            };
            let confirm = confirm.unwrap_or_else(|| password.clone());
            let strength = PasswordStrength::from_score(password_strength(&password));
            eprintln!("Password strength: {}", strength.label());
            if !is_password_secure(&password) {
                eprintln!("Tip: mix upper and lower case, digits, and symbols in 8+ characters.");
            }
            match auth::register(&store, &username, &password, &confirm).await {
                Ok(()) => println!("Registered {}. Run `qv login {}` next.", username, username),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Logout => {
            if let Err(err) = auth::logout(session.as_ref()) {
                exit_for(&err);
            }
            println!("Logged out.");
        }
        Commands::Whoami => match session.get().filter(|s| !s.token.is_empty()) {
            Some(current) if json => println!(
                "{}",
                serde_json::json!({
                    "username": current.username,
                    "role": current.role,
                    "logged_in_at": current.logged_in_at,
                })
            ),
            Some(current) => println!(
                "{} ({}) since {}",
                current.username,
                current.role,
                current
                    .logged_in_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            ),
            None => exit_for(&ClientError::Unauthenticated),
        },
        Commands::List { query } => {
            let mut controller = QuoteController::new(store, session);
            match controller.search(query.into()).await {
                Ok(quotes) => print_or_exit(format_quote_rows(quotes, json), "List"),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Top { query } => {
            let mut controller = QuoteController::new(store, session);
            if let Err(err) = controller.search(query.into()).await {
                exit_for(&err);
            }
            print_or_exit(format_leaderboard(controller.leaderboard(), json), "Top");
        }
        Commands::Vote { id } => {
            let mut controller = QuoteController::new(store, session);
            match controller.vote(id).await {
                Ok(quotes) => match quotes.iter().find(|quote| quote.id == id) {
                    Some(quote) => println!("Voted: {} now has {} votes", id, quote.vote_count),
                    None => println!("Voted: {}", id),
                },
                Err(err) => {
                    if vote_recorded_before(&controller) {
                        eprintln!("Voted: {} (the refreshed list could not be loaded)", id);
                    }
                    exit_for(&err)
                }
            }
        }
        Commands::New { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let mut controller = QuoteController::new(store, session);
            match controller.create(&text).await {
                Ok(quotes) => println!("Created. {} quotes listed.", quotes.len()),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Edit { id, text } => {
            let mut controller = QuoteController::new(store, session);
            if let Err(err) = controller.refresh().await {
                exit_for(&err);
            }
            if let Err(err) = controller.begin_edit(id) {
                exit_for(&err);
            }
            match controller.update(id, &text).await {
                Ok(_) => println!("Updated quote {}", id),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Delete { id } => {
            let mut controller = QuoteController::new(store, session);
            match controller.delete(id).await {
                Ok(_) => println!("Deleted quote {}", id),
                Err(err) => exit_for(&err),
            }
        }
        Commands::Browse => {
            let controller = QuoteController::new(store, session);
            let debounce = config.search_debounce;
            tokio::task::spawn_blocking(move || run_browse(controller, debounce, json))
                .await
                .context("browse session aborted")?;
        }
    }

    Ok(())
}
