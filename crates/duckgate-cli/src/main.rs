//! duckgate - a line-oriented shell for the ducks API.
//!
//! Sign up, log in and view your profile from the terminal. Views are
//! guarded the same way the web client guards its routes.

mod app;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use duckgate_core::{Config, ViewScope};

use app::{App, Command, LoginForm, RegisterForm, HELP_TEXT};

// ============================================================================
// Constants
// ============================================================================

/// Path to open when none is given on the command line
const DEFAULT_START_PATH: &str = "/";

const LOG_FILE_NAME: &str = "duckgate.log";

const ENV_PASSWORD: &str = "DUCKGATE_PASSWORD";

/// Exit status after an interrupt at the prompt
const EXIT_INTERRUPTED: i32 = 130;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and to a daily rolling file in the cache directory.
/// The returned guard must be held until exit so the file writer flushes.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            Config::default()
        }
    };
    config.apply_env();

    let _guard = init_tracing(config.cache_dir().ok().map(|dir| dir.join("logs")));
    info!(api = config.api_base_url(), "duckgate starting");

    let start_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_START_PATH.to_string());

    let mut app = App::new(config)?;
    tokio::spawn(watch_interrupts(app.scope()));

    let navigation = app.start(&start_path).await;
    if navigation.redirected {
        println!("(redirected to {})", navigation.route);
    }
    println!("{}\n", app.render().await);

    let result = run_shell(&mut app).await;

    info!("duckgate shutting down");
    result
}

/// Ctrl-C aborts whatever request is in flight; at the prompt it exits.
async fn watch_interrupts(scope: Arc<ViewScope>) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        if !cancel_in_flight(&scope) {
            println!();
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}

/// Cancel the scope if a request is running. Returns false when idle.
fn cancel_in_flight(scope: &ViewScope) -> bool {
    if scope.in_flight() == 0 {
        return false;
    }
    info!("Interrupted, cancelling request");
    scope.cancel();
    true
}

async fn run_shell(app: &mut App) -> Result<()> {
    let stdin = io::stdin();

    loop {
        let location = app
            .current_route()
            .map(|r| r.path())
            .unwrap_or(DEFAULT_START_PATH);
        print!("duckgate:{}> ", location);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => return Ok(()),
            Command::Help => println!("{}", HELP_TEXT),
            Command::Where => println!("{}", location),
            Command::WhoAmI => match app.session().user().await {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => println!("Not signed in"),
            },
            Command::Go(path) => {
                let navigation = app.go(&path).await;
                if navigation.redirected {
                    println!("(redirected to {})", navigation.route);
                }
                println!("{}", app.render().await);
            }
            Command::Login(username) => {
                let form = prompt_login(app, username)?;
                println!("{}", app.login(form).await);
                println!("{}", app.render().await);
            }
            Command::Register => {
                let form = prompt_register()?;
                println!("{}", app.register(form).await);
                println!("{}", app.render().await);
            }
            Command::Logout => {
                let navigation = app.logout().await;
                println!("Signed out.");
                if navigation.redirected {
                    println!("(redirected to {})", navigation.route);
                }
                println!("{}", app.render().await);
            }
            Command::Unknown(what) => {
                warn!(command = %what, "Unknown command");
                println!("Unknown command: {} (try `help`)", what);
            }
        }
        println!();
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_password(label: &str) -> Result<String> {
    let password = rpassword::prompt_password(format!("{}: ", label))?;
    Ok(password)
}

fn prompt_login(app: &App, username: Option<String>) -> Result<LoginForm> {
    let username = match username {
        Some(name) => name,
        None => match app.config.last_username.as_deref() {
            Some(last) => {
                let input = prompt_line(&format!("Username [{}]", last))?;
                if input.is_empty() {
                    last.to_string()
                } else {
                    input
                }
            }
            None => prompt_line("Username")?,
        },
    };

    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) if !password.is_empty() => password,
        _ => prompt_password("Password")?,
    };

    Ok(LoginForm { username, password })
}

fn prompt_register() -> Result<RegisterForm> {
    Ok(RegisterForm {
        username: prompt_line("Username")?,
        email: prompt_line("Email")?,
        password: prompt_password("Password")?,
        confirm_password: prompt_password("Confirm password")?,
    })
}

// ============================================================================
// Tests
// ============================================================================
