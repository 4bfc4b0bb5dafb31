//! A recipe book client for a recipe REST API server.
//!
//! The client authenticates against the server, then browses, creates, and
//! deletes recipes either through a plain text REPL or a TUI.

use anyhow::{Context, Result};
use pico_args::Arguments;
use std::io::{self, Write};
use std::path::PathBuf;

use rb_client::{
    api_client::{ApiClient, ApiError},
    session::SessionStore,
    text_client::TextClient,
    tui_app::TuiApp,
};

const HELP: &str = "\
Connect to a recipe book server

USAGE:
  rb_client [OPTIONS]

OPTIONS:
  --server URL          Server URL  [default: http://localhost:8000]
  --username NAME       Username for login
  --password PASS       Password for login
  --session-file PATH   Session token file  [default: ~/.rb_client/session.json]
  --tui                 Use TUI (Terminal UI) mode [default: false]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    username: Option<String>,
    password: Option<String>,
    session_file: Option<PathBuf>,
    use_tui: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .value_from_str("--server")
            .unwrap_or_else(|_| "http://localhost:8000".to_string()),
        username: pargs.opt_value_from_str("--username").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        session_file: pargs.opt_value_from_str("--session-file").ok().flatten(),
        use_tui: pargs.contains("--tui"),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let session_path = args
        .session_file
        .unwrap_or_else(SessionStore::default_path);
    let session = SessionStore::open(session_path);
    let mut api = ApiClient::new(args.server_url.clone(), session);

    if args.use_tui {
        // TUI mode handles login and registration with its own screens
        let terminal = ratatui::init();
        let result = TuiApp::new(api).run(terminal).await;
        ratatui::restore();
        return result;
    }

    // Plain mode: reuse a persisted session, otherwise log in up front
    if !api.is_authenticated() {
        login_or_register(&mut api, args.username, args.password).await?;
    }

    TextClient::new(api).run().await
}

/// Prompt for credentials and log in; on a rejected login, offer to register
/// first. Password confirmation is checked before any register request.
async fn login_or_register(
    api: &mut ApiClient,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    println!("Logging in as {username}...");
    match api.login(&username, &password).await {
        Ok(()) => {
            println!("Login successful!");
            return Ok(());
        }
        Err(e) => println!("Login failed: {e}"),
    }

    let answer = prompt("Register a new account? [y/N]: ")?;
    if !answer.eq_ignore_ascii_case("y") {
        anyhow::bail!("Not logged in");
    }

    let email = prompt("Email: ")?;
    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match!");
    }

    match api.register(&username, &email, &password).await {
        Ok(()) => println!("Registration successful!"),
        Err(ApiError::Server(detail)) => anyhow::bail!("Registration failed: {detail}"),
        Err(e) => return Err(e).context("Failed to register"),
    }

    api.login(&username, &password)
        .await
        .context("Failed to log in after registering")?;
    println!("Login successful!");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
