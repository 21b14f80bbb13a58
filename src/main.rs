//! `shortify`: terminal front end for the link-shortening dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (prompts for credentials)
//! shortify login
//!
//! # Shorten a URL; the short link is copied to the clipboard
//! shortify shorten https://example.com/a/long/path --alias launch
//!
//! # Dashboard: links and total clicks over the last year
//! shortify links
//! shortify stats --from 2025-01-01 --to 2025-03-31
//!
//! # Per-link analytics for the last 30 days
//! shortify analytics launch
//!
//! # Manage a link
//! shortify update launch --deactivate
//! shortify delete launch
//!
//! # Resolve a short path to its redirect target
//! shortify open /s/launch
//! ```
//!
//! # Environment Variables
//!
//! See [`shortify_dashboard::config`] for the full list.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use tracing_subscriber::EnvFilter;

use shortify_dashboard::config::{self, Config};
use shortify_dashboard::domain::chart::ChartData;
use shortify_dashboard::domain::entities::{
    DateRange, LinkForm, LinkPatch, ShortLink, display_short_url,
};
use shortify_dashboard::error::AppError;
use shortify_dashboard::infrastructure::cache::QueryState;
use shortify_dashboard::state::{AppState, Effects};
use shortify_dashboard::utils::datetime::local_input_to_utc;

/// Link-shortening dashboard in the terminal.
#[derive(Parser)]
#[command(name = "shortify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Shorten a URL
    Shorten {
        /// URL to shorten (scheme optional)
        url: String,

        /// Custom alias (letters, digits and dashes)
        #[arg(short, long)]
        alias: Option<String>,

        /// Expiry as local time, `YYYY-MM-DDTHH:MM`
        #[arg(short, long)]
        expires: Option<String>,

        /// Protect the link with a password (prompted)
        #[arg(short, long)]
        protect: bool,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// List your links, newest first
    Links,

    /// Show total clicks per day
    Stats {
        /// First day, `YYYY-MM-DD` (default: one year ago)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day, `YYYY-MM-DD` (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show clicks for one link over the last 30 days
    Analytics {
        /// Short token
        short_url: String,
    },

    /// Delete a link
    Delete {
        /// Short token
        short_url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Change a link
    Update {
        /// Short token
        short_url: String,

        #[arg(short, long)]
        alias: Option<String>,

        #[arg(long, conflicts_with = "deactivate")]
        activate: bool,

        #[arg(long)]
        deactivate: bool,

        /// New expiry as local time, `YYYY-MM-DDTHH:MM`
        #[arg(short, long)]
        expires: Option<String>,

        /// Set a new password (prompted)
        #[arg(long, conflicts_with = "remove_password")]
        password: bool,

        #[arg(long)]
        remove_password: bool,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Copy a link's public URL to the clipboard
    Copy {
        /// Short token
        short_url: String,
    },

    /// Resolve a short path (`/s/{token}`) and follow the redirect
    Open {
        path: String,
    },
}

impl Commands {
    fn needs_session(&self) -> bool {
        match self {
            Self::Login { .. }
            | Self::Register { .. }
            | Self::Logout
            | Self::Copy { .. }
            | Self::Open { .. } => false,
            Self::Shorten { .. }
            | Self::Links
            | Self::Stats { .. }
            | Self::Analytics { .. }
            | Self::Delete { .. }
            | Self::Update { .. } => true,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    init_logging(&config);
    config.print_summary();

    let state = AppState::new(config, Effects::terminal()).context("Failed to start client")?;

    if cli.command.needs_session() {
        require_session(&state)?;
    }
    let code = run(&state, cli.command).await?;

    if let Some(status) = state.auth_failure() {
        tracing::warn!(status, "Session rejected by backend");
        state.expire_session()?;
        eprintln!(
            "{}",
            "Your session has expired. Run `shortify login` to sign in again.".yellow()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(code)
}

/// Installs the `tracing` subscriber on stderr, text or JSON.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn require_session(state: &AppState) -> Result<()> {
    if !state.session.is_authenticated() {
        anyhow::bail!("Not signed in. Run `shortify login` first.");
    }
    Ok(())
}

async fn run(state: &AppState, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Login { username } => login(state, username).await,
        Commands::Register { username, email } => register(state, username, email).await,
        Commands::Logout => logout(state),
        Commands::Open { path } => Ok(open(state, &path).await),
        Commands::Copy { short_url } => Ok(outcome(state.links.copy(&short_url))),
        Commands::Shorten {
            url,
            alias,
            expires,
            protect,
            category,
        } => shorten(state, url, alias, expires, protect, category).await,
        Commands::Links => list_links(state).await,
        Commands::Stats { from, to } => show_stats(state, from, to).await,
        Commands::Analytics { short_url } => show_analytics(state, &short_url).await,
        Commands::Delete { short_url, yes } => delete_link(state, &short_url, yes).await,
        Commands::Update {
            short_url,
            alias,
            activate,
            deactivate,
            expires,
            password,
            remove_password,
            category,
        } => {
            let mut patch = LinkPatch {
                custom_alias: alias,
                category,
                ..LinkPatch::default()
            };
            if activate || deactivate {
                patch.is_active = Some(activate);
            }
            if let Some(expires) = expires {
                patch.expires_at = Some(
                    local_input_to_utc(&expires, &Local)
                        .with_context(|| format!("Invalid expiry '{expires}'"))?,
                );
            }
            if password {
                patch.is_protected = Some(true);
                patch.password = Some(prompt_password("New password")?);
            }
            if remove_password {
                patch.is_protected = Some(false);
                patch.remove_password = Some(true);
            }
            update_link(state, &short_url, patch).await
        }
    }
}

/// Maps a service result to an exit code.
///
/// Remote and storage failures were already shown by the service; validation
/// errors are printed here.
fn outcome<T>(result: Result<T, AppError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(AppError::Validation { field, message }) => {
            eprintln!(
                "{} {}: {}",
                "✗".red().bold(),
                field.to_string().bright_white(),
                message.red()
            );
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

async fn login(state: &AppState, username: Option<String>) -> Result<ExitCode> {
    println!("{}", "🔑 Sign in".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = prompt_password("Password")?;

    Ok(outcome(state.auth.login(&username, &password).await))
}

async fn register(
    state: &AppState,
    username: Option<String>,
    email: Option<String>,
) -> Result<ExitCode> {
    println!("{}", "📝 Create account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    Ok(outcome(state.auth.register(&username, &email, &password).await))
}

fn logout(state: &AppState) -> Result<ExitCode> {
    state.collection.clear();
    state.auth.logout().context("Failed to remove session file")?;
    println!("{}", "✅ Signed out".green().bold());
    Ok(ExitCode::SUCCESS)
}

async fn shorten(
    state: &AppState,
    url: String,
    alias: Option<String>,
    expires: Option<String>,
    protect: bool,
    category: Option<String>,
) -> Result<ExitCode> {
    let mut form = LinkForm {
        original_url: url,
        custom_alias: alias.unwrap_or_default(),
        expires_at: expires.unwrap_or_default(),
        is_protected: protect,
        category: category.unwrap_or_default(),
        ..LinkForm::default()
    };
    if protect {
        form.password = prompt_password("Link password")?;
    }

    let result = state.links.create(&mut form).await;
    if let Ok(link) = &result {
        println!();
        println!(
            "  Short:    {}",
            state.links.public_url(&link.short_url).bright_yellow().bold()
        );
        println!("  Original: {}", link.original_url.bright_black());
        println!();
    }
    Ok(outcome(result))
}

async fn list_links(state: &AppState) -> Result<ExitCode> {
    println!("{}", "📋 My Links".bright_blue().bold());
    println!();

    let summary = match state.collection.load().await {
        QueryState::Ready(summary) => summary,
        QueryState::Failed(_) => return Ok(ExitCode::FAILURE),
        QueryState::Loading => {
            println!("{}", "  Loading...".bright_black());
            return Ok(ExitCode::SUCCESS);
        }
    };

    if summary.links.is_empty() {
        println!("{}", "  You haven't created any short link yet".yellow());
        println!();
        println!("  Create one with: {} <url>", "shortify shorten".bright_cyan());
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "  {:<32} {:<8} {:<14} {}",
        "Short".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for link in &summary.links {
        print_link_row(state, link);
    }

    println!();
    println!(
        "  Links: {}   Clicks (last year): {}",
        summary.total_links.to_string().bright_white().bold(),
        summary.total_click_count.to_string().bright_white().bold()
    );
    println!();

    Ok(ExitCode::SUCCESS)
}

fn print_link_row(state: &AppState, link: &ShortLink) {
    let short = display_short_url(&state.config.frontend_url, &link.short_url);
    let short = if link.active == Some(false) || link.is_expired_at(chrono::Utc::now()) {
        short.bright_black().strikethrough()
    } else {
        short.cyan()
    };

    println!(
        "  {:<32} {:<8} {:<14} {}",
        short,
        link.click_count.to_string().green(),
        link.created_label().bright_black(),
        link.original_url
    );
}

async fn show_stats(
    state: &AppState,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<ExitCode> {
    let default = DateRange::trailing_year(Local::now().date_naive());
    let range = DateRange::new(from.unwrap_or(default.start()), to.unwrap_or(default.end()))
        .context("Invalid date range")?;
    state.collection.set_range(range);

    println!(
        "{} {} → {}",
        "📊 Total clicks".bright_blue().bold(),
        range.start(),
        range.end()
    );
    println!();

    match state.collection.load().await {
        QueryState::Ready(summary) => {
            print_chart(&summary.chart());
            println!();
            println!(
                "  Total: {}",
                summary.total_click_count.to_string().bright_white().bold()
            );
            println!();
            Ok(ExitCode::SUCCESS)
        }
        QueryState::Failed(_) => Ok(ExitCode::FAILURE),
        QueryState::Loading => Ok(ExitCode::SUCCESS),
    }
}

async fn show_analytics(state: &AppState, short_url: &str) -> Result<ExitCode> {
    println!(
        "{} {}",
        "📈 Analytics".bright_blue().bold(),
        display_short_url(&state.config.frontend_url, short_url).cyan()
    );
    println!();

    let panel = state.analytics_panel(short_url);
    if let Some(load) = panel.toggle() {
        load.await.context("Analytics task failed")?;
    }

    match panel.view() {
        QueryState::Ready(chart) => {
            print_chart(&chart);
            println!();
            println!(
                "  Clicks (last 30 days): {}",
                panel.total_clicks().to_string().bright_white().bold()
            );
            println!();
            Ok(ExitCode::SUCCESS)
        }
        QueryState::Failed(_) => Ok(ExitCode::FAILURE),
        QueryState::Loading => Ok(ExitCode::SUCCESS),
    }
}

/// Horizontal bar chart, one row per day.
fn print_chart(chart: &ChartData) {
    const WIDTH: u64 = 40;

    let points = match chart {
        ChartData::NoData => {
            println!("{}", "  No data for this time period".yellow());
            return;
        }
        ChartData::Series(points) => points,
    };

    let max = chart.max_count().max(1);
    for point in points {
        let bar = "█".repeat((point.count * WIDTH / max) as usize);
        println!(
            "  {:<8} {} {}",
            point.label.bright_black(),
            bar.green(),
            point.count
        );
    }
}

async fn delete_link(state: &AppState, short_url: &str, skip_confirm: bool) -> Result<ExitCode> {
    println!("{}", "🗑️  Delete link".bright_blue().bold());
    println!();
    println!("  Link: {}", state.links.public_url(short_url).cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(ExitCode::SUCCESS);
        }
    }

    Ok(outcome(state.links.delete(short_url).await))
}

async fn update_link(state: &AppState, short_url: &str, patch: LinkPatch) -> Result<ExitCode> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to update. See `shortify update --help`.");
    }

    let result = state.links.update(short_url, patch).await;
    if let Ok(link) = &result {
        println!("  Link: {}", state.links.public_url(&link.short_url).cyan());
    }
    Ok(outcome(result))
}

async fn open(state: &AppState, path: &str) -> ExitCode {
    match state.redirects.resolve(path) {
        Some(_) => {
            println!("{}", "Redirecting...".bright_black());
            state.redirects.wait().await;
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{} No short link in '{}'", "✗".red().bold(), path);
            ExitCode::FAILURE
        }
    }
}
