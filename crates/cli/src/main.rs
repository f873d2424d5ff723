// crates/cli/src/main.rs
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use moodlog_common::EntryDraft;
use moodlog_core::{
    auth::{MemoryAuthBackend, RateLimiter},
    config::{Settings, CONFIG_FILE},
    entries::{MemoryEntryStore, ENTRY_DATE_FORMAT},
    validation::{sanitize_text, validate_email, validate_name, validate_password, ENTRY_MAX_LENGTH},
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moodlog", version, about = "Validate journal input and exercise attempt limits")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip markup from text and escape what remains
    Sanitize {
        text: String,
        /// Maximum length of the sanitized text
        #[arg(long, default_value_t = ENTRY_MAX_LENGTH)]
        max: usize,
    },
    /// Validate a single field and print the result as JSON
    Check {
        #[arg(value_enum)]
        field: Field,
        value: String,
    },
    /// Run attempts against a limiter and print each decision as JSON
    Limit {
        key: String,
        #[arg(long, default_value_t = 1)]
        attempts: u32,
        #[arg(long, value_enum, default_value_t = Policy::Login)]
        policy: Policy,
    },
    /// Sign up, fail some logins, then sign in and write an entry, in memory
    Demo {
        #[arg(long, default_value = "Demo User")]
        name: String,
        #[arg(long, default_value = "demo@example.com")]
        email: String,
        #[arg(long, default_value = "Abcdefg1!")]
        password: String,
        /// Wrong-password logins to attempt before the real one
        #[arg(long, default_value_t = 3)]
        wrong_attempts: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Field {
    Name,
    Email,
    Password,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    Login,
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    init_tracing(&settings.log_level);

    match cli.command {
        Command::Sanitize { text, max } => match sanitize_text(&text, max) {
            Ok(sanitized) => println!("{sanitized}"),
            Err(err) => anyhow::bail!(err),
        },
        Command::Check { field, value } => {
            let result = match field {
                Field::Name => validate_name(&value),
                Field::Email => validate_email(&value),
                Field::Password => validate_password(&value),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        },
        Command::Limit {
            key,
            attempts,
            policy,
        } => {
            let limiter = match policy {
                Policy::Login => RateLimiter::from_settings(&settings.auth_limit),
                Policy::Reset => RateLimiter::from_settings(&settings.password_reset_limit),
            };
            for _ in 0..attempts {
                let decision = limiter.check_limit(&key);
                println!("{}", serde_json::to_string(&decision)?);
            }
        },
        Command::Demo {
            name,
            email,
            password,
            wrong_attempts,
        } => run_demo(settings, &name, &email, &password, wrong_attempts).await?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_demo(
    settings: Settings,
    name: &str,
    email: &str,
    password: &str,
    wrong_attempts: u32,
) -> anyhow::Result<()> {
    let state = AppState::new(MemoryAuthBackend::new(), MemoryEntryStore::new(), settings);

    let account = match state.auth.sign_up(name, email, password).await {
        Ok(account) => account,
        Err(err) => anyhow::bail!(err.user_message()),
    };
    println!("created account {} for {}", account.uid, account.email);
    state.auth.sign_out().await?;

    let wrong = format!("{password}-wrong");
    for attempt in 1..=wrong_attempts {
        match state.auth.login(email, &wrong).await {
            Ok(_) => println!("attempt {attempt}: unexpectedly signed in"),
            Err(err) => println!("attempt {attempt}: {} [{}]", err.user_message(), err.error_code()),
        }
    }

    let account = match state.auth.login(email, password).await {
        Ok(account) => account,
        Err(err) => {
            println!("sign-in refused: {}", err.user_message());
            return Ok(());
        },
    };
    println!("signed in as {}", account.display_name.as_deref().unwrap_or(&account.email));

    let draft = EntryDraft {
        date: Utc::now().date_naive().format(ENTRY_DATE_FORMAT).to_string(),
        text: "Wrote my first <b>entry</b> from the command line.".to_string(),
        mood: "😌".to_string(),
        ..EntryDraft::default()
    };
    let entry = state.journal.save_entry(&account.uid, draft).await?;
    println!("saved entry for {}: {}", entry.date, entry.text);
    info!(entries = state.journal.entries(&entry.user_id).await?.len(), "demo finished");

    Ok(())
}
