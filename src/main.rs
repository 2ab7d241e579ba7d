//! Groupchat CLI
//!
//! Terminal front-end over the headless views:
//! - Register, log in and log out
//! - Show the profile
//! - Read (and follow) the chat, send messages

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groupchat::{
    generate_default_config, App, Config, HomePage, LoadOutcome, Locale, LoggingConfig, Mount,
    SessionContext, SubmitOutcome, Text,
};

#[derive(Parser)]
#[command(name = "groupchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the group chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/groupchat/config.toml or ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat server URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Interface language (ru, en)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Directory holding the session file
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        username: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in
    Login {
        #[arg(short, long)]
        username: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in member
    Profile,

    /// Print the chat
    Messages {
        /// Keep polling and print new messages as they arrive
        #[arg(short, long)]
        follow: bool,
        /// Poll interval in seconds (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Send a message
    Send {
        content: String,
    },

    /// List client-side routes
    Routes,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let app = App::new(config).context("Failed to initialize client")?;
    let locale = app.locale();

    match cli.command {
        Commands::Register { username, password } => {
            let mut page = app.register_page();
            if page.mount() != Mount::Ready {
                return already_signed_in(&app);
            }
            page.set_username(username.as_str());
            page.set_password(read_password(password)?);

            match page.submit().await {
                SubmitOutcome::Completed => {
                    println!("{} {}", locale.text(Text::SignedIn), username)
                }
                _ => bail!("{}", page.error().unwrap_or_default()),
            }
        }

        Commands::Login { username, password } => {
            let mut page = app.login_page();
            if page.mount() != Mount::Ready {
                return already_signed_in(&app);
            }
            page.set_username(username.as_str());
            page.set_password(read_password(password)?);

            match page.submit().await {
                SubmitOutcome::Completed => {
                    println!("{} {}", locale.text(Text::SignedIn), username)
                }
                _ => bail!("{}", page.error().unwrap_or_default()),
            }
        }

        Commands::Logout => {
            let mut header = app.header_bar();
            header.mount();
            header.logout();
            println!("{}", locale.text(Text::SignedOut));
        }

        Commands::Profile => {
            let mut page = app.profile_page();
            if page.mount() != Mount::Ready {
                bail!("{}", locale.text(Text::NotSignedIn));
            }
            match page.load().await {
                LoadOutcome::Loaded => {}
                LoadOutcome::Expired => bail!("{}", locale.text(Text::SessionExpired)),
                _ => bail!("{}", page.placeholder().unwrap_or_default()),
            }
            if let Some(member) = page.member() {
                println!("{}", member.username);
                let joined = page.joined();
                if !joined.is_empty() {
                    println!("{} {}", locale.text(Text::JoinedAt), joined);
                }
            }
        }

        Commands::Messages { follow, interval } => {
            let mut page = app.home_page();
            page.mount();
            if !page.is_authenticated() {
                bail!("{}", page.placeholder().unwrap_or_default());
            }

            match page.load_messages().await {
                LoadOutcome::Loaded => {}
                LoadOutcome::Expired => bail!("{}", locale.text(Text::SessionExpired)),
                _ => bail!("{}", page.placeholder().unwrap_or_default()),
            }
            match page.placeholder() {
                Some(text) => println!("{}", text),
                None => print_messages(&page, page.messages()),
            }

            if follow {
                let secs = interval.unwrap_or(app.config().ui.poll_interval_secs).max(1);
                follow_messages(&mut page, Duration::from_secs(secs)).await?;
            }
        }

        Commands::Send { content } => {
            let mut page = app.home_page();
            page.mount();
            page.set_draft(content);

            match page.submit().await {
                SubmitOutcome::Completed => {
                    let sent = page.messages().last().cloned();
                    if let Some(message) = sent {
                        print_messages(&page, std::slice::from_ref(&message));
                    }
                }
                SubmitOutcome::Ignored => {}
                SubmitOutcome::Expired => bail!("{}", locale.text(Text::SessionExpired)),
                _ => bail!("{}", page.send_error().unwrap_or_default()),
            }
        }

        Commands::Routes => {
            for path in groupchat::registered_routes().unwrap_or_default() {
                println!("{}", path);
            }
        }

        // Config was handled before the app was built
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("groupchat={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote default config to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

fn already_signed_in(app: &App) -> anyhow::Result<()> {
    let username = app
        .session()
        .member()
        .map(|m| m.username)
        .unwrap_or_default();
    println!("{} {}", app.locale().text(Text::AlreadySignedIn), username);
    Ok(())
}

fn print_messages(page: &HomePage, messages: &[groupchat::Message]) {
    for message in messages {
        let view = page.view(message);
        println!("[{}] {}: {}", view.time, view.author, view.content);
    }
}

async fn follow_messages(page: &mut HomePage, every: Duration) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                page.unmount();
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let (outcome, fresh) = page.refresh().await;
        match outcome {
            LoadOutcome::Loaded => print_messages(page, &fresh),
            LoadOutcome::Expired => bail!("{}", page.load_error().unwrap_or_default()),
            _ => {
                if let Some(error) = page.load_error() {
                    eprintln!("{}", error);
                }
            }
        }
    }
}
