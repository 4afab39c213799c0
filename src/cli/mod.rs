pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use config::Session;

#[derive(Parser)]
#[command(name = "drycraft")]
#[command(about = "Dry Craft CLI - Command-line client for the Dry Craft API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "DRYCRAFT_SERVER_URL", help = "API base URL (overrides the saved session)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server health")]
    Health,

    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and publish posts")]
    Posts {
        #[command(subcommand)]
        cmd: commands::posts::PostCommands,
    },

    #[command(about = "Browse marketplace products")]
    Products {
        #[command(subcommand)]
        cmd: commands::products::ProductCommands,
    },

    #[command(about = "Browse and publish tutorials")]
    Tutorials {
        #[command(subcommand)]
        cmd: commands::tutorials::TutorialCommands,
    },

    #[command(about = "Unread messages for the signed-in seller")]
    Messages {
        #[command(subcommand)]
        cmd: commands::messages::MessageCommands,
    },

    #[command(about = "Notifications for the signed-in user")]
    Notifications {
        #[command(subcommand)]
        cmd: commands::notifications::NotificationCommands,
    },

    #[command(about = "Fetch or upload media with retry")]
    Media {
        #[command(subcommand)]
        cmd: commands::media::MediaCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: output format, the saved session, and a
/// client pointed at the right server with the session's token
pub struct Context {
    pub output: OutputFormat,
    pub session: Session,
    pub client: ApiClient,
}

impl Context {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut session = config::load_session()?;
        if let Some(server) = &cli.server {
            session.server_url = server.clone();
        }
        let client = ApiClient::new(&session.server_url)?.with_token(session.token.clone());

        Ok(Self {
            output: OutputFormat::from_cli(cli),
            session,
            client,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Health => commands::health::handle(&ctx).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut ctx).await,
        Commands::Posts { cmd } => commands::posts::handle(cmd, &ctx).await,
        Commands::Products { cmd } => commands::products::handle(cmd, &ctx).await,
        Commands::Tutorials { cmd } => commands::tutorials::handle(cmd, &ctx).await,
        Commands::Messages { cmd } => commands::messages::handle(cmd, &ctx).await,
        Commands::Notifications { cmd } => commands::notifications::handle(cmd, &ctx).await,
        Commands::Media { cmd } => commands::media::handle(cmd, &ctx).await,
    }
}

/// Report a failed command. API failures keep their status code in JSON mode.
pub fn report_error(output_format: &OutputFormat, error: &anyhow::Error, verbose: bool) {
    let status = error
        .downcast_ref::<crate::client::ClientError>()
        .and_then(|e| e.status());

    let message = if verbose { format!("{error:?}") } else { error.to_string() };
    if utils::output_error(output_format, &message, status).is_err() {
        eprintln!("Error: {message}");
    }
}
