use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use tracing::warn;

use crate::cli::utils::{output_list, truncate};
use crate::cli::{Context, OutputFormat};
use crate::client::Poller;
use crate::models::Message;

#[derive(Subcommand)]
pub enum MessageCommands {
    #[command(about = "List unread messages sent to you")]
    Unread,

    #[command(about = "Poll for new unread messages until interrupted")]
    Watch {
        #[arg(long, default_value_t = 30, help = "Seconds between polls")]
        interval: u64,
    },
}

fn line(message: &Message) -> String {
    format!("{}  from {}  {}", message.id, message.sender_id, truncate(&message.content, 60))
}

pub async fn handle(cmd: MessageCommands, ctx: &Context) -> anyhow::Result<()> {
    let user_id = ctx.session.require_user()?;

    match cmd {
        MessageCommands::Unread => {
            let messages = ctx.client.unread_messages(user_id).await?;
            output_list(&ctx.output, &messages, "No unread messages", line)
        }
        MessageCommands::Watch { interval } => {
            let client = ctx.client.clone();
            let output = ctx.output;
            let seen = Arc::new(Mutex::new(HashSet::new()));

            let mut poller = Poller::new(Duration::from_secs(interval.max(1)));
            poller.start(move || {
                let client = client.clone();
                let seen = seen.clone();
                async move {
                    let messages = match client.unread_messages(user_id).await {
                        Ok(messages) => messages,
                        Err(e) => {
                            warn!(error = %e, "Polling unread messages failed");
                            return;
                        }
                    };

                    let fresh: Vec<Message> = match seen.lock() {
                        Ok(mut seen) => messages.into_iter().filter(|m| seen.insert(m.id)).collect(),
                        Err(_) => return,
                    };
                    for message in &fresh {
                        match output {
                            OutputFormat::Json => match serde_json::to_string(message) {
                                Ok(json) => println!("{}", json),
                                Err(e) => warn!(error = %e, "Could not encode message"),
                            },
                            OutputFormat::Text => println!("{}", line(message)),
                        }
                    }
                }
            });

            if matches!(ctx.output, OutputFormat::Text) {
                eprintln!("Watching for messages every {}s (Ctrl+C to stop)", poller.period().as_secs());
            }
            tokio::signal::ctrl_c().await?;
            poller.stop();
            Ok(())
        }
    }
}
