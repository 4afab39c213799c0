use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use tracing::warn;

use crate::cli::utils::output_list;
use crate::cli::{Context, OutputFormat};
use crate::client::Poller;
use crate::models::Notification;

#[derive(Subcommand)]
pub enum NotificationCommands {
    #[command(about = "List unread notifications")]
    Unread,

    #[command(about = "Poll for new notifications until interrupted")]
    Watch {
        #[arg(long, default_value_t = 30, help = "Seconds between polls")]
        interval: u64,
    },
}

fn line(notification: &Notification) -> String {
    format!("{}  {}", notification.created_at.format("%Y-%m-%d %H:%M"), notification.content)
}

pub async fn handle(cmd: NotificationCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;

    match cmd {
        NotificationCommands::Unread => {
            let notifications = ctx.client.unread_notifications().await?;
            output_list(&ctx.output, &notifications, "No unread notifications", line)
        }
        NotificationCommands::Watch { interval } => {
            let client = ctx.client.clone();
            let output = ctx.output;
            let seen = Arc::new(Mutex::new(HashSet::new()));

            let mut poller = Poller::new(Duration::from_secs(interval.max(1)));
            poller.start(move || {
                let client = client.clone();
                let seen = seen.clone();
                async move {
                    let notifications = match client.unread_notifications().await {
                        Ok(notifications) => notifications,
                        Err(e) => {
                            warn!(error = %e, "Polling notifications failed");
                            return;
                        }
                    };

                    let fresh: Vec<Notification> = match seen.lock() {
                        Ok(mut seen) => notifications.into_iter().filter(|n| seen.insert(n.id)).collect(),
                        Err(_) => return,
                    };
                    for notification in &fresh {
                        match output {
                            OutputFormat::Json => match serde_json::to_string(notification) {
                                Ok(json) => println!("{}", json),
                                Err(e) => warn!(error = %e, "Could not encode notification"),
                            },
                            OutputFormat::Text => println!("{}", line(notification)),
                        }
                    }
                }
            });

            tokio::signal::ctrl_c().await?;
            poller.stop();
            Ok(())
        }
    }
}
