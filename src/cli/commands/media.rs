use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::Context;

#[derive(Subcommand)]
pub enum MediaCommands {
    #[command(about = "Download a media file, retrying transient failures")]
    Fetch {
        #[arg(help = "Media URL")]
        url: String,
        #[arg(long, short, help = "Write to this file")]
        output: PathBuf,
    },

    #[command(about = "Upload a file with PUT, retrying transient failures")]
    Upload {
        #[arg(help = "Upload URL")]
        url: String,
        #[arg(help = "Local file")]
        file: PathBuf,
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
    },
}

pub async fn handle(cmd: MediaCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        MediaCommands::Fetch { url, output } => {
            let bytes = ctx.client.fetch_media(&url).await?;
            tokio::fs::write(&output, &bytes).await?;
            output_success(
                &ctx.output,
                &format!("Saved {} bytes to {}", bytes.len(), output.display()),
                Some(json!({ "bytes": bytes.len(), "path": output })),
            )
        }
        MediaCommands::Upload { url, file, content_type } => {
            let bytes = tokio::fs::read(&file).await?;
            let size = bytes.len();
            let response = ctx.client.upload_media(&url, bytes, &content_type).await?;
            output_success(
                &ctx.output,
                &format!("Uploaded {} ({} bytes)", file.display(), size),
                Some(json!({ "bytes": size, "response": response })),
            )
        }
    }
}
