use clap::Subcommand;
use uuid::Uuid;

use crate::cli::utils::{output_item, output_list, output_success, truncate};
use crate::cli::Context;

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List posts, newest first")]
    List {
        #[arg(long, default_value_t = 20, help = "Maximum number of posts to show")]
        limit: usize,
    },

    #[command(about = "Publish a post")]
    Create {
        #[arg(long, help = "Post text")]
        content: Option<String>,
        #[arg(long = "image", help = "Image URL (repeatable)")]
        images: Vec<String>,
        #[arg(long, help = "Video URL")]
        video: Option<String>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: PostCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        PostCommands::List { limit } => {
            let mut posts = ctx.client.posts().await?;
            posts.truncate(limit);

            output_list(&ctx.output, &posts, "No posts yet", |post| {
                let reactions: u32 = post.reaction_counts.values().sum();
                format!(
                    "{}  {}  [{} reactions, {} comments]",
                    post.id,
                    truncate(&post.content, 60),
                    reactions,
                    post.comments.len()
                )
            })
        }
        PostCommands::Create { content, images, video } => {
            ctx.session.require_user()?;
            let post = ctx
                .client
                .create_post(content.as_deref().unwrap_or_default(), &images, video.as_deref())
                .await?;
            output_item(&ctx.output, &post, format!("✓ Published post {}", post.id))
        }
        PostCommands::Delete { id } => {
            ctx.session.require_user()?;
            ctx.client.delete_post(id).await?;
            output_success(&ctx.output, &format!("Deleted post {}", id), None)
        }
    }
}
