use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_item, output_list};
use crate::cli::Context;
use crate::models::CraftType;

#[derive(Subcommand)]
pub enum TutorialCommands {
    #[command(about = "List tutorials")]
    List,

    #[command(about = "Show one tutorial with its steps")]
    Show {
        #[arg(help = "Tutorial id")]
        id: Uuid,
    },

    #[command(about = "Publish a tutorial")]
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long = "craft-type", help = "Craft type, e.g. \"Paper Craft\"")]
        craft_type: String,
        #[arg(long = "step", required = true, help = "Step text (repeatable, in order)")]
        steps: Vec<String>,
        #[arg(long = "material", required = true, help = "Material (repeatable)")]
        materials: Vec<String>,
        #[arg(long = "image", help = "Image URL (repeatable)")]
        images: Vec<String>,
    },
}

pub async fn handle(cmd: TutorialCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        TutorialCommands::List => {
            let tutorials = ctx.client.tutorials().await?;
            output_list(&ctx.output, &tutorials, "No tutorials found", |t| {
                format!("{}  {:<40} {} ({} steps)", t.id, t.title, t.craft_type, t.steps.len())
            })
        }
        TutorialCommands::Show { id } => {
            let tutorial = ctx.client.tutorial(id).await?;

            let mut text = format!("{} [{}]\n{}\n\nMaterials:\n", tutorial.title, tutorial.craft_type, tutorial.description);
            for material in &tutorial.materials {
                text.push_str(&format!("  - {}\n", material));
            }
            text.push_str("\nSteps:");
            for (index, step) in tutorial.steps.iter().enumerate() {
                text.push_str(&format!("\n  {}. {}", index + 1, step));
            }

            output_item(&ctx.output, &tutorial, text)
        }
        TutorialCommands::Create { title, description, craft_type, steps, materials, images } => {
            let user_id = ctx.session.require_user()?;
            // Reject unknown craft types locally with the list of valid ones
            let craft_type: CraftType = craft_type.parse().map_err(|e: String| {
                let valid: Vec<&str> = CraftType::ALL.iter().map(|c| c.as_str()).collect();
                anyhow::anyhow!("{}. Valid types: {}", e, valid.join(", "))
            })?;

            let body = json!({
                "title": title,
                "description": description,
                "craftType": craft_type,
                "steps": steps,
                "materials": materials,
                "images": images,
                "userId": user_id,
            });
            let tutorial = ctx.client.create_tutorial(&body).await?;
            output_item(&ctx.output, &tutorial, format!("✓ Published tutorial {}", tutorial.id))
        }
    }
}
