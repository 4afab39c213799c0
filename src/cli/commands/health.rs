use crate::cli::{utils::output_item, Context};

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let health = ctx.client.health().await?;
    let status = health.get("status").and_then(|s| s.as_str()).unwrap_or("unknown");
    let database = health.get("database").and_then(|s| s.as_str()).unwrap_or("unknown");

    output_item(
        &ctx.output,
        &health,
        format!("{} is {} (database: {})", ctx.client.base_url(), status, database),
    )
}
