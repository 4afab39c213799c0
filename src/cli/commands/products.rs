use clap::Subcommand;
use uuid::Uuid;

use crate::cli::utils::{output_item, output_list};
use crate::cli::Context;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List marketplace products")]
    List {
        #[arg(long, help = "Only show products in this category")]
        category: Option<String>,
    },

    #[command(about = "Show one product")]
    Show {
        #[arg(help = "Product id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: ProductCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List { category } => {
            let mut products = ctx.client.products().await?;
            if let Some(category) = category {
                products.retain(|p| p.category.eq_ignore_ascii_case(&category));
            }

            output_list(&ctx.output, &products, "No products found", |p| {
                format!("{}  {:<30} {:>10.2}  stock {}", p.id, p.name, p.price, p.stock)
            })
        }
        ProductCommands::Show { id } => {
            let product = ctx.client.product(id).await?;
            let text = format!(
                "{}\n  {}\n  Price: {:.2}\n  Stock: {}\n  Category: {}\n  Seller: {}",
                product.name, product.description, product.price, product.stock, product.category, product.seller_id
            );
            output_item(&ctx.output, &product, text)
        }
    }
}
