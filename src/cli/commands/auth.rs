use clap::Subcommand;
use serde_json::json;

use crate::cli::{config, utils::output_success, Context, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "DRYCRAFT_PASSWORD", help = "Password")]
        password: String,
    },

    #[command(about = "Register new user and sign in")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "DRYCRAFT_PASSWORD", help = "Password (at least 6 characters)")]
        password: String,
    },

    #[command(about = "Forget the saved token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let auth = ctx.client.login(&username, &password).await?;
            ctx.session.sign_in(auth.token, auth.user.id, auth.user.username.clone());
            config::save_session(&ctx.session)?;

            output_success(
                &ctx.output,
                &format!("Signed in as {}", auth.user.username),
                Some(json!({ "user_id": auth.user.id, "server": ctx.session.server_url })),
            )
        }
        AuthCommands::Register { username, email, password } => {
            let auth = ctx.client.register(&username, &email, &password).await?;
            ctx.session.sign_in(auth.token, auth.user.id, auth.user.username.clone());
            config::save_session(&ctx.session)?;

            output_success(
                &ctx.output,
                &format!("Registered and signed in as {}", auth.user.username),
                Some(json!({ "user_id": auth.user.id, "server": ctx.session.server_url })),
            )
        }
        AuthCommands::Logout => {
            ctx.session.sign_out();
            config::save_session(&ctx.session)?;
            output_success(&ctx.output, "Signed out", None)
        }
        AuthCommands::Status => {
            match ctx.output {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "server": ctx.session.server_url,
                            "signed_in": ctx.session.is_signed_in(),
                            "username": ctx.session.username,
                            "user_id": ctx.session.user_id,
                            "signed_in_at": ctx.session.signed_in_at,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Server: {}", ctx.session.server_url);
                    match (&ctx.session.username, ctx.session.signed_in_at) {
                        (Some(username), Some(at)) => println!("Signed in as {} since {}", username, at.to_rfc3339()),
                        _ => println!("Not signed in"),
                    }
                }
            }
            Ok(())
        }
    }
}
