//! Auth command - sign in and out of the platform.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde::Serialize;

use super::{Context, heading};

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show who is signed in
    Status,
}

/// Status output for JSON mode.
#[derive(Debug, Serialize)]
struct StatusOutput {
    authenticated: bool,
    email: Option<String>,
    server_url: String,
    context: Option<String>,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { email, password } => cmd_login(ctx, &email, password).await,
        AuthCommand::Logout => cmd_logout(ctx).await,
        AuthCommand::Status => cmd_status(ctx).await,
    }
}

async fn cmd_login(ctx: &Context, email: &str, password: Option<String>) -> Result<()> {
    let session = ctx.connect()?;

    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };

    let login = session.check(session.client.user().login(email, &password).await)?;

    if ctx.print_json(&login.user)? {
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    println!("{} Signed in as {}", green.apply_to("✓"), email);
    if ctx.verbose {
        println!("{}", dim.apply_to(format!("Server: {}", session.server_url)));
    }
    Ok(())
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    let session = ctx.connect()?;

    if session.client.tokens().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    // Tokens are cleared locally whatever the server says
    if let Err(e) = session.client.user().logout().await {
        let dim = Style::new().dim();
        eprintln!("{}", dim.apply_to(format!("Server logout failed: {}", e)));
    }
    println!("Signed out.");
    Ok(())
}

async fn cmd_status(ctx: &Context) -> Result<()> {
    let session = ctx.connect()?;

    let user = if session.client.tokens().is_some() {
        session.check(session.client.user().me().await)?
    } else {
        None
    };

    let output = StatusOutput {
        authenticated: user.is_some(),
        email: user.map(|u| u.email),
        server_url: session.server_url.clone(),
        context: session.context_name.clone(),
    };
    if ctx.print_json(&output)? {
        return Ok(());
    }

    let green = Style::new().green();
    let red = Style::new().red();
    let dim = Style::new().dim();

    println!();
    heading("Authentication Status");
    println!();
    match &output.email {
        Some(email) => println!(
            "  {} {} {}",
            dim.apply_to("Status:"),
            green.apply_to("● signed in as"),
            email
        ),
        None => println!(
            "  {} {}",
            dim.apply_to("Status:"),
            red.apply_to("● not signed in")
        ),
    }
    println!("  {} {}", dim.apply_to("Server:"), output.server_url);
    if let Some(name) = &output.context {
        println!("  {} {}", dim.apply_to("Context:"), name);
    }
    if output.email.is_none() {
        println!();
        println!(
            "  {}",
            dim.apply_to("Sign in with: gptzator auth login --email <EMAIL>")
        );
    }
    println!();
    Ok(())
}
