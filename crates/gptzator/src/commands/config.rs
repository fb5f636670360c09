//! Config command - connection context management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use gptzator_config::Context as ClientContext;

use super::{Context, heading};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show contexts and defaults
    Show,

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// API base URL (e.g., https://api.dev.gpt-zator.ladcloud.ru/api/)
        #[arg(long)]
        server: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// File to persist session tokens in
        #[arg(long)]
        token_file: Option<std::path::PathBuf>,
    },

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Delete a context
    RemoveContext {
        /// Context name to delete
        name: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::SetContext {
            name,
            server,
            timeout,
            token_file,
        } => cmd_set_context(&name, server, timeout, token_file),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::RemoveContext { name } => cmd_remove_context(&name),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let config = gptzator_config::load_client_config()?;
    if ctx.print_json(&config)? {
        return Ok(());
    }

    let dim = Style::new().dim();
    heading("Contexts");

    if config.contexts.is_empty() {
        println!("{}", dim.apply_to("No contexts configured."));
        println!();
        println!("Create one with:");
        println!("  gptzator config set-context dev --server=https://api.dev.gpt-zator.ladcloud.ru/api/");
    } else {
        let current = config.current_context.as_deref();
        println!("CURRENT   NAME            TIMEOUT   SERVER");
        for c in &config.contexts {
            let marker = if current == Some(c.name.as_str()) {
                "*"
            } else {
                " "
            };
            println!(
                "{}         {:<15} {:<9} {}",
                marker,
                c.name,
                format!("{}s", c.effective_timeout(&config.defaults).as_secs()),
                c.server
            );
        }
    }

    println!();
    println!(
        "{}",
        dim.apply_to(format!("Default timeout: {}s", config.defaults.timeout))
    );
    if ctx.verbose
        && let Some(path) = gptzator_config::client_config_path()
    {
        println!("{}", dim.apply_to(format!("Config file: {}", path.display())));
    }
    Ok(())
}

fn cmd_set_context(
    name: &str,
    server: Option<String>,
    timeout: Option<u64>,
    token_file: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut config = gptzator_config::load_client_config()?;

    match config.get_context_mut(name) {
        Some(existing) => {
            if let Some(url) = server {
                existing.server = url;
            }
            if let Some(t) = timeout {
                existing.timeout = Some(t);
            }
            if let Some(path) = token_file {
                existing.token_file = Some(path);
            }
            println!("Context \"{}\" modified.", name);
        }
        None => {
            let server = server
                .ok_or_else(|| anyhow::anyhow!("--server is required when creating a new context"))?;
            let mut context = ClientContext::new(name, server);
            if let Some(t) = timeout {
                context = context.with_timeout(t);
            }
            if let Some(path) = token_file {
                context = context.with_token_file(path);
            }
            config.set_context(context);
            println!("Context \"{}\" created.", name);
        }
    }

    // The first context becomes current
    if config.current_context.is_none() && config.contexts.len() == 1 {
        config.use_context(name)?;
        println!("Context \"{}\" set as current context.", name);
    }

    gptzator_config::save_client_config(&config)?;
    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = gptzator_config::load_client_config()?;
    config.use_context(name)?;
    gptzator_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);
    Ok(())
}

fn cmd_remove_context(name: &str) -> Result<()> {
    let mut config = gptzator_config::load_client_config()?;

    if config.remove_context(name).is_none() {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    gptzator_config::save_client_config(&config)?;

    println!("Context \"{}\" deleted.", name);
    if config.current_context.is_none() {
        println!("Note: No current context. Use 'gptzator config use-context <name>' to set one.");
    }
    Ok(())
}
