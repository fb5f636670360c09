//! Apps command - browse platform apps.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use gptzator_client::ListAppsQuery;

use super::{Context, heading, truncate};

/// Arguments for the apps command.
#[derive(Args, Debug)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AppsCommand {
    /// List apps
    List {
        /// Substring of the app name
        #[arg(short, long)]
        search: Option<String>,

        /// Only apps with this tag ID
        #[arg(short, long)]
        tag: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Show an app and its steps
    Get {
        /// App ID
        id: String,
    },
}

/// Run the apps command.
pub async fn run(args: AppsArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect()?;
    let apps = session.client.apps();
    let dim = Style::new().dim();

    match args.command {
        AppsCommand::List { search, tag, page } => {
            let query = ListAppsQuery {
                search,
                tag,
                page,
                ..Default::default()
            };
            let page = session.check(apps.list(query).await)?;
            if ctx.print_json(&page)? {
                return Ok(());
            }

            heading("Apps");
            if page.docs.is_empty() {
                println!("{}", dim.apply_to("No apps found"));
            }
            for app in &page.docs {
                println!(
                    "{} {} {}",
                    dim.apply_to(format!("[{}]", app.id.as_deref().unwrap_or("-"))),
                    app.name.as_deref().unwrap_or("(unnamed)"),
                    dim.apply_to(truncate(app.description_small.as_deref().unwrap_or(""), 50))
                );
            }
            if page.has_next_page == Some(true) {
                println!();
                println!(
                    "{}",
                    dim.apply_to(format!(
                        "Page {} of {} ({} apps)",
                        page.page.unwrap_or(1),
                        page.total_pages.unwrap_or(1),
                        page.total_docs
                    ))
                );
            }
        }
        AppsCommand::Get { id } => {
            let app = session.check(apps.get(&id).await)?;
            if ctx.print_json(&app)? {
                return Ok(());
            }

            heading(app.name.as_deref().unwrap_or("(unnamed)"));
            if let Some(description) = &app.description {
                println!("{}", description);
            }
            println!();
            println!("  {} {}", dim.apply_to("ID:"), id);
            println!(
                "  {} {}",
                dim.apply_to("Approximate cost:"),
                app.approximate_cost
            );
            if !app.actions.is_empty() {
                println!();
                println!("{}", style("Steps").bold());
                for (i, action) in app.actions.iter().enumerate() {
                    println!("{}. {}", style(i + 1).cyan(), action.block_name);
                }
            }
        }
    }

    Ok(())
}
