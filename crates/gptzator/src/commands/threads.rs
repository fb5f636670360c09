//! Threads command - browse chat threads.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use gptzator_client::ListThreadsQuery;

use super::{Context, heading, truncate};

/// Arguments for the threads command.
#[derive(Args, Debug)]
pub struct ThreadsArgs {
    #[command(subcommand)]
    pub command: ThreadsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThreadsCommand {
    /// List chat threads
    List {
        /// Search text
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
}

/// Run the threads command.
pub async fn run(args: ThreadsArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect()?;

    match args.command {
        ThreadsCommand::List { search, page } => {
            let threads = session.check(
                session
                    .client
                    .threads()
                    .list(ListThreadsQuery { search, page })
                    .await,
            )?;
            if ctx.print_json(&threads)? {
                return Ok(());
            }

            let dim = Style::new().dim();
            heading("Threads");
            if threads.docs.is_empty() {
                println!("{}", dim.apply_to("No threads found"));
            }
            for thread in &threads.docs {
                let model = thread
                    .model
                    .as_ref()
                    .map(|m| format!(" ({})", m.name))
                    .unwrap_or_default();
                println!(
                    "{} {}{}",
                    dim.apply_to(format!("[{}]", thread.id)),
                    truncate(&thread.title, 60),
                    dim.apply_to(model)
                );
            }
        }
    }

    Ok(())
}
