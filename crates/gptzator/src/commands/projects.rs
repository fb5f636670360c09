//! Projects command - list projects and run apps to completion.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use gptzator_client::{Artefact, CallAppOptions, ErrorKind, ListProjectsQuery, Project};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use super::{Context, heading, truncate};

/// Arguments for the projects command.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List your projects
    List {
        /// Substring of the project name
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Show a project and its artefacts
    Get {
        /// Project ID
        id: String,
    },

    /// Create a project from an app and wait for generation to finish
    Run {
        /// App ID
        app_id: String,

        /// What to generate
        idea: String,

        /// Use the single-step generator instead of blocks
        #[arg(long)]
        single_step: bool,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "2000")]
        interval_ms: u64,

        /// Give up after this many seconds
        #[arg(long, default_value = "300")]
        timeout_secs: u64,
    },
}

/// Run the projects command.
pub async fn run(args: ProjectsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProjectsCommand::List { search, page } => cmd_list(ctx, search, page).await,
        ProjectsCommand::Get { id } => cmd_get(ctx, &id).await,
        ProjectsCommand::Run {
            app_id,
            idea,
            single_step,
            interval_ms,
            timeout_secs,
        } => {
            let mut options = CallAppOptions::default()
                .poll_interval(Duration::from_millis(interval_ms))
                .timeout(Duration::from_secs(timeout_secs));
            if single_step {
                options = options.single_step();
            }
            cmd_run(ctx, &app_id, &idea, options).await
        }
    }
}

async fn cmd_list(ctx: &Context, search: Option<String>, page: Option<u32>) -> Result<()> {
    let session = ctx.connect()?;
    let projects = session.check(
        session
            .client
            .projects()
            .list(ListProjectsQuery { search, page })
            .await,
    )?;
    if ctx.print_json(&projects)? {
        return Ok(());
    }

    let dim = Style::new().dim();
    heading("Projects");
    if projects.docs.is_empty() {
        println!("{}", dim.apply_to("No projects found"));
    }
    for project in &projects.docs {
        let marker = if project.generating {
            style("●").yellow()
        } else if project.is_error {
            style("●").red()
        } else {
            style("●").green()
        };
        println!(
            "{} {} {}",
            marker,
            dim.apply_to(format!("[{}]", project.id)),
            truncate(display_name(project), 60)
        );
    }
    if let (Some(page), Some(total)) = (projects.page, projects.total_pages)
        && total > 1
    {
        println!();
        println!("{}", dim.apply_to(format!("Page {} of {}", page, total)));
    }
    Ok(())
}

async fn cmd_get(ctx: &Context, id: &str) -> Result<()> {
    let session = ctx.connect()?;
    let project = session.check(session.client.projects().get(id).await)?;
    if ctx.print_json(&project)? {
        return Ok(());
    }
    print_project(&project);
    Ok(())
}

async fn cmd_run(ctx: &Context, app_id: &str, idea: &str, options: CallAppOptions) -> Result<()> {
    let session = ctx.connect()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = if ctx.json_output {
        ProgressBar::hidden()
    } else {
        spinner("Generating...")
    };

    let result = session
        .client
        .projects()
        .call_app(app_id, idea, options.cancellation(cancel))
        .await;
    spinner.finish_and_clear();

    let project = match result {
        Err(e) if e.kind == ErrorKind::Cancelled => {
            eprintln!("{}", Style::new().dim().apply_to("Cancelled."));
            return Ok(());
        }
        other => session.check(other)?,
    };

    if ctx.print_json(&project)? {
        return Ok(());
    }
    print_project(&project);
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(template);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn display_name(project: &Project) -> &str {
    if project.name.is_empty() {
        &project.idea
    } else {
        &project.name
    }
}

fn print_project(project: &Project) {
    let dim = Style::new().dim();

    heading(display_name(project));
    println!("  {} {}", dim.apply_to("ID:"), project.id);
    if !project.idea.is_empty() {
        println!("  {} {}", dim.apply_to("Idea:"), truncate(&project.idea, 70));
    }
    let status = if project.generating {
        style("generating").yellow()
    } else if project.is_error {
        style("failed").red()
    } else {
        style("ready").green()
    };
    println!("  {} {}", dim.apply_to("Status:"), status);
    if let Some(error) = project.last_generation_error.as_deref().filter(|e| !e.is_empty()) {
        println!("  {} {}", dim.apply_to("Error:"), style(error).red());
    }

    for artefact in &project.artefacts {
        println!();
        print_artefact(artefact);
    }
}

fn print_artefact(artefact: &Artefact) {
    println!("{}", style(&artefact.name).bold().cyan());
    match &artefact.data {
        serde_json::Value::String(text) => println!("{}", text),
        serde_json::Value::Null => println!("{}", Style::new().dim().apply_to("(empty)")),
        other => match serde_json::to_string_pretty(other) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", other),
        },
    }
}
