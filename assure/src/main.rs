// assure/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=assure_core=debug assure track <id> pour voir chaque tick.
    // Les logs vont sur stderr, stdout reste la sortie de la commande.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_deref())?;

    match cli.command {
        // --- SESSION ---
        Commands::Login { token } => commands::session::login(&ctx, &token)?,
        Commands::Logout => commands::session::logout(&ctx)?,

        // --- USE CASE: ANALYSIS & TRACKING ---
        Commands::Analyze {
            document_id,
            kind,
            no_track,
        } => commands::analyze::execute(&ctx, &document_id, kind, no_track).await?,
        Commands::Track { assessment_id } => commands::track::execute(&ctx, &assessment_id).await?,

        // --- USE CASE: COMPLIANCE ---
        Commands::Summary {
            assessment_id,
            mode,
            include_non_relevant,
            format,
        } => {
            commands::summary::execute(&ctx, &assessment_id, mode, include_non_relevant, format)
                .await?
        }
        Commands::Review {
            assessment_id,
            response_id,
            decision,
            notes,
        } => {
            commands::review::execute(&ctx, &assessment_id, &response_id, decision, notes).await?
        }
        Commands::Signoff {
            assessment_id,
            reviewer,
            approved,
            notes,
        } => commands::signoff::execute(&ctx, &assessment_id, reviewer, approved, notes).await?,

        // --- USE CASE: DOCUMENTS ---
        Commands::Documents {
            project_id,
            page,
            page_size,
            format,
        } => commands::documents::execute(&ctx, &project_id, page, page_size, format).await?,
        Commands::Categorize {
            document_id,
            category,
        } => commands::categorize::execute(&ctx, &document_id, category).await?,
        Commands::Download {
            document_id,
            output,
        } => commands::download::execute(&ctx, &document_id, output).await?,
    }

    Ok(())
}
