// assure/src/commands/download.rs
//
// USE CASE: Save the original document to disk.

use std::path::PathBuf;

use assure_core::infrastructure::fs::atomic_write;
use assure_core::ports::DocumentService;

use super::Context;

pub async fn execute(ctx: &Context, document_id: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    ctx.require_login()?;

    let bytes = ctx.api.download_document(document_id).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", document_id)));
    atomic_write(&path, &bytes)?;

    println!("⬇️  {} bytes written to {}", bytes.len(), path.display());
    Ok(())
}
