// assure/src/commands/session.rs
//
// USE CASE: Session lifecycle (login / logout).

use super::Context;

pub fn login(ctx: &Context, token: &str) -> anyhow::Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("❌ Empty token.");
    }
    ctx.session.login(token)?;
    println!("🔑 Logged in. Token stored in {}", ctx.token_path.display());
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.session.clear()?;
    println!("🚪 Logged out.");
    Ok(())
}
