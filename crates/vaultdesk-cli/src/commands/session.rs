use anyhow::Result;
use serde_json::json;

use super::Context;

pub async fn status(ctx: &Context) -> Result<()> {
    let session = &ctx.vault.session;
    let reachable = session.check_status().await.is_some();
    let state = session.state();

    ctx.emit(
        json!({
            "server": ctx.base_url,
            "reachable": reachable,
            "state": state,
            "initialized": session.is_initialized(),
            "locked": session.is_locked(),
            "has_token": session.token().is_some(),
        }),
        || {
            let mut lines = vec![format!("Server: {}", ctx.base_url)];
            if reachable {
                lines.push(format!("State:  {state}"));
            } else {
                lines.push("State:  unknown (server unreachable)".to_string());
            }
            let token = if session.token().is_some() {
                format!("stored in {}", ctx.token_path.display())
            } else {
                "none".to_string()
            };
            lines.push(format!("Token:  {token}"));
            lines.join("\n")
        },
    )
}

pub async fn setup(ctx: &Context, password: &str, confirm: &str) -> Result<()> {
    ctx.vault.session.setup(password, confirm).await?;
    ctx.emit(json!({ "initialized": true }), || {
        "Master password set. Run `vaultdesk login` to unlock.".to_string()
    })
}

pub async fn login(ctx: &Context, password: &str) -> Result<()> {
    let response = ctx.vault.session.login(password).await?;
    ctx.emit(
        json!({
            "state": ctx.vault.session.state(),
            "expires_in": response.expires_in_seconds,
        }),
        || format!("Unlocked. Token expires in {}s.", response.expires_in_seconds),
    )
}

pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.vault.logout().await;
    ctx.emit(json!({ "state": ctx.vault.session.state() }), || {
        "Logged out.".to_string()
    })
}

pub async fn lock(ctx: &Context) -> Result<()> {
    ctx.vault.lock().await;
    ctx.emit(json!({ "state": ctx.vault.session.state() }), || {
        "Locked.".to_string()
    })
}

pub async fn change_password(ctx: &Context, current: &str, new: &str, confirm: &str) -> Result<()> {
    ctx.vault
        .session
        .change_password(current, new, confirm)
        .await?;
    ctx.emit(json!({ "changed": true }), || "Master password changed.".to_string())
}
