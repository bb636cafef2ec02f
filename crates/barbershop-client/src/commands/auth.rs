//! Login, logout and the current user.

use barbershop_core::Credentials;
use tracing::{info, warn};

use super::Context;
use crate::error::{ClientError, ClientResult};

/// Logs in and stores the session.
///
/// `password` may be a reference resolved by [`resolve_secret`]. The email
/// shape and password length are checked before the server is contacted.
pub async fn login(ctx: &Context, email: &str, password: &str) -> ClientResult<String> {
    let credentials = Credentials::new(email, resolve_secret(password)?);
    credentials.validate()?;

    let session = ctx
        .api
        .login(&credentials.email, &credentials.password)
        .await?;
    let user = session.user.clone();
    ctx.session.set(session)?;

    info!(email = %user.email, "logged in");
    ctx.output.message(&format!("Logado como {} <{}>", user.name, user.email))
}

/// Logs out on the server and forgets the local session.
///
/// The local session is cleared even when the server call fails.
pub async fn logout(ctx: &Context) -> ClientResult<String> {
    if let Err(e) = ctx.api.logout().await {
        warn!("server logout failed: {}", e);
    }
    ctx.session.clear()?;
    ctx.output.message("Sessão encerrada")
}

/// Shows the logged-in user as the server sees it.
pub async fn whoami(ctx: &Context) -> ClientResult<String> {
    let user = ctx.api.me().await?;
    ctx.output.user(&user)
}

/// Resolves a value that may reference a secret kept elsewhere.
///
/// - `env::VAR` reads `$VAR`
/// - `pass::path` runs `pass show path` and takes the first line
/// - anything else is used as-is
pub fn resolve_secret(value: &str) -> ClientResult<String> {
    if let Some(var) = value.strip_prefix("env::") {
        return std::env::var(var)
            .map_err(|_| ClientError::Input(format!("environment variable `{}` is not set", var)));
    }

    let Some(path) = value.strip_prefix("pass::") else {
        return Ok(value.to_string());
    };

    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| ClientError::Input(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        return Err(ClientError::Input(format!(
            "`pass show {}` failed: {}",
            path,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ClientError::Input(format!("`pass show {}` produced no output", path)))
}
