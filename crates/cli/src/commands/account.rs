//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! scoder login -e jane@example.com -p secret1
//! scoder register -n "Jane Doe" -e jane@example.com -p secret1 -c secret1
//! scoder whoami
//! scoder logout
//! ```
//!
//! # Environment Variables
//!
//! - `SCODER_DATA_DIR` - Where the session is saved
//! - `SCODER_AUTH_DELAY_MS` - Simulated login latency

use std::io::Write;

use scoder_storefront::models::User;
use scoder_storefront::services::{LoginForm, RegisterForm};
use scoder_storefront::{AppError, Storefront};

use super::CliError;

pub fn whoami(storefront: &Storefront, out: &mut impl Write) -> Result<(), CliError> {
    match storefront.restore_session() {
        Some(user) => write_user(out, &user)?,
        None => writeln!(out, "Not logged in")?,
    }
    Ok(())
}

pub async fn login(
    storefront: &Storefront,
    form: &LoginForm,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let user = storefront
        .auth()
        .login(form)
        .await
        .map_err(AppError::from)?;
    writeln!(out, "Welcome back, {}!", user.name)?;
    Ok(())
}

pub async fn register(
    storefront: &Storefront,
    form: &RegisterForm,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let user = storefront
        .auth()
        .register(form)
        .await
        .map_err(AppError::from)?;
    writeln!(out, "Account created. Welcome, {}!", user.name)?;
    Ok(())
}

pub fn logout(storefront: &Storefront, out: &mut impl Write) -> Result<(), CliError> {
    if storefront.restore_session().is_none() {
        writeln!(out, "Not logged in")?;
        return Ok(());
    }
    storefront.auth().logout();
    writeln!(out, "Logged out")?;
    Ok(())
}

pub fn write_user(out: &mut impl Write, user: &User) -> std::io::Result<()> {
    writeln!(out, "{} <{}> (id {})", user.name, user.email, user.id)
}
