//! Account and session commands

use std::time::Duration;

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::client::models::SignupRequest;
use crate::error::Result;
use crate::models::UsernameDisplay;
use crate::output::Formattable;

/// Spinner on stderr while a request is in flight
fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Use the given value or ask for it
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => Ok(v),
        None => Ok(Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()?),
    }
}

/// Run the login command
pub async fn login(
    opts: &GlobalOptions,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;

    let email = value_or_prompt(email, "Email")?;
    let password = match password.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    let progress = spinner("Signing in...");
    let result = ctx.session.login(email.trim(), &password).await;
    progress.finish_and_clear();
    result?;

    let name = ctx.session.username().unwrap_or(email);
    println!("{} Logged in as {}", "✓".green(), name.bold());

    Ok(())
}

/// Run the logout command. Succeeds even when no one is signed in.
pub async fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;

    let was_authenticated = ctx.session.is_authenticated();
    ctx.session.logout();

    if was_authenticated {
        println!("{} Logged out", "✓".green());
    } else {
        println!("{} Not logged in", "○".dimmed());
    }

    Ok(())
}

/// Account details collected from flags and prompts
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Run the register command. Does not sign in.
pub async fn register(opts: &GlobalOptions, registration: Registration) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;

    let password = match registration.password.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let request = SignupRequest::new(
        &registration.first_name,
        &registration.last_name,
        &registration.email,
        &password,
        registration.username.as_deref(),
    );

    let progress = spinner("Creating account...");
    let result = ctx.session.register(&request).await;
    progress.finish_and_clear();
    result?;

    println!(
        "{} Account created for {}",
        "✓".green(),
        request.username.bold()
    );
    println!("  → Run {} to sign in", "taskdesk login".cyan());

    Ok(())
}

/// Run the check-username command
pub async fn check_username(opts: &GlobalOptions, username: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let username = username.trim();

    let availability = ctx.session.check_username(username).await?;

    match ctx.format {
        OutputFormat::Json => vec![UsernameDisplay {
            username: username.to_string(),
            available: availability.available,
        }]
        .print(ctx.format)?,
        OutputFormat::Table => {
            if availability.available {
                println!("{} {} is available", "✓".green(), username.bold());
            } else {
                println!("{} {} is already taken", "✗".red(), username.bold());
            }
        }
    }

    Ok(())
}
