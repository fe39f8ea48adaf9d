//! Whoami command implementation

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::models::SessionDisplay;
use crate::output::{Formattable, Record};
use crate::session::SessionPhase;

/// Show the stored session. Reads local state only.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let state = ctx.session.state();

    if ctx.format == OutputFormat::Json {
        return Record(SessionDisplay::new(&state, &ctx.api_url)).print(ctx.format);
    }

    if ctx.session.phase() == SessionPhase::Authenticated {
        let name = ctx
            .session
            .username()
            .unwrap_or_else(|| "unknown user".to_string());
        println!("{} Logged in as {}", "✓".green(), name.bold());

        if let Some(user) = state.user.as_ref() {
            if let Some(email) = user.email() {
                println!("  Email:   {}", email);
            }
            if let Some(id) = user.user_id() {
                println!("  User ID: {}", id.dimmed());
            }
        }
    } else {
        println!("{} Not logged in", "✗".red());
        println!("  → Run {} to sign in", "taskdesk login".cyan());
    }

    println!();
    println!("API:     {}", ctx.api_url.cyan());
    println!("Session: {}", ctx.session_path.display());

    Ok(())
}
