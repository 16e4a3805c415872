//! Shared helpers for command implementations

use super::Session;
use anyhow::{Result, bail};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mensa::error::MensaError;
use mensa::models::Canteen;

/// Spinner on a TTY, hidden otherwise
pub(super) fn spinner(message: impl Into<String>) -> ProgressBar {
    if !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub(super) fn print_failure(message: impl std::fmt::Display) {
    println!("{} {}", "✗".red(), message);
}

/// User-facing explanation for a failed canteen lookup
pub(super) fn describe_lookup_error(id: u32, error: &MensaError) -> String {
    if error.is_not_found() {
        format!("A mensa with ID {} does not seem to exist.", id)
    } else {
        format!("Could not fetch mensa {}: {}", id, error)
    }
}

/// The canteen a command should operate on.
///
/// With an explicit `id` the canteen is looked up; a failed lookup is reported
/// and yields `None`. Without one the stored default is used, and having no
/// default is an error.
pub(super) async fn target_canteen(session: &Session, id: Option<u32>) -> Result<Option<Canteen>> {
    match id {
        Some(id) => match session.api.canteen(id).await {
            Ok(canteen) => Ok(Some(canteen)),
            Err(e) => {
                print_failure(describe_lookup_error(id, &e));
                Ok(None)
            }
        },
        None => match session.store.read() {
            Some(config) => Ok(Some(config.canteen)),
            None => bail!(
                "No mensa ID was given and there is no default mensa. \
                 Pass an ID or run `mensa set-default <ID>` first."
            ),
        },
    }
}
