//! Terminal color selection.
//!
//! `--color always|never` wins. With `auto` the usual conventions apply:
//! `NO_COLOR` (https://no-color.org/) disables color, `CLICOLOR_FORCE`
//! (non-zero) forces it, `CLICOLOR=0` disables it, and otherwise color is
//! used only when stdout is a terminal.

use clap::ValueEnum;
use colored::control;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Decide whether to emit color for `choice`, given an environment lookup.
fn wants_color(choice: ColorChoice, env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    match choice {
        ColorChoice::Always => return true,
        ColorChoice::Never => return false,
        ColorChoice::Auto => {}
    }

    if env("NO_COLOR").is_some() {
        return false;
    }
    if env("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }
    if env("CLICOLOR").is_some_and(|v| v == "0") {
        return false;
    }
    is_tty
}

/// Configure `colored` for the whole process. Call once, early in `main`.
pub fn init_colors(choice: ColorChoice) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let enabled = wants_color(choice, |key| std::env::var(key).ok(), is_tty);
    control::set_override(enabled);
}
