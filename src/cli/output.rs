//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::{Item, ItemKind};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print key/value setting (green key)
pub fn setting(key: &str, value: &(impl std::fmt::Display + ?Sized)) {
    println!("{} = {}", key.green(), value);
}

/// Print plain output (no color, for data such as JSON documents)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Label for an item in a rendered tree: method-tagged requests, bold collections.
///
/// `hidden` is the number of children suppressed by a collapsed collection.
pub fn item_label(item: &Item, hidden: usize) -> String {
    match item.kind() {
        ItemKind::Request => format!("{} {}", item.method().cyan(), item.name()),
        ItemKind::Collection if hidden > 0 => {
            format!("{} {}", item.name().bold(), format!("(+{})", hidden).dimmed())
        }
        ItemKind::Collection => item.name().bold().to_string(),
        ItemKind::None => item.name().to_string(),
    }
}
