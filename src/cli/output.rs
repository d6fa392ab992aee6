use std::fmt;

use colored::Colorize;

/// Plain informational line.
pub fn info(message: impl fmt::Display) {
    println!("{}", message);
}

pub fn success(message: impl fmt::Display) {
    println!("{} {}", "[ok]".green().bold(), message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{} {}", "[!]".yellow().bold(), message);
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{} {}", "[x]".red().bold(), message);
}

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}
