// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for help text and result listings.

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

/// 256-color palette codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Rank headings and help sections
    Heading = 74,
    /// Flags in help text
    Flag = 250,
    /// Help placeholders
    Placeholder = 245,
    /// Handles and other secondary text
    Muted = 240,
}

impl Tone {
    fn style(self) -> Style {
        Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(self as u8))))
    }

    fn paint(self, text: &str) -> String {
        if should_colorize() {
            format!("\x1b[38;5;{}m{text}\x1b[0m", self as u8)
        } else {
            text.to_string()
        }
    }
}

fn flag_set(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| v == "1")
}

/// `NO_COLOR=1` wins over `COLOR=1`; otherwise color only on a terminal.
pub fn should_colorize() -> bool {
    if flag_set("NO_COLOR") {
        return false;
    }
    flag_set("COLOR") || std::io::stdout().is_terminal()
}

pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Tone::Heading.style())
        .literal(Tone::Flag.style())
        .placeholder(Tone::Placeholder.style())
}

pub fn header(text: &str) -> String {
    Tone::Heading.paint(text)
}

pub fn muted(text: &str) -> String {
    Tone::Muted.paint(text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
