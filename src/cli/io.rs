use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output::{self, MessageKind};

pub fn print_info(message: impl fmt::Display) {
    output::print(MessageKind::Info, message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::print(MessageKind::Hint, message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::print(MessageKind::Warning, message);
}

pub fn print_error(message: impl fmt::Display) {
    output::print(MessageKind::Error, message);
}

pub fn print_success(message: impl fmt::Display) {
    output::print(MessageKind::Success, message);
}

pub fn print_section(title: impl fmt::Display) {
    output::print(MessageKind::Section, title);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
}

/// Read-only table rendered with columns padded to their widest cell.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|idx| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .chain(std::iter::once(&self.headers[idx]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            widths
                .iter()
                .enumerate()
                .map(|(idx, width)| {
                    let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                    format!("{:width$}", cell, width = width)
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(&self.headers)];
        out.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        out.extend(self.rows.iter().map(|row| line(row)));
        out.join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }
}
