//! Terminal rendering of notifications and the column menu.

use std::io::{self, Write};

use client_core::{ColumnMenu, Notifier};

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn emit(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl Notifier for ConsoleNotifier {
    fn show_loading(&self, title: &str, text: &str) {
        self.emit(&format!("[..] {title} {text}"));
    }

    fn show_success(&self, title: &str, text: &str) {
        self.emit(&format!("[ok] {title} {text}"));
    }

    fn show_error(&self, title: &str, message: &str) {
        let _ = writeln!(io::stderr().lock(), "[!!] {title}: {message}");
    }

    fn show_column_menu(&self, menu: &ColumnMenu) {
        self.emit(&render_menu(menu));
    }

    fn dismiss(&self) {}
}

pub fn render_menu(menu: &ColumnMenu) -> String {
    let mut rendered = format!("{}\n{}", menu.title, menu.prompt);
    for entry in menu.entries() {
        rendered.push_str(&format!("\n  [{}] {}", entry.index(), entry.name()));
    }
    rendered
}
