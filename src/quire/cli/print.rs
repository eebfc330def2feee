use chrono::{DateTime, Utc};
use colored::Colorize;
use quire::commands::notebooks::NotebookSummary;
use quire::commands::pages::DestructivePreview;
use quire::commands::{CmdMessage, MessageLevel};
use quire::index::PageIndex;
use quire::model::PageBuffer;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 14;
const PAGES_WIDTH: usize = 10;
const CURRENT_MARKER: &str = "▸";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Like [`print_messages`] but on stderr, for output that must not mix with
/// command output.
pub(super) fn print_notice(message: &CmdMessage) {
    match message.level {
        MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
        MessageLevel::Success => eprintln!("{}", message.content.green()),
        MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        MessageLevel::Error => eprintln!("{}", message.content.red()),
    }
}

pub(super) fn print_notebooks(notebooks: &[NotebookSummary]) {
    if notebooks.is_empty() {
        println!("No notebooks. Create one with `quire new <name>`.");
        return;
    }

    for nb in notebooks {
        let marker = if nb.is_current {
            format!("{} ", CURRENT_MARKER)
        } else {
            "  ".to_string()
        };
        let idx_str = format!("{}. ", nb.position);

        let fixed_width = marker.width() + idx_str.width() + PAGES_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let name = truncate_to_width(&nb.name, available);
        let padding = available.saturating_sub(name.width());

        let pages = format!("{:>width$}", format!("{} saved", nb.saved_pages), width = PAGES_WIDTH);
        let time = match nb.last_modified {
            Some(ts) => format_time_ago(ts),
            None => format!("{:>width$}", "never", width = TIME_WIDTH),
        };

        let (marker, name) = if nb.is_current {
            (marker.yellow(), name.bold())
        } else {
            (marker.normal(), name.normal())
        };

        println!(
            "{}{}{}{}{}{}",
            marker,
            idx_str,
            name,
            " ".repeat(padding),
            pages.dimmed(),
            time.dimmed()
        );
    }
}

pub(super) fn print_page(status: &str, index: PageIndex, buffer: &PageBuffer) {
    println!("{}", status.dimmed());
    println!("--------------------------------");
    let title = if buffer.title.is_empty() {
        format!("Page {}", index).dimmed()
    } else {
        buffer.title.bold()
    };
    println!("{}", title);
    if !buffer.date.is_empty() || !buffer.time.is_empty() {
        println!("{}", format!("{} {}", buffer.date, buffer.time).trim().yellow());
    }
    if !buffer.content.is_empty() {
        println!();
        println!("{}", buffer.content);
    }
}

/// The question asked before a destructive command runs.
pub(super) fn preview_prompt(action: &str, preview: &DestructivePreview) -> String {
    let what = match preview.pages.as_slice() {
        [page] => format!("page {} of {}", page, preview.notebook_name),
        _ => format!("all {} pages of {}", preview.pages.len(), preview.notebook_name),
    };
    let loss = match preview.saved_pages {
        0 => "Nothing saved will be lost.".to_string(),
        1 => "1 saved page will be lost.".to_string(),
        n => format!("{} saved pages will be lost.", n),
    };
    format!("{} {}? {} [y/N] ", action, what, loss)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
