use crate::models::{Assistant, Message, MessageContent, Thread};
use colored::*;
use std::io::{self, Write};

const TEXT_SOURCE_CHARS: usize = 25;

/// Write a tool or function result with its sources
pub fn write_tool_result<W: Write>(out: &mut W, message: &Message) -> io::Result<()> {
    let label = message.display_name().unwrap_or(message.message_type.as_str());
    writeln!(out, "{} {}", "▸".dimmed(), label.yellow().bold())?;

    match &message.content {
        MessageContent::Documents(documents) => {
            for document in documents {
                writeln!(out, "    📑 source: {}", document.source_label())?;
                for line in document.page_content.lines().filter(|l| !l.trim().is_empty()) {
                    writeln!(out, "      {}", line.dimmed())?;
                }
            }
        }
        MessageContent::Text(text) => {
            let source: String = text
                .chars()
                .take(TEXT_SOURCE_CHARS)
                .collect::<String>()
                .replace('\n', " ");
            writeln!(out, "    📑 source: {}", source)?;
            for line in text.lines() {
                writeln!(out, "      {}", line.dimmed())?;
            }
        }
        MessageContent::Mapping(map) => {
            let pretty = serde_json::to_string_pretty(map).unwrap_or_default();
            for line in pretty.lines() {
                writeln!(out, "      {}", line.dimmed())?;
            }
        }
    }

    Ok(())
}

pub fn write_assistants<W: Write>(out: &mut W, assistants: &[Assistant]) -> io::Result<()> {
    for assistant in assistants {
        let visibility = if assistant.public { " (public)" } else { "" };
        writeln!(
            out,
            "{}  {}{}",
            assistant.assistant_id.cyan(),
            assistant.name.bold(),
            visibility.dimmed()
        )?;
    }
    Ok(())
}

pub fn write_threads<W: Write>(out: &mut W, threads: &[Thread]) -> io::Result<()> {
    for thread in threads {
        let name: String = thread.name.chars().take(40).collect();
        writeln!(
            out,
            "{}  {}  {}",
            thread.thread_id.cyan(),
            thread.updated_at.format("%Y/%m/%d %H:%M").to_string().dimmed(),
            name
        )?;
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    let pretty = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", pretty)
}
