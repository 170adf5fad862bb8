use crate::models::{Message, MessageType};
use crate::ui::output::write_tool_result;
use colored::*;
use std::io::{self, Write};

/// Tracks how much of a growing message list has already been shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptCursor {
    rendered: usize,
}

impl TranscriptCursor {
    pub fn new(rendered: usize) -> Self {
        Self { rendered }
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Messages of `batch` beyond what was rendered. Empty means no update.
    pub fn pending<'a>(&self, batch: &'a [Message]) -> &'a [Message] {
        &batch[self.rendered.min(batch.len())..]
    }

    pub fn advance<'a>(&mut self, batch: &'a [Message]) -> &'a [Message] {
        let pending = self.pending(batch);
        self.rendered = batch.len();
        pending
    }
}

/// Prints a streamed reply as it grows.
///
/// Every snapshot repeats the whole thread, so only the part past the thread
/// history is considered, and of the trailing `ai` message only the text not
/// printed yet is written.
pub struct StreamRenderer<W: Write> {
    out: W,
    history: TranscriptCursor,
    // (index within the reply, chars already printed)
    current: Option<(usize, usize)>,
    wrote_any: bool,
    reply: Vec<Message>,
}

impl<W: Write> StreamRenderer<W> {
    pub fn new(out: W, history_len: usize) -> Self {
        Self {
            out,
            history: TranscriptCursor::new(history_len),
            current: None,
            wrote_any: false,
            reply: Vec::new(),
        }
    }

    /// Returns whether anything was written.
    pub fn update(&mut self, batch: &[Message]) -> io::Result<bool> {
        let reply = self.history.pending(batch);
        if reply.is_empty() {
            return Ok(false);
        }
        self.reply = reply.to_vec();

        let index = reply.len() - 1;
        let last = &reply[index];
        if last.message_type != MessageType::Ai {
            return Ok(false);
        }
        let Some(text) = last.content.as_text() else {
            return Ok(false);
        };

        let printed = match self.current {
            Some((current, printed)) if current == index => printed,
            Some(_) if self.wrote_any && !text.is_empty() => {
                writeln!(self.out)?;
                0
            }
            _ => 0,
        };

        let total = text.chars().count();
        self.current = Some((index, total.max(printed)));
        if total <= printed {
            return Ok(false);
        }

        let delta: String = text.chars().skip(printed).collect();
        write!(self.out, "{}", delta)?;
        self.out.flush()?;
        self.wrote_any = true;
        Ok(true)
    }

    /// Ends the reply, listing tool and function results, and returns the
    /// messages the run added.
    pub fn finish(mut self) -> io::Result<Vec<Message>> {
        if self.wrote_any {
            writeln!(self.out)?;
        }
        for message in &self.reply {
            if message.message_type.is_tool_result() && message.has_displayable_content() {
                write_tool_result(&mut self.out, message)?;
            }
        }
        self.out.flush()?;
        Ok(self.reply)
    }
}

/// Prints a thread the way the chat page showed it: empty messages are
/// skipped and tool results appear under the `ai` message that follows them.
pub fn write_history<W: Write>(out: &mut W, messages: &[Message]) -> io::Result<()> {
    let mut tool_results: Vec<&Message> = Vec::new();

    for message in messages {
        if !message.has_displayable_content() {
            continue;
        }
        match &message.message_type {
            t if t.is_tool_result() => tool_results.push(message),
            MessageType::Human => {
                writeln!(out, "{} {}", "You:".green().bold(), content_text(message))?;
            }
            MessageType::Ai => {
                writeln!(out, "{} {}", "AI:".cyan().bold(), content_text(message))?;
                for result in tool_results.drain(..) {
                    write_tool_result(out, result)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn content_text(message: &Message) -> String {
    match message.content.as_text() {
        Some(text) => text.to_string(),
        None => serde_json::to_string(&message.content).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    fn render(history_len: usize, batches: &[Vec<Message>]) -> (String, Vec<Message>) {
        plain();
        let mut buffer = Vec::new();
        let reply = {
            let mut renderer = StreamRenderer::new(&mut buffer, history_len);
            for batch in batches {
                renderer.update(batch).unwrap();
            }
            renderer.finish().unwrap()
        };
        (String::from_utf8(buffer).unwrap(), reply)
    }

    #[test]
    fn test_cursor_returns_new_suffix() {
        let batch = vec![Message::human("a"), Message::ai("b"), Message::ai("c")];
        let mut cursor = TranscriptCursor::new(1);
        assert_eq!(cursor.advance(&batch).len(), 2);
        assert!(cursor.advance(&batch).is_empty());
        assert_eq!(cursor.rendered(), 3);
    }

    #[test]
    fn test_cursor_handles_shorter_batch() {
        let cursor = TranscriptCursor::new(5);
        assert!(cursor.pending(&[Message::ai("x")]).is_empty());
    }

    #[test]
    fn test_renderer_prints_only_new_text() {
        let history = vec![Message::human("earlier"), Message::ai("answer")];
        let mut batches = Vec::new();
        for text in ["He", "Hello", "Hello, world"] {
            let mut batch = history.clone();
            batch.push(Message::human("hi"));
            batch.push(Message::ai(text));
            batches.push(batch);
        }

        let (output, reply) = render(history.len(), &batches);
        assert_eq!(output, "Hello, world\n");
        assert_eq!(reply.len(), 2);
    }

    #[test]
    fn test_renderer_lists_tool_results_after_reply() {
        let tool: Message = serde_json::from_value(json!({
            "type": "function",
            "name": "retrieval",
            "content": [{"page_content": "Rust book", "metadata": {"source": "book.md"}}]
        }))
        .unwrap();
        let batches = vec![
            vec![Message::human("q"), Message::ai("")],
            vec![Message::human("q"), Message::ai(""), tool.clone()],
            vec![Message::human("q"), Message::ai(""), tool, Message::ai("Found it")],
        ];

        let (output, _) = render(0, &batches);
        assert!(output.starts_with("Found it\n"));
        assert!(output.contains("retrieval"));
        assert!(output.contains("source: book.md"));
    }

    #[test]
    fn test_renderer_without_ai_text_prints_nothing() {
        let (output, reply) = render(1, &[vec![Message::human("q")]]);
        assert!(output.is_empty());
        assert!(reply.is_empty());
    }

    #[test]
    fn test_history_groups_tool_results_under_ai() {
        plain();
        let tool: Message = serde_json::from_value(json!({
            "type": "tool",
            "content": "sunny",
            "additional_kwargs": {"name": "weather"}
        }))
        .unwrap();
        let messages = vec![
            Message::human("weather?"),
            Message::ai(""),
            tool,
            Message::ai("It is sunny."),
        ];

        let mut buffer = Vec::new();
        write_history(&mut buffer, &messages).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "You: weather?");
        assert_eq!(lines[1], "AI: It is sunny.");
        assert!(lines[2].contains("weather"));
        assert!(!output.contains("AI: \n"));
    }
}
