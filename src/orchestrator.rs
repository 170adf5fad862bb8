use crate::api::OpenGptsClient;
use crate::error::{OpenGptsError, Result};
use crate::models::{Assistant, Message};
use crate::ui::StreamRenderer;
use futures::StreamExt;
use std::io::Write;

/// Assistants offered for chat: the configured targets fetched by id, or
/// every assistant of the current user.
pub async fn available_assistants(
    client: &OpenGptsClient,
    target_assistant_ids: Option<&[String]>,
) -> Result<Vec<Assistant>> {
    let assistants = match target_assistant_ids {
        Some(ids) => {
            let mut assistants = Vec::with_capacity(ids.len());
            for id in ids {
                assistants.push(client.get_assistant(id).await?);
            }
            assistants
        }
        None => client.list_assistants().await?,
    };

    if assistants.is_empty() {
        return Err(OpenGptsError::Validation(
            "target assistant does not exist".to_string(),
        ));
    }
    Ok(assistants)
}

pub struct ChatRequest<'a> {
    pub assistant_id: Option<&'a str>,
    pub thread_id: Option<&'a str>,
    pub target_assistant_ids: Option<&'a [String]>,
    pub prompt: &'a str,
}

#[derive(Debug)]
pub struct ChatOutcome {
    pub assistant_id: String,
    pub thread_id: String,
    /// Messages the run appended to the thread.
    pub reply: Vec<Message>,
}

/// Sends one human message and renders the streamed reply to `out`.
///
/// Without a thread id a new thread named after the prompt is created.
pub async fn chat<W: Write>(
    client: &OpenGptsClient,
    request: ChatRequest<'_>,
    out: W,
) -> Result<ChatOutcome> {
    if request.prompt.trim().is_empty() {
        return Err(OpenGptsError::Validation("prompt must not be empty".to_string()));
    }

    let assistant_id = match request.assistant_id {
        Some(id) => id.to_string(),
        None => available_assistants(client, request.target_assistant_ids)
            .await?
            .remove(0)
            .assistant_id,
    };

    let (thread_id, history_len) = match request.thread_id {
        Some(id) => {
            let history = client.get_messages(id).await?;
            (id.to_string(), history.messages.len())
        }
        None => {
            let thread = client.create_thread(request.prompt, &assistant_id).await?;
            tracing::debug!(thread_id = %thread.thread_id, "created thread");
            (thread.thread_id, 0)
        }
    };

    let mut stream = client
        .run_stream(&assistant_id, &thread_id, &[Message::human(request.prompt)])
        .await?;

    let mut renderer = StreamRenderer::new(out, history_len);
    while let Some(batch) = stream.next().await {
        match batch {
            Ok(batch) => {
                renderer.update(&batch)?;
            }
            Err(e) => {
                // Keep whatever was already shown, then report the failure.
                renderer.finish()?;
                return Err(e);
            }
        }
    }
    let reply = renderer.finish()?;

    Ok(ChatOutcome {
        assistant_id,
        thread_id,
        reply,
    })
}
