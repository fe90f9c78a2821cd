//! Session wrapper for asking questions about a merged document.
//!
//! No model vendor lives here. A [`ChatBackend`] opens conversations and
//! streams replies; [`ChatSession`] owns the one active conversation and
//! hands the merged document to the backend untouched.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::{Error, Result};

pub const INITIAL_SYSTEM_INSTRUCTION: &str = "You are an expert software engineer and code analysis assistant. \n\
The user has provided a concatenated text file containing the source code of a GitHub repository. \n\
Each file is clearly marked with its path.\n\
Your goal is to answer questions about the codebase, explain architecture, find bugs, or suggest improvements based strictly on the provided context.";

const CONTEXT_BEGIN: &str = "=== REPOSITORY CONTEXT BEGIN ===";
const CONTEXT_END: &str = "=== REPOSITORY CONTEXT END ===";

pub type TextStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait Conversation: Send {
    /// Sends one user turn and streams the reply as text chunks.
    async fn send_stream(&mut self, message: &str) -> Result<TextStream>;
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn open(&self, system_instruction: String) -> Result<Box<dyn Conversation>>;
}

pub fn system_instruction(context: &str) -> String {
    format!("{INITIAL_SYSTEM_INSTRUCTION}\n\n{CONTEXT_BEGIN}\n{context}\n{CONTEXT_END}")
}

pub struct ChatSession<B> {
    backend: B,
    conversation: Option<Box<dyn Conversation>>,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            conversation: None,
        }
    }

    /// Starts a fresh conversation over `context`, replacing any earlier one.
    pub async fn initialize(&mut self, context: &str) -> Result<()> {
        let conversation = self.backend.open(system_instruction(context)).await?;
        self.conversation = Some(conversation);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.conversation.is_some()
    }

    pub async fn send(&mut self, message: &str) -> Result<TextStream> {
        let conversation = self
            .conversation
            .as_mut()
            .ok_or(Error::ChatNotInitialized)?;
        conversation.send_stream(message).await
    }

    pub fn reset(&mut self) {
        self.conversation = None;
    }
}
