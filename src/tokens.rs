use anyhow::{anyhow, Result};
use tiktoken_rs::get_bpe_from_model;

use crate::output::FetchedFile;

/// Roughly four characters per token for English text and code.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

pub enum TokenizerBackend {
    Estimate,
    Tiktoken(Box<tiktoken_rs::CoreBPE>),
}

pub struct TokenCount {
    pub total_tokens: usize,
    pub breakdown: Vec<(String, usize)>, // (file_path, token_count)
}

pub struct TokenCounter {
    backend: TokenizerBackend,
}

impl TokenCounter {
    pub fn estimate() -> Self {
        Self {
            backend: TokenizerBackend::Estimate,
        }
    }

    pub fn tiktoken(model_name: &str) -> Result<Self> {
        let bpe = get_bpe_from_model(model_name)
            .map_err(|e| anyhow!("Failed to initialize tiktoken tokenizer: {}", e))?;

        Ok(Self {
            backend: TokenizerBackend::Tiktoken(Box::new(bpe)),
        })
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self.backend, TokenizerBackend::Estimate)
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        match &self.backend {
            TokenizerBackend::Estimate => estimate_tokens(text),
            TokenizerBackend::Tiktoken(bpe) => bpe.encode_with_special_tokens(text).len(),
        }
    }

    pub fn count_files(&self, files: &[FetchedFile]) -> TokenCount {
        let breakdown: Vec<(String, usize)> = files
            .iter()
            .map(|file| (file.path.clone(), self.count_tokens(&file.content)))
            .collect();

        TokenCount {
            total_tokens: breakdown.iter().map(|(_, count)| count).sum(),
            breakdown,
        }
    }
}
