use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be read as a GitHub repository URL.
    #[error("Invalid GitHub URL: {0}")]
    ReferenceParse(String),

    /// Repository metadata lookup failed; carries the remote's own message when it sent one.
    #[error("{0}")]
    RemoteUnavailable(String),

    #[error("{0}")]
    TreeFetch(String),

    #[error("{0}")]
    BlobFetch(String),

    /// The batching control flow itself broke, not an individual fetch.
    #[error("Error during merging process: {0}")]
    Orchestration(String),

    #[error("Chat session not initialized")]
    ChatNotInitialized,

    #[error("Chat backend error: {0}")]
    Chat(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
