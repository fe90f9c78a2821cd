pub mod aggregator;
pub mod chat;
pub mod comments;
pub mod config;
pub mod error;
pub mod github;
pub mod loader;
pub mod locator;
pub mod output;
pub mod selector;
pub mod tokens;
pub mod tree;

pub use aggregator::{Aggregator, Progress, DEFAULT_BATCH_SIZE};
pub use chat::{ChatBackend, ChatSession, Conversation};
pub use comments::strip_comments;
pub use config::{get_config_path, load_config, Config, Settings};
pub use error::{Error, Result};
pub use github::{BlobSource, EntryKind, GitHubClient, TreeEntry, TreeListing};
pub use loader::{load_repository, LoadedRepo};
pub use locator::{parse_repo_url, RepositoryRef};
pub use output::{output_file_name, render_merged, FetchedFile, OutputTarget};
pub use selector::{classify, IgnoreRules, Selection};
pub use tokens::{estimate_tokens, TokenCount, TokenCounter};
pub use tree::generate_ascii_tree;
