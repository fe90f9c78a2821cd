use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use gitmerge::output::OutputTarget;
use gitmerge::Config;

#[derive(Debug, Clone, ValueEnum)]
pub enum CliTokenizerType {
    Estimate,
    Tiktoken,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gitmerge",
    about = "Merge the text files of a GitHub repository into one LLM-ready document",
    version
)]
pub struct Cli {
    /// Repository URL, e.g. https://github.com/owner/repo or .../tree/<branch>
    #[arg(required_unless_present = "config_path")]
    pub url: Option<String>,

    /// Branch to read, overriding any branch in the URL
    #[arg(short, long)]
    pub branch: Option<String>,

    /// GitHub token (falls back to $GITHUB_TOKEN, then the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Extra extensions to ignore (e.g. ".md,.json")
    #[arg(long, value_delimiter = ',')]
    pub ignore_ext: Vec<String>,

    /// Deselect a file by path (repeatable)
    #[arg(long)]
    pub skip: Vec<String>,

    /// Merge only these paths (repeatable)
    #[arg(long)]
    pub only: Vec<String>,

    /// List eligible files as a tree without fetching contents
    #[arg(short, long)]
    pub list: bool,

    /// Prefix the output with a tree of the merged files
    #[arg(long)]
    pub tree: bool,

    /// Strip comments from recognized source files
    #[arg(long)]
    pub strip_comments: bool,

    /// Number of files fetched concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Write output to a file (defaults to <repo>-<branch>-merged.txt)
    #[arg(short = 'f', long, num_args = 0..=1)]
    pub file: Option<Option<PathBuf>>,

    /// Print output to stdout
    #[arg(short, long)]
    pub print: bool,

    /// Copy output to the clipboard
    #[arg(short, long)]
    pub copy: bool,

    #[arg(long)]
    pub no_tokens: bool,

    #[arg(long, value_enum)]
    pub tokenizer: Option<CliTokenizerType>,

    /// Model name for the tiktoken tokenizer
    #[arg(long)]
    pub model: Option<String>,

    /// Print the config file location and exit
    #[arg(long)]
    pub config_path: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_with_config(config: &Config) -> Self {
        let mut cli = Self::parse();

        cli.batch_size = cli.batch_size.or(Some(config.batch_size));
        if !cli.no_tokens && cli.tokenizer.is_none() {
            cli.tokenizer = Some(match config.default_tokenizer.as_str() {
                "tiktoken" => CliTokenizerType::Tiktoken,
                _ => CliTokenizerType::Estimate,
            });
        }
        if cli.model.is_none() {
            cli.model = Some(config.default_tokenizer_model.clone());
        }

        cli
    }

    /// Output destinations; a bare `-f` resolves to `default_file`.
    pub fn output_targets(&self, default_file: &str) -> Vec<OutputTarget> {
        let mut targets = Vec::new();

        if let Some(file) = &self.file {
            let path = file.clone().unwrap_or_else(|| PathBuf::from(default_file));
            targets.push(OutputTarget::File(path));
        }
        if self.print {
            targets.push(OutputTarget::Stdout);
        }
        if self.copy {
            targets.push(OutputTarget::Clipboard);
        }
        if targets.is_empty() {
            targets.push(OutputTarget::File(PathBuf::from(default_file)));
        }

        targets
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
