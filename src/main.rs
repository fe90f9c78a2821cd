mod cli;
mod progress;

use std::sync::Arc;

use anyhow::{bail, Context};
use console::style;
use num_format::{Locale, ToFormattedString};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gitmerge::output::{handle_output, output_file_name};
use gitmerge::{
    generate_ascii_tree, get_config_path, load_config, load_repository, parse_repo_url,
    render_merged, strip_comments, Aggregator, FetchedFile, GitHubClient, LoadedRepo, Selection,
    TokenCounter,
};

use crate::cli::{Cli, CliTokenizerType};
use crate::progress::ProgressContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let args = Cli::parse_with_config(&config);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if args.config_path {
        let path = get_config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    let Some(url) = args.url.as_deref() else {
        bail!("No repository URL provided");
    };
    let repo_ref = parse_repo_url(url)
        .context("Format: https://github.com/owner/repo")?
        .with_branch(args.branch.as_deref());

    let settings = config.settings(args.token.clone(), &args.ignore_ext);
    let client = Arc::new(GitHubClient::with_api_base(
        &config.api_base_url,
        settings.credential,
    )?);

    let pb = ProgressContext::spinner(&format!("Loading {}...", repo_ref));
    let loaded = match load_repository(&client, &repo_ref, &settings.ignore_rules).await {
        Ok(loaded) => loaded,
        Err(e) => {
            pb.finish_clear();
            return Err(e.into());
        }
    };
    pb.finish_clear();

    let LoadedRepo {
        repo,
        mut selection,
        truncated,
    } = loaded;
    if truncated {
        eprintln!(
            "{} the repository tree was truncated by GitHub; some files are missing",
            style("Warning:").yellow()
        );
    }

    apply_selection(&mut selection, &args);

    if args.list {
        let paths: Vec<&str> = selection.selected().map(|e| e.path.as_str()).collect();
        print!("{}", generate_ascii_tree(&paths));
        println!(
            "{} of {} eligible files selected from {}",
            selection.selected_count(),
            selection.len(),
            repo
        );
        return Ok(());
    }

    let entries = selection.selected_entries();
    if entries.is_empty() {
        bail!("No files selected");
    }

    let aggregator = Aggregator::new(Arc::clone(&client))
        .with_batch_size(args.batch_size.unwrap_or(config.batch_size));
    let pb = ProgressContext::fetching(entries.len());
    let mut files = match aggregator.fetch_all(&entries, |p| pb.update(p)).await {
        Ok(files) => files,
        Err(e) => {
            pb.finish_clear();
            return Err(e.into());
        }
    };
    pb.finish(&format!("fetched {} files", files.len()));

    if args.strip_comments {
        for file in &mut files {
            file.content = strip_comments(&file.content, &file.path);
        }
    }

    let mut content = String::new();
    if args.tree {
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        content.push_str(&generate_ascii_tree(&paths));
    }
    content.push_str(&render_merged(&files));

    handle_output(&content, &args.output_targets(&output_file_name(&repo)))?;

    if !args.no_tokens {
        let counter = create_token_counter(&args)?;
        display_summary(&counter, &files, &content);
    }

    Ok(())
}

fn apply_selection(selection: &mut Selection, args: &Cli) {
    if !args.only.is_empty() {
        selection.toggle_all(false);
        for path in &args.only {
            if !selection.toggle_one(path) {
                eprintln!("Warning: '{}' is not an eligible file", path);
            }
        }
    }

    for path in &args.skip {
        let currently_selected = selection
            .entries()
            .iter()
            .any(|e| &e.path == path && e.selected);
        if currently_selected {
            selection.toggle_one(path);
        } else {
            eprintln!("Warning: '{}' is not a selected file", path);
        }
    }
}

fn create_token_counter(args: &Cli) -> anyhow::Result<TokenCounter> {
    match args.tokenizer {
        Some(CliTokenizerType::Tiktoken) => {
            TokenCounter::tiktoken(args.model.as_deref().unwrap_or("gpt-4o"))
        }
        _ => Ok(TokenCounter::estimate()),
    }
}

fn display_summary(counter: &TokenCounter, files: &[FetchedFile], content: &str) {
    let count = counter.count_files(files);
    let label = if counter.is_estimate() {
        "Estimated tokens"
    } else {
        "Tokens"
    };

    eprintln!("\n{}", style("Summary:").green().bold());
    eprintln!("Total files: {}", files.len());
    eprintln!("Total size: {:.2} KB", content.len() as f64 / 1024.0);
    eprintln!(
        "{}: {}",
        label,
        counter
            .count_tokens(content)
            .to_formatted_string(&Locale::en)
    );

    let mut breakdown = count.breakdown;
    breakdown.sort_by(|a, b| b.1.cmp(&a.1));
    if !breakdown.is_empty() {
        eprintln!("\nLargest files:");
        for (path, tokens) in breakdown.iter().take(5) {
            eprintln!("  {}: {}", path, tokens.to_formatted_string(&Locale::en));
        }
    }
}
