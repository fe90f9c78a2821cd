use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use arboard::Clipboard;
use serde::{Deserialize, Serialize};

use crate::locator::RepositoryRef;

pub const SEPARATOR_WIDTH: usize = 50;

/// Content of one selected file, or the in-band error that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFile {
    pub path: String,
    pub content: String,
}

impl FetchedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Renders one file block:
///
/// ```text
/// File: <path>
/// --------------------------------------------------
/// <content>
/// --------------------------------------------------
/// ```
pub fn render_block(file: &FetchedFile) -> String {
    let rule = separator();
    format!("File: {}\n{}\n{}\n{}\n", file.path, rule, file.content, rule)
}

/// Concatenates blocks in the given order, separated by a blank line.
pub fn render_merged(files: &[FetchedFile]) -> String {
    files
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `{repo}-{branch}-merged.txt`; slashes in branch names become dashes.
pub fn output_file_name(repo: &RepositoryRef) -> String {
    format!("{}-{}-merged.txt", repo.name, repo.branch.replace('/', "-"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
    Clipboard,
}

pub fn write_output(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn handle_output(content: &str, targets: &[OutputTarget]) -> Result<()> {
    for target in targets {
        match target {
            OutputTarget::File(path) => {
                write_output(content, path)?;
                eprintln!("Output written to: {}", path.display());
            }
            OutputTarget::Stdout => println!("{content}"),
            OutputTarget::Clipboard => {
                match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(content)) {
                    Ok(_) => eprintln!("Merged content copied to clipboard"),
                    Err(_) => {
                        eprintln!("Failed to copy to clipboard, use -f to save to a file instead")
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_block_format() {
        let block = render_block(&FetchedFile::new("src/main.rs", "fn main() {}"));
        let dashes = "-".repeat(50);
        assert_eq!(
            block,
            format!("File: src/main.rs\n{dashes}\nfn main() {{}}\n{dashes}\n")
        );
    }

    #[test]
    fn test_render_merged_keeps_order_and_blank_line() {
        let files = vec![
            FetchedFile::new("b.txt", "B"),
            FetchedFile::new("a.txt", "A"),
        ];
        let merged = render_merged(&files);
        let dashes = "-".repeat(50);
        assert_eq!(
            merged,
            format!("File: b.txt\n{dashes}\nB\n{dashes}\n\nFile: a.txt\n{dashes}\nA\n{dashes}\n")
        );
    }

    #[test]
    fn test_render_merged_empty() {
        assert_eq!(render_merged(&[]), "");
    }

    #[test]
    fn test_output_file_name() {
        let repo = RepositoryRef {
            owner: "facebook".to_string(),
            name: "react".to_string(),
            branch: "main".to_string(),
        };
        assert_eq!(output_file_name(&repo), "react-main-merged.txt");

        let repo = RepositoryRef {
            branch: "feature/x".to_string(),
            ..repo
        };
        assert_eq!(output_file_name(&repo), "react-feature-x-merged.txt");
    }

    #[test]
    fn test_write_output_creates_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out/nested/merged.txt");
        write_output("content", &path)?;
        assert_eq!(fs::read_to_string(&path)?, "content");
        Ok(())
    }
}
