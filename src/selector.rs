use std::collections::HashSet;

use crate::github::TreeEntry;

/// Path fragments that are never worth merging, whatever their extension.
const DENYLISTED_FRAGMENTS: &[&str] = &[
    ".git/",
    "node_modules/",
    "package-lock.json",
    "yarn.lock",
];

pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp", ".mp4", ".mov", ".mp3", ".wav",
    ".pdf", ".zip", ".tar", ".gz", ".7z", ".rar", ".exe", ".dll", ".so", ".dylib", ".bin",
    ".lock", "-lock.json", ".pyc", ".class",
];

/// Case-insensitive set of extensions excluded from aggregation.
///
/// Entries keep their insertion order for display; lookups go through a
/// lowercased set.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    extensions: Vec<String>,
    lookup: HashSet<String>,
}

impl IgnoreRules {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self {
            extensions: Vec::new(),
            lookup: HashSet::new(),
        };
        rules.extend(extensions);
        rules
    }

    pub fn extend<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().trim();
            if ext.is_empty() {
                continue;
            }
            if self.lookup.insert(ext.to_lowercase()) {
                self.extensions.push(ext.to_string());
            }
        }
    }

    pub fn is_ignored_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.lookup.contains(&ext.to_lowercase())
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_EXTENSIONS)
    }
}

/// Substring from the last `.` to the end, lowercased; empty without a `.`.
///
/// Dotfiles report their whole name (`.gitignore`), and compound entries
/// such as `-lock.json` can never equal an extension.
pub fn file_extension(path: &str) -> String {
    path.rfind('.')
        .map(|idx| path[idx..].to_lowercase())
        .unwrap_or_default()
}

pub fn classify(entry: &TreeEntry, rules: &IgnoreRules) -> bool {
    if !entry.is_blob() {
        return false;
    }

    if rules.is_ignored_extension(&file_extension(&entry.path)) {
        return false;
    }

    if DENYLISTED_FRAGMENTS
        .iter()
        .any(|fragment| entry.path.contains(fragment))
    {
        return false;
    }

    true
}

/// The eligible entries of one listing together with their selection flags.
///
/// Entries keep the listing order for their whole lifetime; only `selected`
/// ever changes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: Vec<TreeEntry>,
}

impl Selection {
    pub fn from_listing(entries: Vec<TreeEntry>, rules: &IgnoreRules) -> Self {
        let entries = entries
            .into_iter()
            .filter(|entry| classify(entry, rules))
            .map(|entry| TreeEntry {
                selected: true,
                ..entry
            })
            .collect();
        Self { entries }
    }

    /// Flips one entry. Returns false when no entry has that path.
    pub fn toggle_one(&mut self, path: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => {
                entry.selected = !entry.selected;
                true
            }
            None => false,
        }
    }

    pub fn toggle_all(&mut self, value: bool) {
        for entry in &mut self.entries {
            entry.selected = value;
        }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn selected(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter().filter(|entry| entry.selected)
    }

    pub fn selected_entries(&self) -> Vec<TreeEntry> {
        self.selected().cloned().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::EntryKind;

    fn blob(path: &str) -> TreeEntry {
        TreeEntry::blob(path, format!("https://api/blobs/{path}"))
    }

    fn dir(path: &str) -> TreeEntry {
        TreeEntry {
            kind: EntryKind::Tree,
            content_ref: None,
            ..blob(path)
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("src/main.rs"), ".rs");
        assert_eq!(file_extension("assets/LOGO.PNG"), ".png");
        assert_eq!(file_extension("Makefile"), "");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension(".gitignore"), ".gitignore");
    }

    #[test]
    fn test_classify_ignores_extensions_case_insensitively() {
        let rules = IgnoreRules::default();
        assert!(!classify(&blob("img/logo.png"), &rules));
        assert!(!classify(&blob("img/logo.PNG"), &rules));
        assert!(!classify(&blob("Cargo.lock"), &rules));
        assert!(classify(&blob("src/lib.rs"), &rules));
        assert!(classify(&blob("Makefile"), &rules));
    }

    #[test]
    fn test_classify_custom_rules_match_mixed_case() {
        let rules = IgnoreRules::new([".MD"]);
        assert!(!classify(&blob("README.md"), &rules));
        assert!(classify(&blob("logo.png"), &rules));
    }

    #[test]
    fn test_classify_denylisted_paths() {
        let rules = IgnoreRules::new(Vec::<String>::new());
        assert!(!classify(&blob("web/node_modules/react/index.js"), &rules));
        assert!(!classify(&blob("sub/.git/config"), &rules));
        assert!(!classify(&blob("package-lock.json"), &rules));
        assert!(!classify(&blob("app/yarn.lock"), &rules));
        assert!(classify(&blob("package.json"), &rules));
    }

    #[test]
    fn test_classify_non_blobs() {
        let rules = IgnoreRules::default();
        assert!(!classify(&dir("src"), &rules));
        let submodule = TreeEntry {
            kind: EntryKind::Other,
            ..blob("vendor/lib")
        };
        assert!(!classify(&submodule, &rules));
    }

    #[test]
    fn test_ignore_rules_dedupe_preserves_order() {
        let rules = IgnoreRules::new([".png", ".PNG", " ", ".rs"]);
        assert_eq!(rules.extensions(), &[".png".to_string(), ".rs".to_string()]);
    }

    #[test]
    fn test_selection_filters_and_selects_everything() {
        let selection = Selection::from_listing(
            vec![dir("src"), blob("src/main.rs"), blob("logo.png"), blob("README.md")],
            &IgnoreRules::default(),
        );
        let paths: Vec<_> = selection.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["src/main.rs", "README.md"]);
        assert_eq!(selection.selected_count(), 2);
    }

    #[test]
    fn test_toggle_one() {
        let mut selection =
            Selection::from_listing(vec![blob("a.rs"), blob("b.rs")], &IgnoreRules::default());

        assert!(selection.toggle_one("a.rs"));
        assert!(!selection.entries()[0].selected);
        assert!(selection.entries()[1].selected);

        assert!(selection.toggle_one("a.rs"));
        assert!(selection.entries()[0].selected);

        assert!(!selection.toggle_one("missing.rs"));
    }

    #[test]
    fn test_toggle_all_never_reorders() {
        let listing = vec![blob("z.rs"), blob("a.rs"), blob("m/n.rs")];
        let mut selection = Selection::from_listing(listing.clone(), &IgnoreRules::default());

        selection.toggle_all(true);
        selection.toggle_all(false);

        assert_eq!(selection.len(), 3);
        assert!(selection.entries().iter().all(|e| !e.selected));
        assert_eq!(selection.selected_count(), 0);
        for (entry, original) in selection.entries().iter().zip(&listing) {
            assert_eq!(entry.path, original.path);
            assert_eq!(entry.content_ref, original.content_ref);
            assert_eq!(entry.kind, original.kind);
        }
    }
}
