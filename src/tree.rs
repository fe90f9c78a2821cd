use std::collections::BTreeMap;

const TREE_TITLE: &str = "Project Structure:";
const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir(BTreeMap<String, Node>),
    File,
}

impl Node {
    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    /// Children of this node, turning a file into a directory first.
    /// Directory status wins when a name is seen both ways.
    fn children_mut(&mut self) -> &mut BTreeMap<String, Node> {
        if !self.is_dir() {
            *self = Node::Dir(BTreeMap::new());
        }
        match self {
            Node::Dir(children) => children,
            Node::File => unreachable!("node was promoted to a directory"),
        }
    }
}

fn build(paths: &[impl AsRef<str>]) -> BTreeMap<String, Node> {
    let mut root = BTreeMap::new();

    for path in paths {
        let parts: Vec<&str> = path.as_ref().split('/').collect();
        let Some((leaf, dirs)) = parts.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for dir in dirs {
            current = current
                .entry(dir.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()))
                .children_mut();
        }
        current.entry(leaf.to_string()).or_insert(Node::File);
    }

    root
}

fn render(children: &BTreeMap<String, Node>, prefix: &str, output: &mut String) {
    // BTreeMap already yields names in byte order; a stable partition keeps it per group.
    let mut entries: Vec<(&String, &Node)> = children.iter().collect();
    entries.sort_by_key(|(_, node)| !node.is_dir());

    let count = entries.len();
    for (index, (name, node)) in entries.into_iter().enumerate() {
        let is_last = index == count - 1;
        let marker = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(marker);
        output.push_str(name);
        output.push('\n');

        if let Node::Dir(grandchildren) = node {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render(grandchildren, &child_prefix, output);
        }
    }
}

/// Renders slash-separated paths as a box-drawing directory tree.
///
/// Directories come before files at every level; each group is sorted
/// case-sensitively. The tree is framed by a title line and a rule of `=`.
pub fn generate_ascii_tree(paths: &[impl AsRef<str>]) -> String {
    let root = build(paths);
    let mut output = format!("{TREE_TITLE}\n");
    render(&root, "", &mut output);
    output.push('\n');
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push_str("\n\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> String {
        "=".repeat(50)
    }

    #[test]
    fn test_directories_before_files() {
        let tree = generate_ascii_tree(&["a/b.txt", "a/c/d.txt", "e.txt"]);
        let expected = format!(
            "Project Structure:\n\
             ├── a\n\
             │   ├── c\n\
             │   │   └── d.txt\n\
             │   └── b.txt\n\
             └── e.txt\n\
             \n{}\n\n",
            rule()
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_case_sensitive_ordering() {
        let tree = generate_ascii_tree(&["b.txt", "B.txt", "a.txt"]);
        let lines: Vec<_> = tree.lines().collect();
        assert_eq!(lines[1], "├── B.txt");
        assert_eq!(lines[2], "├── a.txt");
        assert_eq!(lines[3], "└── b.txt");
    }

    #[test]
    fn test_directory_wins_over_file_with_same_name() {
        let tree = generate_ascii_tree(&["docs", "docs/guide.md", "z.txt"]);
        let lines: Vec<_> = tree.lines().collect();
        assert_eq!(lines[1], "├── docs");
        assert_eq!(lines[2], "│   └── guide.md");
        assert_eq!(lines[3], "└── z.txt");

        let reversed = generate_ascii_tree(&["docs/guide.md", "docs"]);
        assert!(reversed.contains("└── docs\n    └── guide.md\n"));
    }

    #[test]
    fn test_last_directory_uses_blank_continuation() {
        let tree = generate_ascii_tree(&["x.txt", "src/lib.rs", "src/bin/main.rs"]);
        assert!(tree.contains("├── src\n│   ├── bin\n│   │   └── main.rs\n│   └── lib.rs\n└── x.txt\n"));

        let tree = generate_ascii_tree(&["src/lib.rs", "src/bin/main.rs"]);
        assert!(tree.contains("└── src\n    ├── bin\n    │   └── main.rs\n    └── lib.rs\n"));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(
            generate_ascii_tree(&empty),
            format!("Project Structure:\n\n{}\n\n", rule())
        );
    }
}
