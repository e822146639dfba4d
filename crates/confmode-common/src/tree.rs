//! In-memory configuration tree.
//!
//! [`ConfigTree`] implements [`ConfigStore`] over a tree parsed from the
//! curly-brace configuration syntax:
//!
//! ```text
//! protocols {
//!     igmp-proxy {
//!         disable-quickleave
//!         interface eth0 {
//!             alt-subnet 10.0.0.0/8
//!             alt-subnet 192.168.0.0/16
//!             role upstream
//!         }
//!     }
//! }
//! ```
//!
//! `name {` opens a node, `name tag {` opens a tag node (`tag` becomes a child
//! of `name`), `name value` sets a leaf value and repeating it builds a
//! multi-value leaf, a bare `name` is a valueless flag. Values may be quoted.
//! `/* ... */` and `#` comments are ignored.

use async_trait::async_trait;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{CfgMgrError, CfgMgrResult};
use crate::store::{join_path, split_path, ConfigStore};

/// A node of the configuration tree. Children keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    children: Vec<(String, ConfigNode)>,
    values: Vec<String>,
}

impl ConfigNode {
    /// Returns the named child, if present.
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, child)| child)
    }

    /// Returns the child names in insertion order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the leaf values of this node.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn child_mut_or_insert(&mut self, name: &str) -> &mut ConfigNode {
        let idx = match self.children.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.children.push((name.to_string(), ConfigNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    fn descend(&self, path: &[&str]) -> Option<&ConfigNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    fn descend_mut_or_insert(&mut self, path: &[&str]) -> &mut ConfigNode {
        path.iter()
            .fold(self, |node, name| node.child_mut_or_insert(name))
    }
}

/// Hierarchical configuration held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    root: ConfigNode,
    level: String,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> CfgMgrResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CfgMgrError::io(path, e))?;
        let tree = Self::parse(&text)?;
        debug!(path = %path.display(), "Loaded configuration tree");
        Ok(tree)
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> CfgMgrResult<Self> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            tokens: tokens.into_iter(),
        };
        let mut root = ConfigNode::default();
        parser.parse_block(&mut root, 0, 0)?;
        Ok(Self {
            root,
            level: String::new(),
        })
    }

    /// Creates every node along an absolute path.
    pub fn set_node(&mut self, path: &str) -> &mut Self {
        self.root.descend_mut_or_insert(&split_path(path));
        self
    }

    /// Appends a value to the leaf at an absolute path, creating it if needed.
    pub fn set_value(&mut self, path: &str, value: impl Into<String>) -> &mut Self {
        self.root
            .descend_mut_or_insert(&split_path(path))
            .values
            .push(value.into());
        self
    }

    /// Returns the node at an absolute path.
    pub fn node(&self, path: &str) -> Option<&ConfigNode> {
        self.root.descend(&split_path(path))
    }

    fn resolve(&self, path: &str) -> Option<&ConfigNode> {
        self.node(&join_path(&self.level, path))
    }
}

#[async_trait]
impl ConfigStore for ConfigTree {
    fn level(&self) -> &str {
        &self.level
    }

    fn set_level(&mut self, path: &str) {
        self.level = join_path("", path);
    }

    async fn exists(&self, path: &str) -> CfgMgrResult<bool> {
        Ok(self.resolve(path).is_some())
    }

    async fn list_nodes(&self, path: &str) -> CfgMgrResult<Vec<String>> {
        Ok(self
            .resolve(path)
            .map(|node| node.child_names().map(str::to_string).collect())
            .unwrap_or_default())
    }

    async fn return_value(&self, path: &str) -> CfgMgrResult<Option<String>> {
        Ok(self.resolve(path).and_then(|node| node.values.first().cloned()))
    }

    async fn return_values(&self, path: &str) -> CfgMgrResult<Vec<String>> {
        Ok(self
            .resolve(path)
            .map(|node| node.values.clone())
            .unwrap_or_default())
    }
}

impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, child) in &self.root.children {
            write_node(f, name, child, 0)?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, name: &str, node: &ConfigNode, depth: usize) -> fmt::Result {
    let indent = "    ".repeat(depth);
    let name = quote(name);
    for value in &node.values {
        writeln!(f, "{}{} {}", indent, name, quote(value))?;
    }
    if !node.children.is_empty() {
        writeln!(f, "{}{} {{", indent, name)?;
        for (child_name, child) in &node.children {
            write_node(f, child_name, child, depth + 1)?;
        }
        writeln!(f, "{}}}", indent)?;
    } else if node.values.is_empty() {
        writeln!(f, "{}{}", indent, name)?;
    }
    Ok(())
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && !word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '"' | '#' | '\\'));
    if plain {
        word.to_string()
    } else {
        format!("\"{}\"", word.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Open,
    Close,
    Newline,
}

fn tokenize(text: &str) -> CfgMgrResult<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                tokens.push((line, Token::Newline));
                line += 1;
            }
            c if c.is_whitespace() => {}
            '{' => tokens.push((line, Token::Open)),
            '}' => tokens.push((line, Token::Close)),
            '#' => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut closed = false;
                while let Some(n) = chars.next() {
                    if n == '\n' {
                        line += 1;
                    } else if n == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(CfgMgrError::parse(start, "unterminated comment"));
                }
            }
            '"' => {
                let start = line;
                let mut word = String::new();
                let mut closed = false;
                while let Some(n) = chars.next() {
                    match n {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                if escaped == '\n' {
                                    line += 1;
                                }
                                word.push(escaped);
                            }
                        }
                        '\n' => {
                            line += 1;
                            word.push(n);
                        }
                        _ => word.push(n),
                    }
                }
                if !closed {
                    return Err(CfgMgrError::parse(start, "unterminated quoted value"));
                }
                tokens.push((start, Token::Word(word)));
            }
            _ => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || matches!(n, '{' | '}' | '"') {
                        break;
                    }
                    word.push(n);
                    chars.next();
                }
                tokens.push((line, Token::Word(word)));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: std::vec::IntoIter<(usize, Token)>,
}

impl Parser {
    fn parse_block(&mut self, node: &mut ConfigNode, depth: usize, open_line: usize) -> CfgMgrResult<()> {
        let mut words: Vec<String> = Vec::new();
        let mut stmt_line = 0;

        loop {
            let Some((line, token)) = self.tokens.next() else {
                if depth > 0 {
                    return Err(CfgMgrError::parse(open_line, "unclosed '{'"));
                }
                return finish_statement(node, &mut words, stmt_line);
            };

            match token {
                Token::Word(word) => {
                    if words.is_empty() {
                        stmt_line = line;
                    }
                    words.push(word);
                }
                Token::Newline => finish_statement(node, &mut words, stmt_line)?,
                Token::Open => {
                    for word in &words {
                        check_node_name(line, word)?;
                    }
                    let child = match words.as_slice() {
                        [name] => node.child_mut_or_insert(name),
                        [name, tag] => node.child_mut_or_insert(name).child_mut_or_insert(tag),
                        [] => return Err(CfgMgrError::parse(line, "'{' without a node name")),
                        _ => {
                            return Err(CfgMgrError::parse(
                                line,
                                format!("too many words before '{{': {}", words.join(" ")),
                            ))
                        }
                    };
                    self.parse_block(child, depth + 1, line)?;
                    words.clear();
                }
                Token::Close => {
                    finish_statement(node, &mut words, stmt_line)?;
                    if depth == 0 {
                        return Err(CfgMgrError::parse(line, "unbalanced '}'"));
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Node names are path segments, so they cannot contain whitespace.
fn check_node_name(line: usize, name: &str) -> CfgMgrResult<()> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CfgMgrError::parse(
            line,
            format!("invalid node name '{}'", name),
        ));
    }
    Ok(())
}

fn finish_statement(node: &mut ConfigNode, words: &mut Vec<String>, line: usize) -> CfgMgrResult<()> {
    if let Some(name) = words.first() {
        check_node_name(line, name)?;
    }
    match words.as_slice() {
        [] => {}
        [name] => {
            node.child_mut_or_insert(name);
        }
        [name, value] => {
            let value = value.clone();
            node.child_mut_or_insert(name).values.push(value);
        }
        _ => {
            return Err(CfgMgrError::parse(
                line,
                format!("unexpected value list: {}", words.join(" ")),
            ))
        }
    }
    words.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
/* igmp proxy */
protocols {
    igmp-proxy {
        disable-quickleave
        interface eth0 {
            alt-subnet 10.0.0.0/8
            alt-subnet 192.168.0.0/16
            role upstream
        }
        interface eth1 {
            role downstream
            threshold 4
        }
    }
}
"#;

    #[tokio::test]
    async fn test_parse_sample() {
        let mut tree = ConfigTree::parse(SAMPLE).unwrap();

        assert!(tree.exists("protocols igmp-proxy").await.unwrap());
        assert!(!tree.exists("protocols pim").await.unwrap());

        tree.set_level("protocols igmp-proxy");
        assert!(tree.exists("disable-quickleave").await.unwrap());
        assert!(!tree.exists("disable").await.unwrap());
        assert_eq!(tree.list_nodes("interface").await.unwrap(), vec!["eth0", "eth1"]);

        tree.set_level("protocols igmp-proxy interface eth0");
        assert_eq!(
            tree.return_values("alt-subnet").await.unwrap(),
            vec!["10.0.0.0/8", "192.168.0.0/16"]
        );
        assert_eq!(tree.return_value("role").await.unwrap().as_deref(), Some("upstream"));
        assert_eq!(tree.return_value("threshold").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_nodes_are_empty() {
        let tree = ConfigTree::parse(SAMPLE).unwrap();
        assert!(tree.list_nodes("protocols bgp").await.unwrap().is_empty());
        assert!(tree.return_values("protocols bgp").await.unwrap().is_empty());
        assert_eq!(tree.return_value("protocols bgp").await.unwrap(), None);
    }

    #[test]
    fn test_node_names_with_spaces_rejected() {
        match ConfigTree::parse("a {\n  b \"x y\" {\n    c 1\n  }\n}\n") {
            Err(CfgMgrError::ConfigParse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("x y"));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert!(ConfigTree::parse("\"a b\" 1\n").is_err());
        assert!(ConfigTree::parse("\"\" {\n}\n").is_err());

        // Values may still carry spaces.
        let tree = ConfigTree::parse("a {\n  b \"x y\"\n}\n").unwrap();
        assert_eq!(tree.node("a b").unwrap().values(), ["x y"]);
    }

    #[test]
    fn test_comments_and_quotes() {
        let text = "# header\nsystem {\n    host-name \"edge router\" # trailing\n    /* multi\n line */\n    domain-name example.com\n}\n";
        let tree = ConfigTree::parse(text).unwrap();
        let system = tree.node("system").unwrap();
        assert_eq!(system.child("host-name").unwrap().values(), ["edge router"]);
        assert_eq!(system.child("domain-name").unwrap().values(), ["example.com"]);
        assert_eq!(system.child_names().count(), 2);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        match ConfigTree::parse("a {\n  b\n}\n}\n") {
            Err(CfgMgrError::ConfigParse { line, .. }) => assert_eq!(line, 4),
            other => panic!("Expected parse error, got {:?}", other),
        }

        match ConfigTree::parse("a {\n  b c\n") {
            Err(CfgMgrError::ConfigParse { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected parse error, got {:?}", other),
        }

        match ConfigTree::parse("a {\n  b c d\n}\n") {
            Err(CfgMgrError::ConfigParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected parse error, got {:?}", other),
        }

        assert!(ConfigTree::parse("a \"open").is_err());
        assert!(ConfigTree::parse("/* open").is_err());
    }

    #[test]
    fn test_builder_and_display_reparse() {
        let mut tree = ConfigTree::new();
        tree.set_node("protocols igmp-proxy disable")
            .set_value("protocols igmp-proxy interface eth0 role", "upstream")
            .set_value("protocols igmp-proxy interface eth0 whitelist", "239.0.0.0/8")
            .set_value("protocols igmp-proxy interface eth1 description", "lan side");

        let text = tree.to_string();
        let reparsed = ConfigTree::parse(&text).unwrap();
        assert_eq!(reparsed, tree);
        assert!(text.contains("description \"lan side\""));
    }

    #[test]
    fn test_from_file_missing() {
        match ConfigTree::from_file("/nonexistent/config.boot") {
            Err(CfgMgrError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/config.boot"))
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
