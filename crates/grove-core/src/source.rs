//! Source lookup and tooltip text

use crate::graph::EdgeKind;
use crate::model::{Corpus, NodeRef};

const RULE_WIDTH: usize = 50;

/// Answers "what does this node look like in the source" for previews.
pub struct SourceLookup<'a> {
    corpus: &'a Corpus,
    max_lines: usize,
}

impl<'a> SourceLookup<'a> {
    pub fn new(corpus: &'a Corpus, max_lines: usize) -> Self {
        SourceLookup { corpus, max_lines }
    }

    /// Captured source for a symbol, or a marked placeholder.
    pub fn source(&self, id: &str) -> String {
        match self.corpus.source_of(id) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => format!("(No source code found for {id})"),
        }
    }

    /// Tooltip body for any node, truncated to the configured line count.
    pub fn preview(&self, node: &NodeRef) -> String {
        let text = match node {
            NodeRef::Symbol(id) => self.source(id),
            NodeRef::StaticResource(path) => {
                format!("STATIC FILE DEPENDENCY\n{}\nFile Path: {path}", rule())
            }
            NodeRef::DynamicResource(desc) => match self.corpus.dynamic_resources.get(desc) {
                Some(caller) => format!(
                    "Code block relying on data: {}\n{}\n{}",
                    self.display_label(&NodeRef::symbol(caller.as_str())),
                    rule(),
                    self.source(caller)
                ),
                None => format!(
                    "DYNAMIC DATA: {desc}\n{}\nCode definition not found.",
                    rule()
                ),
            },
            NodeRef::Group(owner) => format!("Top-level functions of {owner}"),
        };
        truncate_lines(&text, self.max_lines)
    }

    /// Human label: resources show their key, symbols lose the project prefix.
    pub fn display_label(&self, node: &NodeRef) -> String {
        display_label(self.corpus.project_name(), node)
    }

    pub fn edge_tooltip(&self, tail: &NodeRef, head: &NodeRef, kind: EdgeKind) -> String {
        format!(
            "Source: {}\nTarget: {}\nType: {}",
            self.display_label(tail),
            self.display_label(head),
            kind.as_str().to_uppercase()
        )
    }
}

pub fn display_label(project: &str, node: &NodeRef) -> String {
    match node {
        NodeRef::Symbol(id) | NodeRef::Group(id) => {
            let stripped = (!project.is_empty())
                .then(|| id.strip_prefix(project).and_then(|rest| rest.strip_prefix('.')))
                .flatten()
                .unwrap_or(id.as_str());
            if matches!(node, NodeRef::Group(_)) {
                format!("{stripped} (functions)")
            } else {
                stripped.to_string()
            }
        }
        NodeRef::StaticResource(path) => path.clone(),
        NodeRef::DynamicResource(desc) => desc.clone(),
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn truncate_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        return lines.join("\n");
    }
    let mut kept = lines[..max_lines].join("\n");
    kept.push_str("\n... (truncated)");
    kept
}
