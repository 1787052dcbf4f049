//! Parse history: a diagnostic tree of the named grammar rules a parse went
//! through.
//!
//! History never influences the parse result. Rules that failed inside a
//! discarded alternative disappear together with the trial state they were
//! recorded in, so the final tree only shows the path that was committed.

use std::fmt;

use im::Vector;

/// Flat renderings longer than this are expanded onto their own lines.
const INLINE_LIMIT: usize = 10;

const ROOT_LABEL: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryNode {
    pub label: String,
    pub children: Vector<HistoryNode>,
}

impl HistoryNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vector::new(),
        }
    }

    /// Render on one line: `label(child,child(grandchild))`.
    pub fn to_flat_string(&self) -> String {
        if self.children.is_empty() {
            return self.label.clone();
        }

        let children = self
            .children
            .iter()
            .map(HistoryNode::to_flat_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.label, children)
    }

    /// Render as an indented tree. Children whose flat form is short stay on
    /// a single line, longer ones are expanded recursively.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        out.push_str(&spaces(indent));
        out.push_str(&self.label);

        if self.children.is_empty() {
            return;
        }

        out.push_str("(\n");
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }

            let flat = child.to_flat_string();
            if flat.len() > INLINE_LIMIT {
                child.render_into(out, indent + 1);
            } else {
                out.push_str(&spaces(indent + 1));
                out.push_str(&flat);
            }
        }
        out.push('\n');
        out.push_str(&spaces(indent));
        out.push(')');
    }
}

impl fmt::Display for HistoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn spaces(indent: usize) -> String {
    " ".repeat(indent * 2)
}

/// The open path from the root to the rule currently being parsed.
#[derive(Debug, Clone)]
pub(crate) struct HistoryStack {
    open: Vector<HistoryNode>,
}

impl HistoryStack {
    pub(crate) fn new() -> Self {
        Self {
            open: Vector::unit(HistoryNode::new(ROOT_LABEL)),
        }
    }

    pub(crate) fn enter(&mut self, label: impl Into<String>) {
        self.open.push_back(HistoryNode::new(label));
    }

    /// Close the innermost open node and attach it to its parent.
    pub(crate) fn leave(&mut self) {
        if self.open.len() < 2 {
            return;
        }
        if let Some(node) = self.open.pop_back() {
            self.attach(node);
        }
    }

    /// Close the innermost open node, moving its children up to the parent
    /// instead of the node itself.
    pub(crate) fn leave_spliced(&mut self) {
        if self.open.len() < 2 {
            return;
        }
        if let Some(node) = self.open.pop_back() {
            for child in node.children {
                self.attach(child);
            }
        }
    }

    /// Record a leaf under the innermost open node.
    pub(crate) fn note(&mut self, label: impl Into<String>) {
        self.attach(HistoryNode::new(label));
    }

    fn attach(&mut self, node: HistoryNode) {
        if let Some(parent) = self.open.back_mut() {
            parent.children.push_back(node);
        }
    }

    /// The whole tree, with any still-open nodes closed.
    pub(crate) fn snapshot(&self) -> HistoryNode {
        let mut open = self.open.iter().rev();
        let Some(innermost) = open.next() else {
            return HistoryNode::new(ROOT_LABEL);
        };

        open.fold(innermost.clone(), |child, parent| {
            let mut parent = parent.clone();
            parent.children.push_back(child);
            parent
        })
    }
}
