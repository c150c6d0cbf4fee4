//! A display only projection of the dependency graph of the root targets of a
//! build folder, and its rendering as an indented ASCII tree

use std::io::{self, Write};

use color_eyre::{eyre::eyre, Result};

use crate::catalog::{TargetCatalog, TargetHandle};
use crate::utils::constants::error_messages;

/// A node of the dependency tree. Children are kept in dependency discovery
/// order, which is meaningful diagnostic information, so they're never sorted
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DependencyTree {
    pub description: String,
    pub children: Vec<DependencyTree>,
}

/// The prefixes used when rendering a node line and the lines of its children
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TreeIndent {
    pub node: String,
    pub children: String,
}

impl TreeIndent {
    pub fn uniform(prefix: &str) -> Self {
        Self {
            node: prefix.to_string(),
            children: prefix.to_string(),
        }
    }
}

impl DependencyTree {
    pub fn leaf(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn node(description: impl Into<String>, children: Vec<DependencyTree>) -> Self {
        Self {
            description: description.into(),
            children,
        }
    }

    /// Builds the tree for the given root targets. The returned root is unnamed and
    /// its children match, one by one and in order, the `root_targets`.
    ///
    /// Callers are expected to have filtered out the names that the catalog
    /// can't resolve. Reaching one here, or finding a dependency cycle, is
    /// reported as an error.
    pub fn build<C: TargetCatalog + ?Sized>(root_targets: &[String], catalog: &C) -> Result<Self> {
        let mut children = Vec::with_capacity(root_targets.len());
        for name in root_targets {
            let handle = catalog
                .resolve(name)
                .ok_or_else(|| eyre!("{}: '{name}'", error_messages::TARGET_NOT_FOUND))?;
            let mut path = Vec::new();
            children.push(Self::expand(catalog, handle, &mut path)?);
        }

        Ok(Self {
            description: String::new(),
            children,
        })
    }

    fn expand<C: TargetCatalog + ?Sized>(
        catalog: &C,
        handle: TargetHandle,
        path: &mut Vec<TargetHandle>,
    ) -> Result<Self> {
        if path.contains(&handle) {
            return Err(eyre!(
                "{}: '{}'",
                error_messages::DEPENDENCY_CYCLE,
                catalog.fully_qualified_name(handle)
            ));
        }
        path.push(handle);

        let mut children = Vec::new();
        for dependency in catalog.dependencies(handle)? {
            children.push(Self::expand(catalog, dependency, path)?);
        }

        path.pop();
        Ok(Self::node(catalog.short_name(handle), children))
    }

    /// Writes this node, and its whole subtree, with the given indentation
    pub fn render<W: Write>(&self, out: &mut W, indent: &TreeIndent) -> io::Result<()> {
        writeln!(out, "{}{}", indent.node, self.description)?;

        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let child_indent = if i < last {
                TreeIndent {
                    node: format!("{}+-- ", indent.children),
                    children: format!("{}|   ", indent.children),
                }
            } else {
                TreeIndent {
                    node: format!("{}`-- ", indent.children),
                    children: format!("{}    ", indent.children),
                }
            };
            child.render(out, &child_indent)?;
        }

        Ok(())
    }

    /// Renders every child of this node as a top level entry, which is how the
    /// unnamed root returned by [`DependencyTree::build`] is displayed
    pub fn render_roots<W: Write>(&self, out: &mut W, indent: &TreeIndent) -> io::Result<()> {
        for child in &self.children {
            child.render(out, indent)?;
        }
        Ok(())
    }
}
