//! Reference graph recorded during resolution.
//!
//! Every resolved reference adds an edge "referrer -> target". The resolver
//! never needs the graph to terminate (the visited set does that); it exists
//! for reporting: the `tree` command, per-file reference lists, and debug
//! output about reference cycles, which are legal in this corpus.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Directed graph of file references keyed by canonical path.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a file to the graph if it is not there yet.
    pub fn ensure_node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            index
        } else {
            let index = self.graph.add_node(path.to_path_buf());
            self.node_map.insert(path.to_path_buf(), index);
            index
        }
    }

    /// Record that `from` references `to`. Duplicate edges are ignored.
    pub fn add_reference(&mut self, from: &Path, to: &Path) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Files `path` references directly, in the order the edges were added.
    pub fn references_from(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&idx) = self.node_map.get(path) else {
            return Vec::new();
        };

        // petgraph walks adjacency lists newest first
        let mut refs: Vec<PathBuf> = self.graph.neighbors(idx).map(|n| self.graph[n].clone()).collect();
        refs.reverse();
        refs
    }

    /// Groups of files that reference each other in a cycle, including
    /// single files that reference themselves.
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component.first().is_some_and(|&n| self.graph.contains_edge(n, n))
            })
            .map(|component| {
                let mut paths: Vec<PathBuf> = component.into_iter().map(|n| self.graph[n].clone()).collect();
                paths.sort();
                paths
            })
            .collect()
    }

    /// Render the references below `root` as a tree, using `label` for names.
    ///
    /// A file already printed elsewhere is shown once more with `(see above)`;
    /// a file that closes a cycle is marked `(circular reference)`.
    pub fn to_tree_string<F>(&self, root: &Path, label: F) -> String
    where
        F: Fn(&Path) -> String,
    {
        let mut result = format!("{}\n", label(root));
        let mut shown = HashSet::from([root.to_path_buf()]);
        let mut ancestors = vec![root.to_path_buf()];
        self.build_tree_string(root, &label, "", &mut result, &mut shown, &mut ancestors);
        result
    }

    fn build_tree_string<F>(
        &self,
        node: &Path,
        label: &F,
        prefix: &str,
        result: &mut String,
        shown: &mut HashSet<PathBuf>,
        ancestors: &mut Vec<PathBuf>,
    ) where
        F: Fn(&Path) -> String,
    {
        let children = self.references_from(node);

        for (i, child) in children.iter().enumerate() {
            let is_last = i == children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let child_prefix = if is_last { format!("{prefix}    ") } else { format!("{prefix}│   ") };

            if ancestors.contains(child) {
                result.push_str(&format!("{prefix}{connector}{} (circular reference)\n", label(child)));
                continue;
            }
            if !shown.insert(child.clone()) {
                result.push_str(&format!("{prefix}{connector}{} (see above)\n", label(child)));
                continue;
            }

            result.push_str(&format!("{prefix}{connector}{}\n", label(child)));
            ancestors.push(child.clone());
            self.build_tree_string(child, label, &child_prefix, result, shown, ancestors);
            ancestors.pop();
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
