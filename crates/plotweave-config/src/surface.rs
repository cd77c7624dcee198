/// Editing surfaces that keep their own undo history.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An editing surface of the script editor.
///
/// Each open document is edited through exactly one surface, and the
/// surface decides which history capacity the document gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditSurface {
    /// The node-graph view of a branching script.
    NodeGraph,
    /// The block-tree view of a branching script.
    BlockTree,
    /// The project settings panel.
    Settings,
}

impl EditSurface {
    /// All surfaces, in menu order.
    pub const ALL: [EditSurface; 3] = [Self::NodeGraph, Self::BlockTree, Self::Settings];

    /// Stable kebab-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeGraph => "node-graph",
            Self::BlockTree => "block-tree",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for EditSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditSurface {
    type Err = anyhow::Error;

    /// Accepts both `node-graph` and `node_graph` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|surface| surface.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("unknown edit surface: {s:?}"))
    }
}
