use super::ids::{NodeId, NodeRange};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a block entered the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Linear,
    Tree,
    Comb,
    Carbohydrate,
    File,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Linear => "linear",
            BlockKind::Tree => "tree",
            BlockKind::Comb => "comb",
            BlockKind::Carbohydrate => "carbohydrate",
            BlockKind::File => "file",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown block kind '{0}'")]
pub struct ParseBlockKindError(String);

impl FromStr for BlockKind {
    type Err = ParseBlockKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "linear_block" => Ok(Self::Linear),
            "tree" | "tree_block" => Ok(Self::Tree),
            "comb" | "comb_block" => Ok(Self::Comb),
            "carbohydrate" | "carbohydrate_block" => Ok(Self::Carbohydrate),
            "file" => Ok(Self::File),
            _ => Err(ParseBlockKindError(s.to_string())),
        }
    }
}

/// One user-added unit: a chain, tree, comb, carbohydrate or loaded fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub name: String, // Monomer or molecule name shown in the block list
    pub nodes: NodeRange, // Real node ids created for this block
    pub size: usize,  // Residue count shown in the block list
}

impl Block {
    pub fn new(kind: BlockKind, name: &str, nodes: NodeRange) -> Self {
        Self {
            kind,
            name: name.to_string(),
            size: nodes.len(),
            nodes,
        }
    }

    /// Residue positions relative to the block itself, `0..size`.
    pub fn local_range(&self) -> NodeRange {
        NodeRange::new(0, self.nodes.len())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("Block {label} does not exist ({count} block(s) present)")]
    UnknownBlock { label: usize, count: usize },
    #[error("Block {label} has no residue {resid} (it holds {size})")]
    UnknownResidue {
        label: usize,
        resid: usize,
        size: usize,
    },
}

/// Ordered list of blocks in the order they were added.
///
/// Labels are the 1-based list positions and are recomputed after every
/// removal; the node ranges themselves always keep pointing at real node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    blocks: Vec<Block>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block and returns its label.
    pub fn push(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len()
    }

    pub fn get(&self, label: usize) -> Result<&Block, BlockError> {
        label
            .checked_sub(1)
            .and_then(|idx| self.blocks.get(idx))
            .ok_or(BlockError::UnknownBlock {
                label,
                count: self.blocks.len(),
            })
    }

    /// Removes the block with the given label and relabels the rest.
    pub fn remove(&mut self, label: usize) -> Result<Block, BlockError> {
        self.get(label)?;
        Ok(self.blocks.remove(label - 1))
    }

    /// Maps a block label and a 1-based residue index onto the graph node.
    pub fn resolve(&self, label: usize, resid: usize) -> Result<NodeId, BlockError> {
        let block = self.get(label)?;
        resid
            .checked_sub(1)
            .and_then(|idx| block.nodes.get(idx))
            .ok_or(BlockError::UnknownResidue {
                label,
                resid,
                size: block.nodes.len(),
            })
    }

    /// Real node ranges in list order.
    pub fn ranges(&self) -> Vec<NodeRange> {
        self.blocks.iter().map(|block| block.nodes).collect()
    }

    /// The lines shown in the block list panel, e.g. `"1 PEO 3"`.
    pub fn labels(&self) -> Vec<String> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(idx, block)| format!("{} {} {}", idx + 1, block.name, block.size))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
