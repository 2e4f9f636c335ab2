//! User events and their textual form.
//!
//! Every interaction a front end can trigger has a stable identifier (the
//! widget key it is bound to). Scripts use the same identifiers, one event per
//! line:
//!
//! ```text
//! set_force_field martini3
//! linear_block
//! add_block monomer=PEO count=3
//! connect_blocks 1 3 2 1
//! zoom_in
//! graph_event 350 320
//! write_seq_file peo-ps.json
//! ```

use crate::core::architecture::Tacticity;
use crate::core::models::block::BlockKind;
use nalgebra::Point2;
use phf::{Map, phf_map};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SetForceField,
    LinearBlock,
    TreeBlock,
    CombBlock,
    CarbohydrateBlock,
    AddBlock,
    ConnectBlocks,
    RemoveEdge,
    RemoveBlock,
    WriteSeqFile,
    GenItp,
    ZoomIn,
    ZoomOut,
    GraphEvent,
    ResetView,
    LoadFile,
    UpdateLog,
}

static EVENT_KINDS: Map<&'static str, EventKind> = phf_map! {
    "set_force_field" => EventKind::SetForceField,
    "linear_block" => EventKind::LinearBlock,
    "tree_block" => EventKind::TreeBlock,
    "comb_block" => EventKind::CombBlock,
    "carbohydrate_block" => EventKind::CarbohydrateBlock,
    "add_block" => EventKind::AddBlock,
    "connect_blocks" => EventKind::ConnectBlocks,
    "remove_edge" => EventKind::RemoveEdge,
    "remove_block" => EventKind::RemoveBlock,
    "write_seq_file" => EventKind::WriteSeqFile,
    "gen_itp" => EventKind::GenItp,
    "zoom_in" => EventKind::ZoomIn,
    "zoom_out" => EventKind::ZoomOut,
    "graph_event" => EventKind::GraphEvent,
    "reset_view" => EventKind::ResetView,
    "load_file" => EventKind::LoadFile,
    "update_log" => EventKind::UpdateLog,
};

impl EventKind {
    pub fn from_id(id: &str) -> Option<Self> {
        EVENT_KINDS.get(id).copied()
    }

    pub fn id(&self) -> &'static str {
        match self {
            EventKind::SetForceField => "set_force_field",
            EventKind::LinearBlock => "linear_block",
            EventKind::TreeBlock => "tree_block",
            EventKind::CombBlock => "comb_block",
            EventKind::CarbohydrateBlock => "carbohydrate_block",
            EventKind::AddBlock => "add_block",
            EventKind::ConnectBlocks => "connect_blocks",
            EventKind::RemoveEdge => "remove_edge",
            EventKind::RemoveBlock => "remove_block",
            EventKind::WriteSeqFile => "write_seq_file",
            EventKind::GenItp => "gen_itp",
            EventKind::ZoomIn => "zoom_in",
            EventKind::ZoomOut => "zoom_out",
            EventKind::GraphEvent => "graph_event",
            EventKind::ResetView => "reset_view",
            EventKind::LoadFile => "load_file",
            EventKind::UpdateLog => "update_log",
        }
    }

    /// Whether handling this event changes the graph and therefore re-runs
    /// the layout.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EventKind::AddBlock
                | EventKind::ConnectBlocks
                | EventKind::RemoveEdge
                | EventKind::RemoveBlock
                | EventKind::LoadFile
        )
    }

    pub fn is_view_only(&self) -> bool {
        matches!(
            self,
            EventKind::ZoomIn | EventKind::ZoomOut | EventKind::GraphEvent | EventKind::ResetView
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Values submitted from an architecture form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockValues {
    pub monomer: String,
    pub count: Option<usize>,
    pub branching: Option<usize>,
    pub tacticity: Option<Tacticity>,
}

/// Two residues addressed as 1-based `(block label, residue)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkEnds {
    pub block_a: usize,
    pub resid_a: usize,
    pub block_b: usize,
    pub resid_b: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetForceField(String),
    OpenArchitecture(BlockKind),
    AddBlock(BlockValues),
    ConnectBlocks(LinkEnds),
    RemoveEdge(LinkEnds),
    RemoveBlock(usize),
    WriteSeqFile(PathBuf),
    GenItp(PathBuf),
    ZoomIn,
    ZoomOut,
    /// A click or drag on the canvas, in device coordinates.
    GraphEvent(Point2<f64>),
    ResetView,
    LoadFile(PathBuf),
    UpdateLog(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventParseError {
    #[error("Empty event line")]
    Empty,
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),
    #[error("Event '{event}' is missing its {argument}")]
    MissingArgument {
        event: EventKind,
        argument: &'static str,
    },
    #[error("Invalid {argument} '{value}' for event '{event}'")]
    InvalidArgument {
        event: EventKind,
        argument: String,
        value: String,
    },
    #[error("Event '{event}' takes no argument '{value}'")]
    UnexpectedArgument { event: EventKind, value: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SetForceField(_) => EventKind::SetForceField,
            Event::OpenArchitecture(BlockKind::Tree) => EventKind::TreeBlock,
            Event::OpenArchitecture(BlockKind::Comb) => EventKind::CombBlock,
            Event::OpenArchitecture(BlockKind::Carbohydrate) => EventKind::CarbohydrateBlock,
            Event::OpenArchitecture(_) => EventKind::LinearBlock,
            Event::AddBlock(_) => EventKind::AddBlock,
            Event::ConnectBlocks(_) => EventKind::ConnectBlocks,
            Event::RemoveEdge(_) => EventKind::RemoveEdge,
            Event::RemoveBlock(_) => EventKind::RemoveBlock,
            Event::WriteSeqFile(_) => EventKind::WriteSeqFile,
            Event::GenItp(_) => EventKind::GenItp,
            Event::ZoomIn => EventKind::ZoomIn,
            Event::ZoomOut => EventKind::ZoomOut,
            Event::GraphEvent(_) => EventKind::GraphEvent,
            Event::ResetView => EventKind::ResetView,
            Event::LoadFile(_) => EventKind::LoadFile,
            Event::UpdateLog(_) => EventKind::UpdateLog,
        }
    }

    /// Parses one script line such as `connect_blocks 1 3 2 1`.
    pub fn parse(line: &str) -> Result<Self, EventParseError> {
        let line = line.trim();
        let (id, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(id, rest)| (id, rest.trim()));
        if id.is_empty() {
            return Err(EventParseError::Empty);
        }
        let kind =
            EventKind::from_id(id).ok_or_else(|| EventParseError::UnknownEvent(id.to_string()))?;

        let event = match kind {
            EventKind::SetForceField => {
                Event::SetForceField(single_token(kind, rest, "force field")?)
            }
            EventKind::LinearBlock => {
                no_arguments(kind, rest, Event::OpenArchitecture(BlockKind::Linear))?
            }
            EventKind::TreeBlock => {
                no_arguments(kind, rest, Event::OpenArchitecture(BlockKind::Tree))?
            }
            EventKind::CombBlock => {
                no_arguments(kind, rest, Event::OpenArchitecture(BlockKind::Comb))?
            }
            EventKind::CarbohydrateBlock => {
                no_arguments(kind, rest, Event::OpenArchitecture(BlockKind::Carbohydrate))?
            }
            EventKind::AddBlock => Event::AddBlock(parse_block_values(kind, rest)?),
            EventKind::ConnectBlocks => Event::ConnectBlocks(parse_link_ends(kind, rest)?),
            EventKind::RemoveEdge => Event::RemoveEdge(parse_link_ends(kind, rest)?),
            EventKind::RemoveBlock => {
                let label = single_token(kind, rest, "block label")?;
                Event::RemoveBlock(parse_value(kind, "block label", &label)?)
            }
            EventKind::WriteSeqFile => Event::WriteSeqFile(path_argument(kind, rest)?),
            EventKind::GenItp => Event::GenItp(path_argument(kind, rest)?),
            EventKind::ZoomIn => no_arguments(kind, rest, Event::ZoomIn)?,
            EventKind::ZoomOut => no_arguments(kind, rest, Event::ZoomOut)?,
            EventKind::GraphEvent => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                let [x, y] = parts[..] else {
                    return Err(EventParseError::MissingArgument {
                        event: kind,
                        argument: "x and y coordinates",
                    });
                };
                Event::GraphEvent(Point2::new(
                    parse_value(kind, "x coordinate", x)?,
                    parse_value(kind, "y coordinate", y)?,
                ))
            }
            EventKind::ResetView => no_arguments(kind, rest, Event::ResetView)?,
            EventKind::LoadFile => Event::LoadFile(path_argument(kind, rest)?),
            EventKind::UpdateLog => Event::UpdateLog(rest.to_string()),
        };
        Ok(event)
    }
}

fn no_arguments(kind: EventKind, rest: &str, event: Event) -> Result<Event, EventParseError> {
    if rest.is_empty() {
        Ok(event)
    } else {
        Err(EventParseError::UnexpectedArgument {
            event: kind,
            value: rest.to_string(),
        })
    }
}

fn single_token(
    kind: EventKind,
    rest: &str,
    argument: &'static str,
) -> Result<String, EventParseError> {
    let mut tokens = rest.split_whitespace();
    let token = tokens.next().ok_or(EventParseError::MissingArgument {
        event: kind,
        argument,
    })?;
    if let Some(extra) = tokens.next() {
        return Err(EventParseError::UnexpectedArgument {
            event: kind,
            value: extra.to_string(),
        });
    }
    Ok(token.to_string())
}

fn path_argument(kind: EventKind, rest: &str) -> Result<PathBuf, EventParseError> {
    if rest.is_empty() {
        return Err(EventParseError::MissingArgument {
            event: kind,
            argument: "path",
        });
    }
    Ok(PathBuf::from(rest))
}

fn parse_value<T: FromStr>(
    kind: EventKind,
    argument: &str,
    value: &str,
) -> Result<T, EventParseError> {
    value.parse().map_err(|_| EventParseError::InvalidArgument {
        event: kind,
        argument: argument.to_string(),
        value: value.to_string(),
    })
}

fn parse_link_ends(kind: EventKind, rest: &str) -> Result<LinkEnds, EventParseError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [block_a, resid_a, block_b, resid_b] = parts[..] else {
        return Err(EventParseError::MissingArgument {
            event: kind,
            argument: "block and residue of both ends",
        });
    };
    Ok(LinkEnds {
        block_a: parse_value(kind, "block", block_a)?,
        resid_a: parse_value(kind, "resid", resid_a)?,
        block_b: parse_value(kind, "block", block_b)?,
        resid_b: parse_value(kind, "resid", resid_b)?,
    })
}

fn parse_block_values(kind: EventKind, rest: &str) -> Result<BlockValues, EventParseError> {
    let mut values = BlockValues::default();
    for token in rest.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            return Err(EventParseError::UnexpectedArgument {
                event: kind,
                value: token.to_string(),
            });
        };
        match key {
            "monomer" => values.monomer = value.to_string(),
            "count" => values.count = Some(parse_value(kind, key, value)?),
            "branching" => values.branching = Some(parse_value(kind, key, value)?),
            "tacticity" => values.tacticity = Some(parse_value(kind, key, value)?),
            _ => {
                return Err(EventParseError::InvalidArgument {
                    event: kind,
                    argument: "field".to_string(),
                    value: key.to_string(),
                });
            }
        }
    }
    if values.monomer.is_empty() {
        return Err(EventParseError::MissingArgument {
            event: kind,
            argument: "monomer",
        });
    }
    Ok(values)
}
