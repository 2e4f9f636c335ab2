//! Input forms shown before a block is added or a link is edited.
//!
//! Each window variant is a plain struct; a front end renders the fields it
//! is told are visible and submits the matching event.

use super::events::EventKind;
use crate::core::architecture::{Architecture, ArchitectureError, Tacticity, supports_tacticity};
use crate::core::models::block::BlockKind;

pub const TACTICITY_CHOICES: [Tacticity; 4] = [
    Tacticity::Atactic,
    Tacticity::IsotacticR,
    Tacticity::IsotacticS,
    Tacticity::Syndiotactic,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: String,
    pub default_text: String,
    pub visible: bool,
}

impl FieldSpec {
    fn shown(label: &str, default_text: &str) -> Self {
        Self {
            label: label.to_string(),
            default_text: default_text.to_string(),
            visible: true,
        }
    }

    fn hidden() -> Self {
        Self {
            label: String::new(),
            default_text: String::new(),
            visible: false,
        }
    }
}

/// The form opened by one of the chain-architecture buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureForm {
    pub kind: BlockKind,
    pub title: String,
    pub monomer_field: FieldSpec,
    pub repeat_field: FieldSpec,
    pub branching_field: FieldSpec,
    pub tacticity_visible: bool,
    pub monomers: Vec<String>,
}

impl ArchitectureForm {
    /// Builds the form for `kind`, offering `monomers` as choices.
    ///
    /// The tacticity picker is only shown when `force_field` is known and
    /// carries stereo information.
    pub fn for_kind(
        kind: BlockKind,
        monomers: Vec<String>,
        force_field: Option<&str>,
    ) -> Result<Self, ArchitectureError> {
        let monomer_field = FieldSpec::shown("monomer type", "");
        let (title, repeat_field, branching_field) = match kind {
            BlockKind::Linear => (
                "linear block",
                FieldSpec::shown("repeat units", "1"),
                FieldSpec::hidden(),
            ),
            BlockKind::Comb => (
                "comb block",
                FieldSpec::shown("repeat units", "1"),
                FieldSpec::hidden(),
            ),
            BlockKind::Tree => (
                "tree block",
                FieldSpec::shown("generations", "1"),
                FieldSpec::shown("degree of branching", "1"),
            ),
            BlockKind::Carbohydrate => ("monomer", FieldSpec::hidden(), FieldSpec::hidden()),
            BlockKind::File => return Err(ArchitectureError::NotGenerated(kind)),
        };
        Ok(Self {
            kind,
            title: title.to_string(),
            monomer_field,
            repeat_field,
            branching_field,
            tacticity_visible: force_field.is_some_and(supports_tacticity),
            monomers,
        })
    }

    /// Resolves submitted field values into an architecture.
    ///
    /// Missing values fall back to the field defaults; hidden fields are
    /// pinned to 1 whatever was submitted.
    pub fn architecture(
        &self,
        count: Option<usize>,
        branching: Option<usize>,
    ) -> Result<Architecture, ArchitectureError> {
        let count = resolve(&self.repeat_field, count);
        let branching = resolve(&self.branching_field, branching);
        Architecture::from_kind(self.kind, count, branching)
    }
}

fn resolve(field: &FieldSpec, submitted: Option<usize>) -> usize {
    if !field.visible {
        return 1;
    }
    submitted
        .or_else(|| field.default_text.parse().ok())
        .unwrap_or(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Connect,
    Disconnect,
}

/// The form asking for two `(block, residue)` pairs to link or unlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkForm {
    pub action: LinkAction,
    pub title: String,
    pub action_label: String,
    pub linkage_visible: bool,
    /// Event submitted by the action button.
    pub submits: EventKind,
}

impl LinkForm {
    pub fn new(action: LinkAction) -> Self {
        match action {
            LinkAction::Connect => Self {
                action,
                title: "add links".to_string(),
                action_label: "add".to_string(),
                linkage_visible: true,
                submits: EventKind::ConnectBlocks,
            },
            LinkAction::Disconnect => Self {
                action,
                title: "remove links".to_string(),
                action_label: "remove".to_string(),
                linkage_visible: false,
                submits: EventKind::RemoveEdge,
            },
        }
    }
}
