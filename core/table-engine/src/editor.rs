//! FILENAME: core/table-engine/src/editor.rs
//! PURPOSE: Per-cell editing state machine.
//! CONTEXT: A cell is either being viewed or being edited. Activation moves
//! it into editing (or, for toggle-style columns, commits right away);
//! commit and cancel bring it back to viewing. Calls made from the wrong
//! state are ignored.

use serde::{Deserialize, Serialize};

use crate::record::Value;

/// Raw input handed from an editor to the edit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawInput {
    /// Text typed by the user.
    Text(String),
    /// Flip the current boolean value.
    Toggle,
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

/// When an editor hands its value over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitMode {
    /// Edit a draft, commit on blur/enter.
    OnBlur,
    /// Activation commits immediately (checkbox toggle).
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    Viewing,
    Editing { draft: String },
}

/// Editing handle for a single cell.
#[derive(Debug, Clone)]
pub struct CellEditor {
    mode: CommitMode,
    /// Text shown when editing starts
    initial: String,
    state: CellState,
}

impl CellEditor {
    pub fn new(mode: CommitMode, initial: impl Into<String>) -> Self {
        CellEditor {
            mode,
            initial: initial.into(),
            state: CellState::Viewing,
        }
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, CellState::Editing { .. })
    }

    /// Viewing -> Editing. Immediate-mode editors stay in Viewing and
    /// return the toggle to commit.
    pub fn activate(&mut self) -> Option<RawInput> {
        match (&self.state, self.mode) {
            (CellState::Viewing, CommitMode::Immediate) => Some(RawInput::Toggle),
            (CellState::Viewing, CommitMode::OnBlur) => {
                self.state = CellState::Editing {
                    draft: self.initial.clone(),
                };
                None
            }
            (CellState::Editing { .. }, _) => None,
        }
    }

    /// Replace the draft text. Ignored unless editing.
    pub fn input(&mut self, text: impl Into<String>) {
        if let CellState::Editing { draft } = &mut self.state {
            *draft = text.into();
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            CellState::Editing { draft } => Some(draft),
            CellState::Viewing => None,
        }
    }

    /// Editing -> Viewing, yielding the draft for the pipeline. The next
    /// activation still starts from the stored value until `confirm`.
    pub fn commit(&mut self) -> Option<RawInput> {
        match std::mem::replace(&mut self.state, CellState::Viewing) {
            CellState::Editing { draft } => Some(RawInput::Text(draft)),
            CellState::Viewing => None,
        }
    }

    /// Record the value the pipeline actually stored.
    pub fn confirm(&mut self, committed: &Value) {
        self.initial = committed.display_raw();
    }

    /// Editing -> Viewing, discarding the draft.
    pub fn cancel(&mut self) {
        self.state = CellState::Viewing;
    }
}
