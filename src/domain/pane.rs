//! Pane handles and the per-session pane lifecycle.
//!
//! Every mutation of a session's pane goes through one of the transition
//! functions below. Each is total over [`PaneState`] and returns an error for
//! combinations that make no sense (hiding a pane that is not visible, showing
//! a destroyed session, ...), so callers can never assemble an inconsistent
//! `(pane id, visible)` pair by hand.

use crate::error::InvalidTransition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiplexer pane identifier (`%N` in tmux).
///
/// Identifiers are not stable: detaching or attaching a pane may hand back a
/// different id for the same logical terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(pub u32);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl FromStr for PaneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('%').unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(PaneId)
            .map_err(|_| format!("invalid pane id `{s}`"))
    }
}

/// Operation names used in transition errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneOp {
    Create,
    Hide,
    Show,
    Kill,
    Reconcile,
}

impl fmt::Display for PaneOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::Kill => "kill",
            Self::Reconcile => "reconcile",
        };
        f.write_str(name)
    }
}

/// Pane lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneState {
    #[default]
    NoPane,
    Visible(PaneId),
    Hidden(PaneId),
    Destroyed,
}

impl PaneState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoPane => "no_pane",
            Self::Visible(_) => "visible",
            Self::Hidden(_) => "hidden",
            Self::Destroyed => "destroyed",
        }
    }

    pub fn pane_id(&self) -> Option<PaneId> {
        match self {
            Self::Visible(id) | Self::Hidden(id) => Some(*id),
            Self::NoPane | Self::Destroyed => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    fn reject(&self, op: PaneOp) -> InvalidTransition {
        InvalidTransition {
            from: self.name(),
            op,
        }
    }

    /// A freshly split pane lands next to the anchor.
    pub fn created(self, id: PaneId) -> Result<Self, InvalidTransition> {
        match self {
            Self::NoPane => Ok(Self::Visible(id)),
            other => Err(other.reject(PaneOp::Create)),
        }
    }

    /// The visible pane was detached and now lives under `new_id`.
    pub fn hidden(self, new_id: PaneId) -> Result<Self, InvalidTransition> {
        match self {
            Self::Visible(_) => Ok(Self::Hidden(new_id)),
            other => Err(other.reject(PaneOp::Hide)),
        }
    }

    /// A background pane was attached to the anchor window as `new_id`.
    pub fn shown(self, new_id: PaneId) -> Result<Self, InvalidTransition> {
        match self {
            Self::Hidden(_) => Ok(Self::Visible(new_id)),
            other => Err(other.reject(PaneOp::Show)),
        }
    }

    /// Session closed or its pane terminated. Legal from any live state.
    pub fn killed(self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Destroyed => Err(self.reject(PaneOp::Kill)),
            _ => Ok(Self::Destroyed),
        }
    }

    /// Re-derive visibility for an existing pane from the multiplexer's view.
    pub fn reconciled(self, id: PaneId, visible: bool) -> Result<Self, InvalidTransition> {
        match self {
            Self::Visible(_) | Self::Hidden(_) if visible => Ok(Self::Visible(id)),
            Self::Visible(_) | Self::Hidden(_) => Ok(Self::Hidden(id)),
            other => Err(other.reject(PaneOp::Reconcile)),
        }
    }

    /// Drop visibility without touching the pane, used when clearing all
    /// flags ahead of a new visible assignment.
    pub fn demoted(self) -> Self {
        match self {
            Self::Visible(id) => Self::Hidden(id),
            other => other,
        }
    }
}
