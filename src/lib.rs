//! Codely: manage AI coding tools and shells as tmux panes from one tree.
//!
//! The manager runs in a narrow tmux pane (the anchor). Every session it
//! launches lives in its own pane; at most one of them sits beside the
//! anchor at a time while the rest wait in background windows. Pane
//! text is polled and classified into a status shown in the tree and in
//! the tmux status bar.
//!
//! Layering, bottom up: [`domain`] types, the [`tmux`] and [`shed`]
//! drivers, the [`status`] classifier, the [`orchestrator`] that moves
//! panes, and the [`app`] event loop that owns all state.

pub mod app;
pub mod build_info;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod notify;
pub mod orchestrator;
pub mod paths;
pub mod process;
pub mod shed;
pub mod status;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod tmux;
pub mod tree;
pub mod ui;
