//! Sessionizer - interactive picker for tmux sessions and project directories
//!
//! This library provides the core functionality for the sessionizer binary:
//! fuzzy ranking, the modal picker state machine, catalog discovery and the
//! tmux session orchestration.

pub mod app;
pub mod catalog;
pub mod config;
pub mod git;
pub mod input;
pub mod logging;
pub mod process;
pub mod project;
pub mod scoring;
pub mod session;
pub mod tui;
