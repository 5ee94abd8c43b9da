//! Integration tests for traceview
//!
//! These tests drive several components together: loading, playback, media
//! synchronization, the terminal app and the `check` command.

#[path = "../common/mod.rs"]
pub mod common;

pub mod app_flow;
pub mod cli_check;
pub mod media_sync;
pub mod multi_viewer;
pub mod playback_flow;
pub mod playback_props;
