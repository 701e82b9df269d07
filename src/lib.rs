//! Organize video files into the `Series.SxxExx.ext` layout.
//!
//! The engine infers a series name, season and episode numbers from directory
//! and file names, then renames files inside the source or links/moves them into a
//! structured target tree. A small axum web UI drives it.

pub mod config;
pub mod error;
pub mod naming;
pub mod patterns;
pub mod placement;
pub mod rename_engine;
pub mod series_info;
pub mod transcript;
pub mod web;

pub use error::{PlacementError, ProcessError};
pub use rename_engine::{Mode, ProcessRequest, ProcessRequestBuilder, RenameEngine};
