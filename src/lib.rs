//! envpin - Project-local tool installer library
//!
//! This library provides the core functionality for installing a
//! command-line tool into a project-local virtual environment and
//! pinning the resolved version in the project's manifest:
//! - Bootstrap install flows (create / install / update / reinstall)
//! - Line-preserving manifest pin rewrites
//! - A programmatic self-update entrypoint for installed tools

pub mod cli;
pub mod error;
pub mod flows;
pub mod manifest;
pub mod output;
pub mod report;
pub mod runner;
pub mod spec;
pub mod updater;
pub mod venv;
