//! Oxipatch: BPS binary patch validation and application in Rust.
//!
//! The crate provides:
//! - The BPS format core (`bps`): validation, inspection, application
//! - Patch container identification (`detect`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use oxipatch::bps;
//!
//! let source = std::fs::read("game.rom").unwrap();
//! let patch = std::fs::read("update.bps").unwrap();
//!
//! bps::validate_patch(&patch).unwrap();
//! let info = bps::patch_info(&patch).unwrap();
//! println!("produces {} bytes", info.target_size);
//!
//! let target = bps::apply_patch(&source, &patch).unwrap();
//! assert_eq!(target.len() as u64, info.target_size);
//! ```

pub mod bps;
pub mod detect;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;
