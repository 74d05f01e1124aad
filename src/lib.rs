//! Sintegra Core - fixed-width record engine for the Sintegra tax layout
//!
//! # Flow
//! 1. Typed record structs describe one line each (`elements`)
//! 2. Every field is validated before anything is formatted (`element`)
//! 3. Blocks keep their records in layout order (`block`)
//! 4. The file always closes with its computed registro 90 (`sintegra`, `totals`)

pub mod ascii;
pub mod block;
pub mod config;
pub mod documents;
pub mod element;
pub mod elements;
pub mod error;
pub mod field;
pub mod format;
pub mod hashing;
pub mod records;
pub mod sintegra;
pub mod totals;
pub mod validation;

pub use block::{Block, BlockKind};
pub use config::LayoutConfig;
pub use element::{Element, Layout};
pub use elements::*;
pub use error::{Result, SintegraError};
pub use hashing::{canonical_json, compute_manifest_hash, FileManifest};
pub use records::{RecordCode, RecordKind, RecordSpec};
pub use rust_decimal::Decimal;
pub use sintegra::Sintegra;
pub use totals::Trailer;
pub use validation::{Rule, ValidationResult, Violation};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
