//! # Code Grapher
//!
//! Post-processing for grapher output: everything between a language
//! analyzer's raw JSON and the canonical graph stored downstream.
//!
//! ## Pipeline
//!
//! ```text
//! Output (raw, from a grapher)
//!     │
//!     ├──> Ref rewrite      DefRepo -> canonical repository URI
//!     │
//!     ├──> Offset decision  declared OffsetType, else OffsetPolicy table
//!     │
//!     ├──> Offset conversion (rune -> byte, per record)
//!     │      ├─ FileContentCache: one PositionIndex per file
//!     │      └─ failures logged and skipped, never fatal
//!     │
//!     ├──> Validation       refs, defs, docs (first error aborts)
//!     │
//!     └──> Sort             canonical order for all four collections
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use code_grapher::{normalize_data, OffsetType, Output};
//! use std::path::Path;
//!
//! let raw = std::fs::read("graph.json").unwrap();
//! let mut output = Output::from_json_slice(&raw).unwrap();
//! normalize_data(OffsetType::Unspecified, "PipPackage", Path::new("."), &mut output).unwrap();
//! println!("{}", output.to_json().unwrap());
//! ```

mod config;
mod error;
mod grapher;
mod normalize;
mod offsets;

pub use code_graph::{OffsetType, Output};
pub use config::OffsetPolicy;
pub use error::{GrapherError, OffsetError, Result};
pub use grapher::{run_grapher, Grapher, SourceUnit};
pub use normalize::{normalize_data, NormalizeReport, Normalizer};
pub use offsets::{
    ConversionReport, ConversionWarning, ConvertOutcome, FileContentCache, OffsetConverter,
    PositionIndex, SkipReason,
};
