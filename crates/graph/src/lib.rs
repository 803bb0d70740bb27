//! # Code Graph
//!
//! Schema for the code graph emitted by per-language graphers: definitions,
//! references, documentation blocks and annotations, each anchored to a
//! byte range in a source file.
//!
//! ## Features
//!
//! - **Wire schema** - JSON shape shared with graphers and downstream storage
//! - **Structural validation** - fail-fast checks for refs, defs and docs
//! - **Canonical ordering** - total orders so identical graphs serialize identically
//! - **Repository URIs** - clone URLs collapsed into one canonical spelling
//!
//! ## Architecture
//!
//! ```text
//! Output
//!     │
//!     ├──> Defs  (DefKey + name, kind, file, span, tree path)
//!     ├──> Refs  (target def key + source position)
//!     ├──> Docs  (def path + format, text, span)
//!     └──> Anns  (typed annotation on a span)
//! ```

mod error;
mod sort;
mod types;
mod uri;
mod validate;

pub use error::{GraphError, Result};
pub use sort::{cmp_anns, cmp_defs, cmp_docs, cmp_refs};
pub use types::{
    Ann, Def, DefDoc, DefKey, Doc, DocKey, OffsetType, Output, Positioned, Ref, RefKey,
};
pub use uri::make_uri;
pub use validate::{validate_defs, validate_docs, validate_refs};
