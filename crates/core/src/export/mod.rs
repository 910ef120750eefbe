//! Export orchestration.
//!
//! Rendering visuals and encoding the final document happen outside this
//! crate. The service only sequences them: every artifact is requested at
//! once, the export waits until all of them are ready, and only then are the
//! pages laid out and handed to the writer.

pub mod error;
pub mod service;
pub mod types;


pub use error::ExportError;
pub use service::{ArtifactRenderer, DocumentWriter, ExportService};
pub use types::*;
