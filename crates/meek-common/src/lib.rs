//! Common types and utilities shared by every phase of the meekc
//! compiler: source spans, diagnostics, and the source-file handle.

pub mod diagnostics;
pub mod node_id;
pub mod source;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory, codes};
pub use node_id::NodeId;
pub use source::SourceFile;
pub use span::{LineCol, LineIndex, Span, SpanBuilder, Spanned};
