//! A loaded source file: its path and text, plus a lazily-useful line
//! index for rendering diagnostics. Not part of the core compiler
//! algorithms — needed so the CLI has something to hand the pipeline.

use crate::span::LineIndex;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    line_index: LineIndex,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        SourceFile {
            path: path.into(),
            text,
            line_index,
        }
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn display_name(&self) -> std::borrow::Cow<'_, str> {
        Path::new(&self.path).to_string_lossy()
    }
}
