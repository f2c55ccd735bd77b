//! Types for figmark-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

/// Result of Markdown processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Number of `<figure>` elements produced by the figure rule.
  pub figures: usize,

  /// Number of images in the document, inside figures or not.
  pub images: usize,
}
