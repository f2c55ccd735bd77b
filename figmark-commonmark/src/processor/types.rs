//! Type definitions for the Markdown processor.
//!
//! Contains the configuration (`MarkdownOptions` and its builder), the
//! processor struct itself and the `CoreRule` trait through which token
//! stream passes such as the figure rule are registered.
//!
//! # Examples
//!
//! ```
//! use figmark_commonmark::{FigureOptions, MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: true,
//!   figures: Some(FigureOptions {
//!     image_link: true,
//!     ..Default::default()
//!   }),
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::Arc;

use crate::{figure::FigureOptions, token::Token};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Figure rule options. `None` disables the rule entirely.
  pub figures: Option<FigureOptions>,

  /// Emit void elements XHTML style (`<img ... />`).
  pub xhtml_out: bool,
}

impl MarkdownOptions {
  /// Enable all available features based on compile-time feature flags.
  #[must_use]
  pub const fn with_all_features() -> Self {
    Self {
      gfm:       cfg!(feature = "gfm"),
      figures:   Some(FigureOptions {
        image_link:      true,
        skip_no_caption: false,
      }),
      xhtml_out: false,
    }
  }

  /// Plain CommonMark rendering without any core rules.
  #[must_use]
  pub const fn plain() -> Self {
    Self {
      gfm:       false,
      figures:   None,
      xhtml_out: false,
    }
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:       cfg!(feature = "gfm"),
      figures:   Some(FigureOptions::default()),
      xhtml_out: false,
    }
  }
}

/// Main Markdown processor.
///
/// Holds no per-render state, so a single instance can render any number of
/// documents, including from several threads at once. Cloning is cheap since
/// rules are shared through `Arc`.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
  pub(crate) rules:   Vec<Arc<dyn CoreRule>>,
}

impl std::fmt::Debug for MarkdownProcessor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MarkdownProcessor")
      .field("options", &self.options)
      .field("rules", &self.rule_names())
      .finish()
  }
}

/// A pass over the complete block token stream.
///
/// Core rules run after comrak parsing and inline resolution, and before HTML
/// serialization, in the order they were registered.
pub trait CoreRule: Send + Sync {
  /// Short identifier, used for logging and introspection.
  fn name(&self) -> &'static str;

  fn run(&self, tokens: &mut Vec<Token>);
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Replace the figure rule options; `None` disables the rule.
  #[must_use]
  pub const fn figures(mut self, figures: Option<FigureOptions>) -> Self {
    self.options.figures = figures;
    self
  }

  /// Link figure images to their source. Enables the figure rule.
  #[must_use]
  pub fn image_link(mut self, enabled: bool) -> Self {
    self.options.figures.get_or_insert_default().image_link = enabled;
    self
  }

  /// Leave caption-less image paragraphs alone. Enables the figure rule.
  #[must_use]
  pub fn skip_no_caption(mut self, enabled: bool) -> Self {
    self.options.figures.get_or_insert_default().skip_no_caption = enabled;
    self
  }

  /// Emit XHTML style void elements.
  #[must_use]
  pub const fn xhtml_out(mut self, enabled: bool) -> Self {
    self.options.xhtml_out = enabled;
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
