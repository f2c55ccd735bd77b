//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor`: the
//! parse, core rule and render pipeline, and the mapping of `MarkdownOptions`
//! onto comrak options.
use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use comrak::options::Options;
use log::trace;
use walkdir::WalkDir;

use super::types::{CoreRule, MarkdownOptions, MarkdownProcessor};
use crate::{
  figure::FigureRule,
  parser::parse_tokens,
  renderer::{HtmlRenderer, RenderOptions},
  token::{Token, count_kind, kind},
  types::MarkdownResult,
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// The figure rule is registered when `options.figures` is set.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let mut rules: Vec<Arc<dyn CoreRule>> = Vec::new();
    if let Some(figures) = options.figures {
      rules.push(Arc::new(FigureRule::new(figures)));
    }

    Self { options, rules }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Register an additional core rule. Rules run in registration order.
  #[must_use]
  pub fn use_rule<R: CoreRule + 'static>(mut self, rule: R) -> Self {
    self.rules.push(Arc::new(rule));
    self
  }

  /// Names of the registered core rules, in execution order.
  #[must_use]
  pub fn rule_names(&self) -> Vec<&'static str> {
    self.rules.iter().map(|rule| rule.name()).collect()
  }

  /// Check if a specific feature is enabled.
  #[must_use]
  pub const fn has_feature(&self, feature: ProcessorFeature) -> bool {
    match feature {
      ProcessorFeature::Gfm => self.options.gfm,
      ProcessorFeature::Figures => self.options.figures.is_some(),
      ProcessorFeature::ImageLink => {
        matches!(self.options.figures, Some(figures) if figures.image_link)
      },
      ProcessorFeature::SkipNoCaption => {
        matches!(self.options.figures, Some(figures) if figures.skip_no_caption)
      },
    }
  }

  /// Parse markdown into the final token stream, core rules applied.
  #[must_use]
  pub fn parse(&self, markdown: &str) -> Vec<Token> {
    let mut tokens = parse_tokens(markdown, &self.comrak_options());

    for rule in &self.rules {
      trace!("Running core rule '{}'", rule.name());
      rule.run(&mut tokens);
    }

    tokens
  }

  /// Serialize a token stream to HTML with the configured output options.
  #[must_use]
  pub fn render_tokens(&self, tokens: &[Token]) -> String {
    HtmlRenderer::new(RenderOptions {
      xhtml_out: self.options.xhtml_out,
    })
    .render(tokens)
  }

  /// Render Markdown to HTML.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let tokens = self.parse(markdown);

    MarkdownResult {
      html:    self.render_tokens(&tokens),
      figures: count_kind(&tokens, kind::FIGURE_OPEN),
      images:  count_kind(&tokens, kind::IMAGE),
    }
  }

  /// Build comrak options from `MarkdownOptions` and feature flags.
  fn comrak_options(&self) -> Options<'static> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.render.r#unsafe = true;
    options
  }
}

/// Collect all markdown files from the input directory.
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::new();

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
      files.push(path.to_owned());
    }
  }

  files.sort();
  trace!("Found {} markdown files to process", files.len());
  files
}

/// Features that can be queried on a processor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorFeature {
  /// GitHub Flavored Markdown support
  Gfm,
  /// Figure rule registered
  Figures,
  /// Figure images wrapped in links to their source
  ImageLink,
  /// Caption-less image paragraphs left untouched
  SkipNoCaption,
}
