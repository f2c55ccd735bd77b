//! # figmark - semantic figures for CommonMark
//!
//! A Markdown processor built on `comrak` that turns standalone images into
//! `<figure>` elements. Paragraphs starting with one or more images become a
//! figure, and any text following the images in the same paragraph becomes
//! its `<figcaption>`.
//!
//! ## Quick Start
//!
//! ```rust
//! use figmark_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let result = processor.render("![A cat](cat.jpg)\nOscar, napping.");
//!
//! assert!(result.html.contains("<figcaption>Oscar, napping.</figcaption>"));
//! assert_eq!(result.figures, 1);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use figmark_commonmark::{MarkdownOptionsBuilder, MarkdownProcessor};
//!
//! let options = MarkdownOptionsBuilder::new()
//!   .image_link(true) // wrap every figure image in <a href="{src}">
//!   .skip_no_caption(true) // keep image-only paragraphs as they are
//!   .build();
//!
//! let processor = MarkdownProcessor::new(options);
//! ```
//!
//! ## Pipeline
//!
//! 1. comrak parses the document.
//! 2. The AST is lowered into a flat token stream ([`token`]).
//! 3. Registered [`CoreRule`]s rewrite the stream; the [`FigureRule`] is one
//!    of them.
//! 4. The stream is serialized to HTML ([`renderer`]).

pub mod config;
pub mod error;
pub mod figure;
pub mod parser;
pub mod processor;
pub mod renderer;
pub mod token;
mod types;

pub use crate::{
  config::{Config, FigureConfig},
  error::ConfigError,
  figure::{FigureOptions, FigureRule},
  processor::{
    CoreRule,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    ProcessorFeature,
    collect_markdown_files,
  },
  token::{Nesting, Token},
  types::MarkdownResult,
};
