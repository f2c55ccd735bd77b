//! Markdown processing module.
//!
//! - [`core`]: processor implementation and the parse/rule/render pipeline
//! - [`process`]: high-level processing functions with error recovery
//! - [`types`]: options, the processor struct and the `CoreRule` trait
pub mod core;
pub mod process;
pub mod types;

pub use self::core::{ProcessorFeature, collect_markdown_files};

pub use process::{
  ProcessorPreset,
  create_processor,
  process_batch,
  process_markdown_file,
  process_markdown_string,
  process_with_recovery,
};
pub use types::{
  CoreRule,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};
