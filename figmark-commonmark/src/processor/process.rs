//! Main processing functions for Markdown content.
use std::{
  fs,
  io::Error,
  path::{Path, PathBuf},
};

use log::error;

use super::types::{MarkdownOptions, MarkdownProcessor};
use crate::{figure::FigureOptions, types::MarkdownResult};

/// Process markdown content with error recovery.
///
/// Rendering is total over any input, but a panic in a third-party core rule
/// should not take down a whole batch. On panic an error placeholder is
/// returned instead.
///
/// # Arguments
///
/// * `processor` - The configured markdown processor
/// * `content` - The raw markdown content to process
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
) -> MarkdownResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown processing: {panic_err:?}");
      MarkdownResult {
        html:    "<div class=\"error\">Critical error processing markdown \
                  content</div>"
          .to_string(),
        figures: 0,
        images:  0,
      }
    },
  }
}

/// Process a batch of markdown files with consistent error handling.
///
/// # Arguments
/// * `processor` - The configured markdown processor
/// * `files` - Iterator of file paths to process
/// * `read_file_fn` - Function to read file content from path
///
/// # Returns
/// Vector of tuples containing (`file_path`, `processing_result`)
pub fn process_batch<I, F>(
  processor: &MarkdownProcessor,
  files: I,
  read_file_fn: F,
) -> Vec<(String, Result<MarkdownResult, String>)>
where
  I: Iterator<Item = PathBuf>,
  F: Fn(&Path) -> Result<String, Error>,
{
  files
    .map(|path| {
      let path_str = path.display().to_string();
      let result = match read_file_fn(&path) {
        Ok(content) => Ok(process_with_recovery(processor, &content)),
        Err(e) => Err(format!("Failed to read file: {e}")),
      };
      (path_str, result)
    })
    .collect()
}

/// Preset configurations for common use cases.
#[derive(Debug, Clone, Copy)]
pub enum ProcessorPreset {
  /// CommonMark without any core rules. Useful as a baseline.
  Plain,
  /// CommonMark with the figure rule in its default configuration
  Figures,
  /// All compiled-in extensions, with figure images linking to their source
  LinkedFigures,
}

/// Create a processor for one of the presets.
#[must_use]
pub fn create_processor(preset: ProcessorPreset) -> MarkdownProcessor {
  let options = match preset {
    ProcessorPreset::Plain => MarkdownOptions::plain(),
    ProcessorPreset::Figures => {
      MarkdownOptions {
        gfm:       false,
        figures:   Some(FigureOptions::default()),
        xhtml_out: false,
      }
    },
    ProcessorPreset::LinkedFigures => MarkdownOptions::with_all_features(),
  };

  MarkdownProcessor::new(options)
}

/// Process markdown content from a string with error recovery.
#[must_use]
pub fn process_markdown_string(
  content: &str,
  preset: ProcessorPreset,
) -> MarkdownResult {
  let processor = create_processor(preset);
  process_with_recovery(&processor, content)
}

/// Process markdown content from a file with error recovery.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn process_markdown_file(
  file_path: &Path,
  preset: ProcessorPreset,
) -> Result<MarkdownResult, String> {
  let content = fs::read_to_string(file_path).map_err(|e| {
    format!("Failed to read file {}: {}", file_path.display(), e)
  })?;

  let processor = create_processor(preset);
  Ok(process_with_recovery(&processor, &content))
}
