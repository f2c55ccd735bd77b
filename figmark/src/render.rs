use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use figmark_commonmark::{
  MarkdownProcessor,
  collect_markdown_files,
  processor::process_with_recovery,
};
use log::{debug, info};
use rayon::prelude::*;

/// Write rendered HTML to `output`, or stdout when absent.
fn emit(html: &str, output: Option<&Path>) -> Result<()> {
  match output {
    Some(path) => {
      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
      }
      fs::write(path, html)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
    },
    None => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(html.as_bytes())?;
      stdout.flush()?;
      Ok(())
    },
  }
}

pub fn render_stdin(
  processor: &MarkdownProcessor,
  output: Option<&Path>,
) -> Result<()> {
  let content = io::read_to_string(io::stdin())
    .wrap_err("Failed to read markdown from stdin")?;
  let result = process_with_recovery(processor, &content);
  debug!("stdin: {} figures, {} images", result.figures, result.images);
  emit(&result.html, output)
}

pub fn render_file(
  processor: &MarkdownProcessor,
  input: &Path,
  output: Option<&Path>,
) -> Result<()> {
  let content = fs::read_to_string(input)
    .wrap_err_with(|| format!("Failed to read {}", input.display()))?;
  let result = process_with_recovery(processor, &content);
  info!(
    "Rendered {} ({} figures, {} images)",
    input.display(),
    result.figures,
    result.images
  );
  emit(&result.html, output)
}

/// Where the HTML for `file` goes, mirroring its place under `input_dir`.
fn output_path_for(
  file: &Path,
  input_dir: &Path,
  output_dir: &Path,
) -> Result<PathBuf> {
  let Ok(rel_path) = file.strip_prefix(input_dir) else {
    bail!(
      "{} is not inside the input directory {}",
      file.display(),
      input_dir.display()
    );
  };

  let mut output_path = output_dir.join(rel_path);
  output_path.set_extension("html");
  Ok(output_path)
}

/// Render every markdown file below `input_dir` in parallel.
pub fn render_directory(
  processor: &MarkdownProcessor,
  input_dir: &Path,
  output_dir: &Path,
) -> Result<()> {
  info!("Input directory: {}", input_dir.display());
  let files = collect_markdown_files(input_dir);
  info!("Found {} markdown files", files.len());

  let figures = files
    .par_iter()
    .map(|file_path| {
      let content = fs::read_to_string(file_path)
        .wrap_err_with(|| format!("Failed to read {}", file_path.display()))?;
      let result = process_with_recovery(processor, &content);
      let output_path = output_path_for(file_path, input_dir, output_dir)?;

      debug!(
        "{} -> {} ({} figures)",
        file_path.display(),
        output_path.display(),
        result.figures
      );
      emit(&result.html, Some(&output_path))?;
      Ok(result.figures)
    })
    .collect::<Result<Vec<usize>>>()?;

  info!(
    "Wrote {} files to {} ({} figures)",
    files.len(),
    output_dir.display(),
    figures.iter().sum::<usize>()
  );
  Ok(())
}
