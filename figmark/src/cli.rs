use std::path::{Path, PathBuf};

use clap::Parser;

/// Command line interface for figmark
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Render Markdown to HTML with semantic figures"
)]
pub struct Cli {
  /// Markdown file, directory of markdown files, or `-` for stdin
  pub input: PathBuf,

  /// Output file, or output directory when INPUT is a directory. Single
  /// inputs are written to stdout when omitted.
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Path to a configuration file (TOML or JSON)
  #[arg(short = 'c', long = "config-file")]
  pub config_file: Option<PathBuf>,

  /// Wrap every figure image in a link to its source
  #[arg(long = "image-link", action = clap::ArgAction::SetTrue)]
  pub image_link: bool,

  /// Leave image paragraphs without a caption as plain paragraphs
  #[arg(long = "skip-no-caption", action = clap::ArgAction::SetTrue)]
  pub skip_no_caption: bool,

  /// Disable the figure rule entirely
  #[arg(long = "no-figures", action = clap::ArgAction::SetTrue, conflicts_with_all = ["image_link", "skip_no_caption"])]
  pub no_figures: bool,

  /// Enable GitHub Flavored Markdown extensions
  #[arg(long, action = clap::ArgAction::SetTrue)]
  pub gfm: bool,

  /// Emit XHTML style void elements (`<img />`, `<br />`)
  #[arg(long, action = clap::ArgAction::SetTrue)]
  pub xhtml: bool,

  /// Number of threads to use when rendering a directory
  #[arg(short = 'j', long = "jobs")]
  pub jobs: Option<usize>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Whether input should be read from stdin.
  #[must_use]
  pub fn reads_stdin(&self) -> bool {
    self.input == Path::new("-")
  }
}
