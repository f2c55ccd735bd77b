use color_eyre::eyre::{Context, Result};
use figmark_commonmark::{Config, MarkdownOptions, MarkdownProcessor};
use log::{LevelFilter, debug, info};

mod cli;
mod render;

use cli::Cli;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so config loading can report what it does
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let config = match &cli.config_file {
    Some(path) => {
      Config::from_file(path).wrap_err_with(|| {
        format!("Failed to load configuration file: {}", path.display())
      })?
    },
    None => Config::default(),
  };

  let options = merge_with_cli(config.markdown_options(), &cli);
  debug!("Markdown options: {options:?}");
  let processor = MarkdownProcessor::new(options);
  info!("Core rules: {}", processor.rule_names().join(", "));

  if cli.reads_stdin() {
    render::render_stdin(&processor, cli.output.as_deref())
  } else if cli.input.is_dir() {
    let thread_count = cli.jobs.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
      .num_threads(thread_count)
      .build_global()?;

    let output_dir = cli.output.as_deref().unwrap_or(cli.input.as_path());
    render::render_directory(&processor, &cli.input, output_dir)
  } else {
    render::render_file(&processor, &cli.input, cli.output.as_deref())
  }
}

/// Apply command line flags on top of the options read from a config file.
fn merge_with_cli(mut options: MarkdownOptions, cli: &Cli) -> MarkdownOptions {
  options.gfm |= cli.gfm;
  options.xhtml_out |= cli.xhtml;

  if cli.no_figures {
    options.figures = None;
  } else if cli.image_link || cli.skip_no_caption {
    let figures = options.figures.get_or_insert_default();
    figures.image_link |= cli.image_link;
    figures.skip_no_caption |= cli.skip_no_caption;
  }

  options
}

#[cfg(test)]
mod tests {
  use clap::Parser;
  use figmark_commonmark::FigureOptions;

  use super::*;

  fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap_or_else(|e| e.exit())
  }

  #[test]
  fn test_flags_override_config() {
    let config = Config::from_toml_str("gfm = false\n[figure]\nenable = false\n")
      .unwrap_or_default();

    let options = merge_with_cli(
      config.markdown_options(),
      &cli(&["figmark", "a.md", "--gfm", "--image-link"]),
    );

    assert!(options.gfm);
    assert_eq!(
      options.figures,
      Some(FigureOptions {
        image_link:      true,
        skip_no_caption: false,
      })
    );
  }

  #[test]
  fn test_no_figures_disables_rule() {
    let options = merge_with_cli(
      MarkdownOptions::default(),
      &cli(&["figmark", "a.md", "--no-figures"]),
    );
    assert_eq!(options.figures, None);
  }

  #[test]
  fn test_config_values_survive_without_flags() {
    let config = Config::from_toml_str("[figure]\nskip_no_caption = true\n")
      .unwrap_or_default();
    let options =
      merge_with_cli(config.markdown_options(), &cli(&["figmark", "a.md"]));

    assert_eq!(
      options.figures,
      Some(FigureOptions {
        image_link:      false,
        skip_no_caption: true,
      })
    );
  }
}
