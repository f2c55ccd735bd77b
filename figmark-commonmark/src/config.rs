//! File-based configuration for the processor and the figure rule.
//!
//! ```toml
//! gfm = true
//!
//! [figure]
//! image_link = true
//! skip_no_caption = false
//! ```
//!
//! Unknown keys are rejected when the file is loaded.
use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  figure::FigureOptions,
  processor::MarkdownOptions,
};

/// Top-level configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Enable GitHub Flavored Markdown extensions
  pub gfm: bool,

  /// Emit XHTML style void elements
  pub xhtml_out: bool,

  /// Figure rule settings
  pub figure: FigureConfig,
}

/// The `[figure]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FigureConfig {
  /// Register the figure rule at all
  pub enable: bool,

  /// Wrap figure images in links to their source
  pub image_link: bool,

  /// Leave caption-less image paragraphs untouched
  pub skip_no_caption: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      gfm:       cfg!(feature = "gfm"),
      xhtml_out: false,
      figure:    FigureConfig::default(),
    }
  }
}

impl Default for FigureConfig {
  fn default() -> Self {
    Self {
      enable:          true,
      image_link:      false,
      skip_no_caption: false,
    }
  }
}

impl FigureConfig {
  /// Figure rule options, or `None` when the rule is disabled.
  #[must_use]
  pub const fn options(&self) -> Option<FigureOptions> {
    if self.enable {
      Some(FigureOptions {
        image_link:      self.image_link,
        skip_no_caption: self.skip_no_caption,
      })
    } else {
      None
    }
  }
}

impl Config {
  /// Load configuration from a TOML or JSON file, picked by extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has an unsupported
  /// extension, or does not parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .ok_or_else(|| {
        ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        ))
      })?;

    let content = fs::read_to_string(path)?;
    let config = match extension.as_str() {
      "toml" => Self::from_toml_str(&content)?,
      "json" => Self::from_json_str(&content)?,
      _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
  }

  /// Parse TOML configuration.
  ///
  /// # Errors
  ///
  /// Returns an error on malformed TOML or unknown keys.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(content)?)
  }

  /// Parse JSON configuration.
  ///
  /// # Errors
  ///
  /// Returns an error on malformed JSON or unknown keys.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Processor options described by this configuration.
  #[must_use]
  pub const fn markdown_options(&self) -> MarkdownOptions {
    MarkdownOptions {
      gfm:       self.gfm,
      figures:   self.figure.options(),
      xhtml_out: self.xhtml_out,
    }
  }
}
