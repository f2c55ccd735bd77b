//! Figure rule: turns image-led paragraphs into `<figure>` blocks.
//!
//! A paragraph qualifies when its inline content starts with an image. The
//! leading run of images (one per source line, or separated by whitespace)
//! becomes the body of the figure, and whatever inline content follows the
//! run becomes the `<figcaption>`. Caption tokens are moved as they are; the
//! rule never re-parses or re-renders them.
//!
//! ```text
//! paragraph_open              figure_open
//! inline [img, br, img,  ==>  inline [img]
//!         br, text...]        inline [img]
//! paragraph_close             figcaption_open
//!                             inline [text...]
//!                             figcaption_close
//!                             figure_close
//! ```
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
  processor::CoreRule,
  token::{Nesting, Token, kind},
};

/// Options accepted by the figure rule.
///
/// Both default to `false`: plain figures, and image-only paragraphs are still
/// turned into figures without a caption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigureOptions {
  /// Wrap every image of a figure in `<a href="{src}">`.
  pub image_link:      bool,
  /// Leave image-only paragraphs (no caption) untouched.
  pub skip_no_caption: bool,
}

/// Core rule rewriting qualifying paragraphs into figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FigureRule {
  options: FigureOptions,
}

/// A paragraph split into its leading images and the caption after them.
#[derive(Debug, PartialEq, Eq)]
struct Candidate {
  images:  Vec<Token>,
  caption: Vec<Token>,
}

impl FigureRule {
  #[must_use]
  pub const fn new(options: FigureOptions) -> Self {
    Self { options }
  }

  /// Rewrite every qualifying paragraph of `tokens` in place.
  ///
  /// Returns the number of figures produced.
  pub fn apply(&self, tokens: &mut Vec<Token>) -> usize {
    let figures: Vec<(usize, Vec<Token>)> = tokens
      .iter()
      .enumerate()
      .filter(|(_, token)| token.is(kind::PARAGRAPH_OPEN))
      .filter_map(|(idx, _)| Some((idx, self.rewrite(&tokens[idx..])?)))
      .collect();

    let count = figures.len();
    if count == 0 {
      return 0;
    }

    // Rebuild the stream in one pass, each figure replacing its
    // paragraph_open/inline/paragraph_close triad.
    let mut out = Vec::with_capacity(tokens.len() + 4 * count);
    let mut figures = figures.into_iter().peekable();
    let mut skip = 0;
    for (idx, token) in std::mem::take(tokens).into_iter().enumerate() {
      if skip > 0 {
        skip -= 1;
      } else if let Some((_, figure)) = figures.next_if(|(at, _)| *at == idx) {
        out.extend(figure);
        skip = 2;
      } else {
        out.push(token);
      }
    }

    *tokens = out;
    count
  }

  /// Build the figure tokens for the paragraph starting at `tokens[0]`, or
  /// `None` when the paragraph is left alone.
  fn rewrite(&self, tokens: &[Token]) -> Option<Vec<Token>> {
    let [_, inline, close, ..] = tokens else {
      return None;
    };
    if !inline.is(kind::INLINE) || !close.is(kind::PARAGRAPH_CLOSE) {
      return None;
    }

    let Candidate { images, caption } =
      split_candidate(inline.children.as_deref()?)?;

    if caption.is_empty() && self.options.skip_no_caption {
      trace!("Skipping caption-less figure with {} image(s)", images.len());
      return None;
    }

    debug!(
      "Rewriting paragraph into figure: {} image(s), caption: {}",
      images.len(),
      !caption.is_empty()
    );

    let mut out = Vec::with_capacity(images.len() + 5);
    out.push(Token::block(kind::FIGURE_OPEN, "figure", Nesting::Opening));
    out.extend(images.into_iter().map(|image| self.figure_image(image)));

    if !caption.is_empty() {
      out.push(Token::block(
        kind::FIGCAPTION_OPEN,
        "figcaption",
        Nesting::Opening,
      ));
      out.push(Token::inline(caption));
      out.push(Token::block(
        kind::FIGCAPTION_CLOSE,
        "figcaption",
        Nesting::Closing,
      ));
    }

    out.push(Token::block(kind::FIGURE_CLOSE, "figure", Nesting::Closing));
    Some(out)
  }

  /// Wrap a single image in its own `inline` token, linking it to its source
  /// when `image_link` is set and the source is known.
  fn figure_image(&self, image: Token) -> Token {
    let href = image
      .attr_get("src")
      .filter(|src| !src.is_empty())
      .map(str::to_string);

    match href {
      Some(href) if self.options.image_link => {
        let mut link_open = Token::new(kind::LINK_OPEN, "a", Nesting::Opening);
        link_open.attr_push("href", href);
        let link_close = Token::new(kind::LINK_CLOSE, "a", Nesting::Closing);
        Token::inline(vec![link_open, image, link_close])
      },
      _ => Token::inline(vec![image]),
    }
  }
}

impl CoreRule for FigureRule {
  fn name(&self) -> &'static str {
    "figure"
  }

  fn run(&self, tokens: &mut Vec<Token>) {
    self.apply(tokens);
  }
}

/// Split inline children into the leading image run and the caption.
///
/// Returns `None` unless the very first child is an image.
fn split_candidate(children: &[Token]) -> Option<Candidate> {
  if !children.first()?.is_image() {
    return None;
  }

  let mut images = Vec::new();
  let mut run_end = 0;
  for (idx, child) in children.iter().enumerate() {
    if child.is_image() {
      images.push(child.clone());
      run_end = idx + 1;
    } else if !(child.is_break() || child.is_blank_text()) {
      break;
    }
  }

  // One line break separates the last image from the caption.
  let mut rest = skip_blank(&children[run_end..]);
  if rest.first().is_some_and(Token::is_break) {
    rest = skip_blank(&rest[1..]);
  }

  let mut caption = rest.to_vec();
  if caption
    .iter()
    .all(|token| token.is_break() || token.is_blank_text())
  {
    caption.clear();
  } else if let Some(first) = caption.first_mut() {
    if first.is(kind::TEXT) {
      first.content = first.content.trim_start().to_string();
    }
  }

  Some(Candidate { images, caption })
}

fn skip_blank(tokens: &[Token]) -> &[Token] {
  let start = tokens
    .iter()
    .position(|token| !token.is_blank_text())
    .unwrap_or(tokens.len());
  &tokens[start..]
}
