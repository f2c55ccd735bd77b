//! HTML serialization of the token stream.
//!
//! Rendering is generic: any token carrying a tag is emitted as `<tag attrs>`
//! or `</tag>`, so block kinds introduced by core rules (`figure`,
//! `figcaption`, ...) need no dedicated handling. Only leaf kinds with a
//! payload (text, code, raw HTML, breaks) have their own rules. Newlines
//! follow markdown-it: a block token ends its line unless it opens a block
//! whose content is inline or hidden, or is immediately closed again.
//!
//! HTML that comrak produced for nodes without a token form (tables, ...)
//! is always XHTML style; it is rewritten to plain void elements unless
//! `xhtml_out` is set. Raw HTML from the source is emitted untouched.
use std::borrow::Cow;

use crate::token::{COMRAK_FALLBACK, Nesting, Token, kind};

/// Output options for [`HtmlRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
  /// Emit void elements XHTML style (`<img ... />`, `<br />`).
  pub xhtml_out: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
  options: RenderOptions,
}

impl HtmlRenderer {
  #[must_use]
  pub const fn new(options: RenderOptions) -> Self {
    Self { options }
  }

  /// Render a block token stream to HTML.
  #[must_use]
  pub fn render(&self, tokens: &[Token]) -> String {
    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
      match token.kind.as_str() {
        kind::INLINE => {
          self.render_inline(token.children.as_deref().unwrap_or_default(), &mut out);
        },
        kind::FENCE => render_fence(token, &mut out),
        kind::CODE_BLOCK => {
          out.push_str("<pre><code>");
          out.push_str(&escape_text(&token.content));
          out.push_str("</code></pre>\n");
        },
        kind::HTML_BLOCK => out.push_str(&self.raw_html(token)),
        _ => self.render_token(tokens, idx, &mut out),
      }
    }
    out
  }

  /// Render the children of an `inline` token.
  pub fn render_inline(&self, tokens: &[Token], out: &mut String) {
    for (idx, token) in tokens.iter().enumerate() {
      match token.kind.as_str() {
        kind::TEXT => out.push_str(&escape_text(&token.content)),
        kind::SOFTBREAK => out.push('\n'),
        kind::HARDBREAK => {
          out.push_str(if self.options.xhtml_out {
            "<br />\n"
          } else {
            "<br>\n"
          });
        },
        kind::CODE_INLINE => {
          out.push_str("<code>");
          out.push_str(&escape_text(&token.content));
          out.push_str("</code>");
        },
        kind::HTML_INLINE => out.push_str(&self.raw_html(token)),
        _ => self.render_token(tokens, idx, out),
      }
    }
  }

  fn raw_html<'t>(&self, token: &'t Token) -> Cow<'t, str> {
    if token.info == COMRAK_FALLBACK && !self.options.xhtml_out {
      Cow::Owned(token.content.replace(" />", ">"))
    } else {
      Cow::Borrowed(&token.content)
    }
  }

  /// Default rendering of a tagged token.
  fn render_token(&self, tokens: &[Token], idx: usize, out: &mut String) {
    let token = &tokens[idx];
    if token.hidden || token.tag.is_empty() {
      return;
    }

    // A block following a hidden paragraph starts on its own line.
    if token.block
      && token.nesting != Nesting::Closing
      && idx > 0
      && tokens[idx - 1].hidden
    {
      out.push('\n');
    }

    out.push_str(if token.nesting == Nesting::Closing {
      "</"
    } else {
      "<"
    });
    out.push_str(&token.tag);

    for (name, value) in &token.attrs {
      out.push(' ');
      out.push_str(name);
      out.push_str("=\"");
      out.push_str(&html_escape::encode_double_quoted_attribute(value));
      out.push('"');
    }

    if token.nesting == Nesting::SelfClosing && self.options.xhtml_out {
      out.push_str(" /");
    }

    out.push('>');
    if token.block && needs_newline(tokens, idx) {
      out.push('\n');
    }
  }
}

fn needs_newline(tokens: &[Token], idx: usize) -> bool {
  let token = &tokens[idx];
  if token.nesting != Nesting::Opening {
    return true;
  }

  tokens.get(idx + 1).is_none_or(|next| {
    !(next.is(kind::INLINE)
      || next.hidden
      || (next.nesting == Nesting::Closing && next.tag == token.tag))
  })
}

fn render_fence(token: &Token, out: &mut String) {
  let lang = token.info.split_whitespace().next().unwrap_or_default();

  out.push_str("<pre><code");
  if !lang.is_empty() {
    out.push_str(" class=\"language-");
    out.push_str(&html_escape::encode_double_quoted_attribute(lang));
    out.push('"');
  }
  out.push('>');
  out.push_str(&escape_text(&token.content));
  out.push_str("</code></pre>\n");
}

fn escape_text(text: &str) -> Cow<'_, str> {
  html_escape::encode_text(text)
}
