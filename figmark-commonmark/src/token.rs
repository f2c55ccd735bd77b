//! Flat token stream shared by the parser, the core rules and the renderer.
//!
//! The layout follows the markdown-it token model: block structure is a linear
//! sequence of opening, closing and self-closing tokens, and every block that
//! holds text owns a single `inline` token whose `children` carry the resolved
//! inline content (text, emphasis markers, links, images, breaks).
use serde::{Deserialize, Serialize};

/// Token kind names produced by the parser and the figure rule.
pub mod kind {
  pub const PARAGRAPH_OPEN: &str = "paragraph_open";
  pub const PARAGRAPH_CLOSE: &str = "paragraph_close";
  pub const HEADING_OPEN: &str = "heading_open";
  pub const HEADING_CLOSE: &str = "heading_close";
  pub const BLOCKQUOTE_OPEN: &str = "blockquote_open";
  pub const BLOCKQUOTE_CLOSE: &str = "blockquote_close";
  pub const BULLET_LIST_OPEN: &str = "bullet_list_open";
  pub const BULLET_LIST_CLOSE: &str = "bullet_list_close";
  pub const ORDERED_LIST_OPEN: &str = "ordered_list_open";
  pub const ORDERED_LIST_CLOSE: &str = "ordered_list_close";
  pub const LIST_ITEM_OPEN: &str = "list_item_open";
  pub const LIST_ITEM_CLOSE: &str = "list_item_close";
  pub const FENCE: &str = "fence";
  pub const CODE_BLOCK: &str = "code_block";
  pub const HR: &str = "hr";
  pub const HTML_BLOCK: &str = "html_block";

  pub const INLINE: &str = "inline";
  pub const TEXT: &str = "text";
  pub const SOFTBREAK: &str = "softbreak";
  pub const HARDBREAK: &str = "hardbreak";
  pub const CODE_INLINE: &str = "code_inline";
  pub const EM_OPEN: &str = "em_open";
  pub const EM_CLOSE: &str = "em_close";
  pub const STRONG_OPEN: &str = "strong_open";
  pub const STRONG_CLOSE: &str = "strong_close";
  pub const S_OPEN: &str = "s_open";
  pub const S_CLOSE: &str = "s_close";
  pub const LINK_OPEN: &str = "link_open";
  pub const LINK_CLOSE: &str = "link_close";
  pub const IMAGE: &str = "image";
  pub const HTML_INLINE: &str = "html_inline";
  pub const TASK_CHECKBOX: &str = "task_checkbox";

  pub const FIGURE_OPEN: &str = "figure_open";
  pub const FIGURE_CLOSE: &str = "figure_close";
  pub const FIGCAPTION_OPEN: &str = "figcaption_open";
  pub const FIGCAPTION_CLOSE: &str = "figcaption_close";
}

/// `info` of raw HTML tokens that comrak rendered for nodes without a token
/// form.
pub const COMRAK_FALLBACK: &str = "comrak";

/// Whether a token opens, closes, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nesting {
  Opening,
  SelfClosing,
  Closing,
}

/// A single unit of the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
  /// Token kind, e.g. `paragraph_open` or `image`.
  pub kind:     String,
  /// HTML tag emitted for this token, empty for tag-less kinds.
  pub tag:      String,
  pub nesting:  Nesting,
  /// Attributes in emission order.
  pub attrs:    Vec<(String, String)>,
  /// Text payload (`text`, `code_inline`, `fence`, raw HTML).
  pub content:  String,
  /// Fence info string.
  pub info:     String,
  /// Source markup, e.g. `**` or the fence marker.
  pub markup:   String,
  /// Block-level token.
  pub block:    bool,
  /// Rendered without its own tags (paragraphs of tight lists).
  pub hidden:   bool,
  /// Inline children of `inline` tokens, alt text of `image` tokens.
  pub children: Option<Vec<Self>>,
}

impl Token {
  #[must_use]
  pub fn new(kind: &str, tag: &str, nesting: Nesting) -> Self {
    Self {
      kind: kind.to_string(),
      tag: tag.to_string(),
      nesting,
      attrs: Vec::new(),
      content: String::new(),
      info: String::new(),
      markup: String::new(),
      block: false,
      hidden: false,
      children: None,
    }
  }

  /// Create a block-level token.
  #[must_use]
  pub fn block(kind: &str, tag: &str, nesting: Nesting) -> Self {
    let mut token = Self::new(kind, tag, nesting);
    token.block = true;
    token
  }

  /// Create a block-level `inline` token owning `children`.
  #[must_use]
  pub fn inline(children: Vec<Self>) -> Self {
    let mut token = Self::block(kind::INLINE, "", Nesting::SelfClosing);
    token.content = children
      .iter()
      .filter(|child| child.kind == kind::TEXT)
      .map(|child| child.content.as_str())
      .collect();
    token.children = Some(children);
    token
  }

  /// Create a `text` token.
  #[must_use]
  pub fn text(content: impl Into<String>) -> Self {
    let mut token = Self::new(kind::TEXT, "", Nesting::SelfClosing);
    token.content = content.into();
    token
  }

  /// Look up an attribute value by name.
  #[must_use]
  pub fn attr_get(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Append an attribute without checking for duplicates.
  pub fn attr_push(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.attrs.push((name.into(), value.into()));
  }

  #[must_use]
  pub fn is(&self, kind: &str) -> bool {
    self.kind == kind
  }

  #[must_use]
  pub fn is_image(&self) -> bool {
    self.is(kind::IMAGE)
  }

  /// Soft or hard line break.
  #[must_use]
  pub fn is_break(&self) -> bool {
    self.is(kind::SOFTBREAK) || self.is(kind::HARDBREAK)
  }

  /// A `text` token holding nothing but whitespace.
  #[must_use]
  pub fn is_blank_text(&self) -> bool {
    self.is(kind::TEXT) && self.content.trim().is_empty()
  }

  /// Concatenated text of the children, ignoring markup.
  ///
  /// Used for image `alt` attributes, the same way markdown-it flattens alt
  /// text.
  #[must_use]
  pub fn children_text(&self) -> String {
    let mut out = String::new();
    if let Some(children) = &self.children {
      collect_text(children, &mut out);
    }
    out
  }
}

fn collect_text(tokens: &[Token], out: &mut String) {
  for token in tokens {
    match token.kind.as_str() {
      kind::TEXT | kind::CODE_INLINE => out.push_str(&token.content),
      kind::SOFTBREAK | kind::HARDBREAK => out.push('\n'),
      kind::IMAGE => collect_text(token.children.as_deref().unwrap_or(&[]), out),
      _ => {},
    }
  }
}

/// Count tokens of `kind` anywhere in the stream, children included.
#[must_use]
pub fn count_kind(tokens: &[Token], kind: &str) -> usize {
  tokens
    .iter()
    .map(|token| {
      usize::from(token.kind == kind)
        + token
          .children
          .as_deref()
          .map_or(0, |children| count_kind(children, kind))
    })
    .sum()
}
