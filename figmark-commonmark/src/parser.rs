//! Lowering of the comrak AST into the flat token stream.
//!
//! comrak does the actual markdown parsing. This module walks the resulting
//! AST once and emits markdown-it style tokens: block structure as
//! opening/closing pairs, and one `inline` token per text block carrying the
//! resolved inline children. Nodes without a token representation (tables,
//! task items, ...) are rendered by comrak itself and carried
//! through as raw HTML tokens.
use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeValue},
  options::Options,
  parse_document,
};
use log::{trace, warn};

use crate::token::{COMRAK_FALLBACK, Nesting, Token, kind};

/// Parse `markdown` with comrak and lower it into block tokens.
#[must_use]
pub fn parse_tokens(markdown: &str, options: &Options<'_>) -> Vec<Token> {
  let arena = Arena::new();
  let root = parse_document(&arena, markdown, options);

  let mut lowering = Lowering {
    options,
    tokens: Vec::new(),
  };
  lowering.blocks(root, false);
  lowering.tokens
}

struct Lowering<'o, 'c> {
  options: &'o Options<'c>,
  tokens:  Vec<Token>,
}

impl Lowering<'_, '_> {
  /// Lower all block children of `node`. `tight` marks paragraphs of tight
  /// list items as hidden.
  fn blocks<'a>(&mut self, node: &'a AstNode<'a>, tight: bool) {
    for child in node.children() {
      self.block(child, tight);
    }
  }

  fn block<'a>(&mut self, node: &'a AstNode<'a>, tight: bool) {
    match &node.data.borrow().value {
      NodeValue::Document => self.blocks(node, tight),

      NodeValue::Paragraph => {
        let mut open =
          Token::block(kind::PARAGRAPH_OPEN, "p", Nesting::Opening);
        open.hidden = tight;
        let mut close =
          Token::block(kind::PARAGRAPH_CLOSE, "p", Nesting::Closing);
        close.hidden = tight;

        let inline = self.inline_block(node);
        self.tokens.push(open);
        self.tokens.push(inline);
        self.tokens.push(close);
      },

      NodeValue::Heading(heading) => {
        let tag = format!("h{}", heading.level);
        let markup = "#".repeat(usize::from(heading.level));

        let mut open = Token::block(kind::HEADING_OPEN, &tag, Nesting::Opening);
        open.markup.clone_from(&markup);
        let mut close =
          Token::block(kind::HEADING_CLOSE, &tag, Nesting::Closing);
        close.markup = markup;

        let inline = self.inline_block(node);
        self.tokens.push(open);
        self.tokens.push(inline);
        self.tokens.push(close);
      },

      NodeValue::CodeBlock(code) => {
        let (token_kind, info) = if code.fenced {
          (kind::FENCE, code.info.to_string())
        } else {
          (kind::CODE_BLOCK, String::new())
        };
        let mut token = Token::block(token_kind, "code", Nesting::SelfClosing);
        token.info = info;
        token.content = code.literal.to_string();
        self.tokens.push(token);
      },

      NodeValue::BlockQuote => {
        self.tokens.push(Token::block(
          kind::BLOCKQUOTE_OPEN,
          "blockquote",
          Nesting::Opening,
        ));
        self.blocks(node, false);
        self.tokens.push(Token::block(
          kind::BLOCKQUOTE_CLOSE,
          "blockquote",
          Nesting::Closing,
        ));
      },

      NodeValue::List(list) => {
        let (open_kind, close_kind, tag) = match list.list_type {
          ListType::Bullet => {
            (kind::BULLET_LIST_OPEN, kind::BULLET_LIST_CLOSE, "ul")
          },
          ListType::Ordered => {
            (kind::ORDERED_LIST_OPEN, kind::ORDERED_LIST_CLOSE, "ol")
          },
        };

        let mut open = Token::block(open_kind, tag, Nesting::Opening);
        if list.list_type == ListType::Ordered && list.start != 1 {
          open.attr_push("start", list.start.to_string());
        }
        self.tokens.push(open);
        self.blocks(node, list.tight);
        self.tokens.push(Token::block(close_kind, tag, Nesting::Closing));
      },

      NodeValue::Item(_) => {
        self.tokens.push(Token::block(
          kind::LIST_ITEM_OPEN,
          "li",
          Nesting::Opening,
        ));
        self.blocks(node, tight);
        self.tokens.push(Token::block(
          kind::LIST_ITEM_CLOSE,
          "li",
          Nesting::Closing,
        ));
      },

      NodeValue::TaskItem(task) => {
        self.tokens.push(Token::block(
          kind::LIST_ITEM_OPEN,
          "li",
          Nesting::Opening,
        ));
        let start = self.tokens.len();
        self.blocks(node, tight);
        self.insert_checkbox(start, task.symbol.is_some());
        self.tokens.push(Token::block(
          kind::LIST_ITEM_CLOSE,
          "li",
          Nesting::Closing,
        ));
      },

      NodeValue::ThematicBreak => {
        self
          .tokens
          .push(Token::block(kind::HR, "hr", Nesting::SelfClosing));
      },

      NodeValue::HtmlBlock(html) => {
        let mut token = Token::block(kind::HTML_BLOCK, "", Nesting::SelfClosing);
        token.content = html.literal.to_string();
        self.tokens.push(token);
      },

      _ => {
        if let Some(html) = self.render_with_comrak(node) {
          let mut token =
            Token::block(kind::HTML_BLOCK, "", Nesting::SelfClosing);
          token.content = html;
          token.info = COMRAK_FALLBACK.to_string();
          self.tokens.push(token);
        }
      },
    }
  }

  /// Put the checkbox of a task item at the front of its first paragraph,
  /// or in an inline token of its own when the item does not start with one.
  fn insert_checkbox(&mut self, start: usize, checked: bool) {
    let mut checkbox = Token::new(kind::TASK_CHECKBOX, "input", Nesting::SelfClosing);
    checkbox.attr_push("type", "checkbox");
    if checked {
      checkbox.attr_push("checked", "");
    }
    checkbox.attr_push("disabled", "");

    let leads_paragraph = self
      .tokens
      .get(start)
      .is_some_and(|token| token.is(kind::PARAGRAPH_OPEN));
    match self.tokens.get_mut(start + 1) {
      Some(inline) if leads_paragraph && inline.is(kind::INLINE) => {
        let mut children = inline.children.take().unwrap_or_default();
        children.splice(0..0, [checkbox, Token::text(" ")]);
        *inline = Token::inline(children);
      },
      _ => self.tokens.insert(start, Token::inline(vec![checkbox])),
    }
  }

  /// Build the `inline` token for a paragraph or heading.
  fn inline_block<'a>(&self, node: &'a AstNode<'a>) -> Token {
    let mut children = Vec::new();
    self.inlines(node, &mut children);
    Token::inline(children)
  }

  fn inlines<'a>(&self, node: &'a AstNode<'a>, out: &mut Vec<Token>) {
    for child in node.children() {
      self.inline(child, out);
    }
  }

  fn inline<'a>(&self, node: &'a AstNode<'a>, out: &mut Vec<Token>) {
    match &node.data.borrow().value {
      NodeValue::Text(text) => out.push(Token::text(text.to_string())),

      NodeValue::SoftBreak => {
        out.push(Token::new(kind::SOFTBREAK, "br", Nesting::SelfClosing));
      },

      NodeValue::LineBreak => {
        out.push(Token::new(kind::HARDBREAK, "br", Nesting::SelfClosing));
      },

      NodeValue::Code(code) => {
        let mut token =
          Token::new(kind::CODE_INLINE, "code", Nesting::SelfClosing);
        token.content = code.literal.to_string();
        token.markup = "`".to_string();
        out.push(token);
      },

      NodeValue::Emph => {
        self.wrapped(node, out, kind::EM_OPEN, kind::EM_CLOSE, "em");
      },
      NodeValue::Strong => {
        self.wrapped(node, out, kind::STRONG_OPEN, kind::STRONG_CLOSE, "strong");
      },
      NodeValue::Strikethrough => {
        self.wrapped(node, out, kind::S_OPEN, kind::S_CLOSE, "s");
      },

      NodeValue::Link(link) => {
        let mut open = Token::new(kind::LINK_OPEN, "a", Nesting::Opening);
        open.attr_push("href", normalize_url(&link.url));
        if !link.title.is_empty() {
          open.attr_push("title", link.title.clone());
        }
        out.push(open);
        self.inlines(node, out);
        out.push(Token::new(kind::LINK_CLOSE, "a", Nesting::Closing));
      },

      NodeValue::Image(link) => {
        let mut alt = Vec::new();
        self.inlines(node, &mut alt);

        let mut image = Token::new(kind::IMAGE, "img", Nesting::SelfClosing);
        image.children = Some(alt);
        let alt_text = image.children_text();
        image.attr_push("src", normalize_url(&link.url));
        image.attr_push("alt", alt_text);
        if !link.title.is_empty() {
          image.attr_push("title", link.title.clone());
        }
        out.push(image);
      },

      NodeValue::HtmlInline(html) => {
        let mut token =
          Token::new(kind::HTML_INLINE, "", Nesting::SelfClosing);
        token.content = html.to_string();
        out.push(token);
      },

      NodeValue::Escaped => self.inlines(node, out),

      _ => {
        if let Some(html) = self.render_with_comrak(node) {
          let mut token =
            Token::new(kind::HTML_INLINE, "", Nesting::SelfClosing);
          token.content = html;
          token.info = COMRAK_FALLBACK.to_string();
          out.push(token);
        }
      },
    }
  }

  fn wrapped<'a>(
    &self,
    node: &'a AstNode<'a>,
    out: &mut Vec<Token>,
    open: &str,
    close: &str,
    tag: &str,
  ) {
    out.push(Token::new(open, tag, Nesting::Opening));
    self.inlines(node, out);
    out.push(Token::new(close, tag, Nesting::Closing));
  }

  /// Render a node the token model does not cover with comrak's own HTML
  /// formatter.
  fn render_with_comrak<'a>(&self, node: &'a AstNode<'a>) -> Option<String> {
    trace!("Falling back to comrak rendering for an unsupported node");
    let mut html = String::new();
    match comrak::format_html(node, self.options, &mut html) {
      Ok(()) => Some(html),
      Err(e) => {
        warn!("Failed to render unsupported node, dropping it: {e}");
        None
      },
    }
  }
}

/// Percent-encode a link destination the way comrak's HTML output does.
///
/// The result is left unescaped for HTML; the renderer escapes attributes.
fn normalize_url(url: &str) -> String {
  let mut encoded = String::with_capacity(url.len());
  match comrak::html::escape_href(&mut encoded, url, false) {
    Ok(()) => html_escape::decode_html_entities(&encoded).into_owned(),
    Err(e) => {
      warn!("Failed to normalize URL {url:?}: {e}");
      url.to_string()
    },
  }
}
