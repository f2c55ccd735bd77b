#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use figmark_commonmark::{
  FigureOptions,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};

const SINGLE_IMAGE_CAPTION: &str = "![Picture of Oscar.](/path/to/cat.jpg)
Awesome caption about **Oscar** the kitty.";

const MULTIPLE_IMAGES_CAPTION: &str = "![Picture of Oscar.](/path/to/cat1.jpg)
![Picture of Luna.](/path/to/cat2.jpg)
![Picture of Oreo.](/path/to/cat3.jpg)
Awesome captions about the **kitties**.";

const COMPLEX_CAPTION: &str = "![Image](image.png)
This is a **complex** caption with *italic*, [links](https://example.com), and `code` formatting.";

const NO_CAPTION: &str = "![Alt text](https://example.com/image.jpg)";

const MIXED_CONTENT: &str = r#"
# Title

Regular paragraph with some text.

- List item 1
- List item 2
- List item 3

![Image 1](img1.png)
Caption for image 1.

> This is a blockquote
> with multiple lines.

![Image 2](img2.png)
![Image 3](img3.png)
Shared caption.

```python
def hello():
    print("code block")
```

Regular paragraph.

![Image 4](img4.png)
Final caption.
"#;

const LARGE_SECTION: &str = "
# Introduction

Some introductory text here.

![First image](/img1.png)
Caption for the first image.

## Section 1

More content and discussion.

![Second image](/img2.png)
![Third image](/img3.png)
Multiple images with a shared caption.

### Subsection

Additional content here with **bold** and *italic* text.

![Fourth image](/img4.png)
Another figure with caption.

![Fifth image](/img5.png)
Yet another figure.

## Section 2

![Sixth image](/img6.png)
![Seventh image](/img7.png)
![Eighth image](/img8.png)
Three images sharing one caption.

Final paragraph of text.
";

fn render(markdown: &str) -> String {
  MarkdownProcessor::new(MarkdownOptions::default())
    .render(markdown)
    .html
}

fn render_with(options: FigureOptions, markdown: &str) -> String {
  MarkdownProcessor::new(MarkdownOptions {
    figures: Some(options),
    ..MarkdownOptions::default()
  })
  .render(markdown)
  .html
}

fn render_plain(markdown: &str) -> String {
  MarkdownProcessor::new(MarkdownOptions {
    gfm: MarkdownOptions::default().gfm,
    ..MarkdownOptions::plain()
  })
  .render(markdown)
  .html
}

#[test]
fn test_single_image_with_caption() {
  let html = render("![A](cat.jpg)\nCaption text.");
  assert_eq!(
    html,
    "<figure><img src=\"cat.jpg\" alt=\"A\"><figcaption>Caption \
     text.</figcaption>\n</figure>\n"
  );
}

#[test]
fn test_caption_keeps_inline_formatting() {
  let html = render(SINGLE_IMAGE_CAPTION);
  assert!(html.contains("<figure>"));
  assert!(html.contains(
    "<figcaption>Awesome caption about <strong>Oscar</strong> the \
     kitty.</figcaption>"
  ));
}

#[test]
fn test_multiple_images_share_one_caption() {
  let html = render(MULTIPLE_IMAGES_CAPTION);

  assert_eq!(html.matches("<figure>").count(), 1);
  assert_eq!(html.matches("<img").count(), 3);
  assert_eq!(html.matches("<figcaption>").count(), 1);
  assert!(html.starts_with(
    "<figure><img src=\"/path/to/cat1.jpg\" alt=\"Picture of Oscar.\"><img \
     src=\"/path/to/cat2.jpg\" alt=\"Picture of Luna.\"><img \
     src=\"/path/to/cat3.jpg\" alt=\"Picture of Oreo.\"><figcaption>"
  ));
}

#[test]
fn test_complex_caption_is_passed_through() {
  let html = render(COMPLEX_CAPTION);
  assert!(html.contains("<strong>complex</strong>"));
  assert!(html.contains("<em>italic</em>"));
  assert!(html.contains("<a href=\"https://example.com\">links</a>"));
  assert!(html.contains("<code>code</code>"));

  // The caption renders exactly like the same text as a paragraph of its own.
  let caption_source = COMPLEX_CAPTION
    .split_once('\n')
    .map(|(_, caption)| caption)
    .expect("caption line");
  let paragraph = render_plain(caption_source);
  let inner = paragraph
    .strip_prefix("<p>")
    .and_then(|rest| rest.strip_suffix("</p>\n"))
    .expect("plain paragraph");
  assert!(html.contains(&format!("<figcaption>{inner}</figcaption>")));
}

#[test]
fn test_image_without_caption_default() {
  let html = render("![Alt](x.jpg)");
  assert_eq!(html, "<figure><img src=\"x.jpg\" alt=\"Alt\"></figure>\n");
  assert!(!html.contains("<figcaption>"));

  assert!(render(NO_CAPTION).contains("<figure>"));
}

#[test]
fn test_skip_no_caption_keeps_paragraph() {
  let options = FigureOptions {
    skip_no_caption: true,
    ..Default::default()
  };

  let html = render_with(options, "![Alt](x.jpg)");
  assert_eq!(html, "<p><img src=\"x.jpg\" alt=\"Alt\"></p>\n");
  assert_eq!(html, render_plain("![Alt](x.jpg)"));
  assert!(!render_with(options, NO_CAPTION).contains("<figure>"));
}

#[test]
fn test_image_link_wraps_images() {
  let options = FigureOptions {
    image_link: true,
    ..Default::default()
  };

  assert_eq!(
    render_with(options, "![A](cat.jpg)\nCaption."),
    "<figure><a href=\"cat.jpg\"><img src=\"cat.jpg\" \
     alt=\"A\"></a><figcaption>Caption.</figcaption>\n</figure>\n"
  );
  assert!(
    render_with(options, SINGLE_IMAGE_CAPTION)
      .contains("<a href=\"/path/to/cat.jpg\">")
  );

  let html = render_with(options, MULTIPLE_IMAGES_CAPTION);
  for n in 1..=3 {
    assert!(html.contains(&format!(
      "<a href=\"/path/to/cat{n}.jpg\"><img src=\"/path/to/cat{n}.jpg\""
    )));
  }
}

#[test]
fn test_no_anchor_without_image_link() {
  let html = render(MULTIPLE_IMAGES_CAPTION);
  assert!(!html.contains("<a href"));
}

#[test]
fn test_both_options_enabled() {
  let options = MarkdownOptionsBuilder::new()
    .image_link(true)
    .skip_no_caption(true)
    .build();
  let processor = MarkdownProcessor::new(options);

  let html = processor.render(SINGLE_IMAGE_CAPTION).html;
  assert!(html.contains("<figure>"));
  assert!(html.contains("<a href=\"/path/to/cat.jpg\">"));

  let html = processor.render(NO_CAPTION).html;
  assert!(!html.contains("<figure>"));
  assert!(!html.contains("<a href"));
}

#[test]
fn test_image_link_without_source_omits_anchor() {
  let options = FigureOptions {
    image_link: true,
    ..Default::default()
  };
  let html = render_with(options, "![Nothing]()\nCaption");

  assert!(html.contains("<figure>"));
  assert!(!html.contains("<a"));
}

#[test]
fn test_text_before_image_is_untouched() {
  for markdown in [
    "See ![A](a.png) here.",
    "Intro text\n![A](a.png)\nCaption",
    "[![A](a.png)](https://example.com)\nCaption",
    "**Bold** ![A](a.png)",
  ] {
    assert_eq!(render(markdown), render_plain(markdown), "{markdown}");
  }
}

#[test]
fn test_captions_do_not_cross_paragraphs() {
  let html = render("![A](a.png)\n\nNot a caption.");
  assert_eq!(
    html,
    "<figure><img src=\"a.png\" alt=\"A\"></figure>\n<p>Not a \
     caption.</p>\n"
  );
}

#[test]
fn test_mixed_content_document() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let result = processor.render(MIXED_CONTENT);
  let plain = render_plain(MIXED_CONTENT);

  assert_eq!(result.figures, 3);
  assert_eq!(result.html.matches("<figure>").count(), 3);

  for untouched in [
    "<h1>Title</h1>\n<p>Regular paragraph with some text.</p>\n",
    "<ul>\n<li>List item 1</li>\n<li>List item 2</li>\n<li>List item \
     3</li>\n</ul>\n",
    "<blockquote>\n<p>This is a blockquote\nwith multiple \
     lines.</p>\n</blockquote>\n",
    "<pre><code class=\"language-python\">def hello():\n",
    "<p>Regular paragraph.</p>\n",
  ] {
    assert!(result.html.contains(untouched), "missing {untouched:?}");
    assert!(plain.contains(untouched), "baseline missing {untouched:?}");
  }
}

#[test]
fn test_large_document_with_many_figures() {
  let document = LARGE_SECTION.repeat(10);

  let html = render(&document);
  assert_eq!(html.matches("<figure>").count(), 50);
  assert_eq!(html.matches("<figcaption>").count(), 50);

  let baseline = render_plain(&document);
  assert!(!baseline.contains("<figure>"));
}

#[test]
fn test_image_count_is_conserved() {
  let document = LARGE_SECTION.repeat(3);
  for markdown in [
    document.as_str(),
    MIXED_CONTENT,
    MULTIPLE_IMAGES_CAPTION,
    "![a](a.png) ![b](b.png) text ![c](c.png)",
    "- ![a](a.png)\n- text ![b](b.png)\n",
  ] {
    let plain = render_plain(markdown).matches("<img").count();
    for options in [
      FigureOptions::default(),
      FigureOptions {
        image_link:      true,
        skip_no_caption: true,
      },
    ] {
      assert_eq!(render_with(options, markdown).matches("<img").count(), plain);
    }
  }
}

#[test]
fn test_multiple_images_scaling() {
  for num_images in [1, 5, 10, 20, 50] {
    let images = (0..num_images)
      .map(|i| format!("![Image {i}](/img{i}.png)"))
      .collect::<Vec<_>>()
      .join("\n");
    let markdown = format!("{images}\nShared caption for all images.");

    let html = render(&markdown);
    assert_eq!(html.matches("<img").count(), num_images);
    assert_eq!(html.matches("<figure>").count(), 1);
    assert_eq!(html.matches("<figcaption>").count(), 1);
  }
}

#[test]
fn test_multiple_figures_scaling() {
  for num_figures in [1, 10, 50, 100] {
    let markdown = (0..num_figures)
      .map(|i| format!("![Image {i}](/img{i}.png)\nCaption for image {i}.\n"))
      .collect::<Vec<_>>()
      .join("\n");

    let html = render(&markdown);
    assert_eq!(html.matches("<figure>").count(), num_figures);
  }
}

#[test]
fn test_figure_inside_tight_list_item() {
  let html = render("- ![a](a.png)\n  caption\n- plain\n");
  assert_eq!(
    html,
    "<ul>\n<li>\n<figure><img src=\"a.png\" \
     alt=\"a\"><figcaption>caption</figcaption>\n</figure>\n</li>\n<li>plain</\
     li>\n</ul>\n"
  );
}

#[test]
fn test_figure_inside_blockquote() {
  let html = render("> ![q](q.png)\n> Quoted caption\n");
  assert_eq!(
    html,
    "<blockquote>\n<figure><img src=\"q.png\" alt=\"q\"><figcaption>Quoted \
     caption</figcaption>\n</figure>\n</blockquote>\n"
  );
}

#[test]
fn test_hard_break_separated_images() {
  let html = render("![a](a.png)\\\n![b](b.png)\\\nCaption");
  assert_eq!(html.matches("<figure>").count(), 1);
  assert_eq!(html.matches("<img").count(), 2);
  assert!(html.contains("<figcaption>Caption</figcaption>"));
  assert!(!html.contains("<br"));
}

#[test]
fn test_xhtml_output() {
  let processor =
    MarkdownProcessor::new(MarkdownOptionsBuilder::new().xhtml_out(true).build());
  let html = processor.render("![A](cat.jpg \"Oscar\")\nCaption.").html;
  assert!(
    html.contains("<img src=\"cat.jpg\" alt=\"A\" title=\"Oscar\" />")
  );
}

#[test]
fn test_figure_inside_task_item() {
  let result = MarkdownProcessor::new(MarkdownOptions::default())
    .render("- [ ] task\n\n  ![a](a.png)\n  Caption\n");

  assert_eq!(result.figures, 1);
  assert_eq!(result.images, 1);
  assert!(
    result
      .html
      .contains("<p><input type=\"checkbox\" disabled=\"\"> task</p>\n")
  );
  assert!(result.html.contains(
    "<figure><img src=\"a.png\" \
     alt=\"a\"><figcaption>Caption</figcaption>\n</figure>\n</li>"
  ));
}

#[test]
fn test_checked_task_items_render_inline() {
  let html = render("- [x] done\n- [ ] todo\n");
  assert_eq!(
    html,
    "<ul>\n<li><input type=\"checkbox\" checked=\"\" disabled=\"\"> \
     done</li>\n<li><input type=\"checkbox\" disabled=\"\"> todo</li>\n</ul>\n"
  );
}

#[test]
fn test_image_sources_are_percent_encoded() {
  let options = FigureOptions {
    image_link: true,
    ..Default::default()
  };

  let html = render_with(options, "![a](<my cat.jpg>)\nCaption.");
  assert!(html.contains(
    "<a href=\"my%20cat.jpg\"><img src=\"my%20cat.jpg\" alt=\"a\"></a>"
  ));
  assert!(!html.contains("my cat.jpg"));
}

#[test]
fn test_fallback_html_uses_plain_void_elements() {
  let markdown = "| ![a](a.png) |\n|---|\n| b |\n";

  let html = render(markdown);
  assert!(html.contains("<table>"));
  assert!(html.contains("<img src=\"a.png\" alt=\"a\">"));
  assert!(!html.contains(" />"));

  let xhtml =
    MarkdownProcessor::new(MarkdownOptionsBuilder::new().xhtml_out(true).build())
      .render(markdown)
      .html;
  assert!(xhtml.contains("<img src=\"a.png\" alt=\"a\" />"));
}
