//! Markdown → ratatui `Text` renderer for assistant answers.
//!
//! Walks `pulldown_cmark` events and emits styled `Line`/`Span` values.
//! Covers what backend answers actually contain: headings, emphasis,
//! inline code, fenced code blocks (highlighted with syntect when the
//! language is known), lists, blockquotes, and links.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_PREFIX: &str = "  ";

/// Renders markdown into styled text, with `base_fg` as the body color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        renderer.event(event);
    }
    renderer.out
}

struct Renderer {
    out: Text<'static>,
    base_fg: Color,
    /// Inline style stack; nested emphasis composes via `patch`.
    styles: Vec<Style>,
    /// Per-line prefixes currently in force (blockquote bar, code indent).
    prefixes: Vec<Span<'static>>,
    /// List nesting: None = bulleted, Some(n) = numbered at n.
    lists: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_code_block: bool,
    pending_link: Option<String>,
    /// Whether the next block should be separated by a blank line.
    separate: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            out: Text::default(),
            base_fg,
            styles: vec![],
            prefixes: vec![],
            lists: vec![],
            highlighter: None,
            in_code_block: false,
            pending_link: None,
            separate: false,
        }
    }

    fn current_style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.current_style().patch(overlay));
    }

    fn new_line(&mut self) {
        let mut line = Line::default();
        for prefix in &self.prefixes {
            line.spans.push(prefix.clone());
        }
        self.out.lines.push(line);
    }

    fn append(&mut self, span: Span<'static>) {
        if self.out.lines.is_empty() {
            self.new_line();
        }
        self.out
            .lines
            .last_mut()
            .expect("just ensured a line exists")
            .push_span(span);
    }

    fn separator(&mut self) {
        if self.separate {
            self.out.lines.push(Line::default());
            self.separate = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.append(Span::styled(
                code.to_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.separator();
                self.out.lines.push(Line::from(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(Color::DarkGray),
                )));
                self.separate = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {} // HTML, footnotes, math
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.separator();
                self.new_line();
            }
            Tag::Heading { level, .. } => {
                self.separator();
                let style = heading_style(self.base_fg, level);
                self.new_line();
                self.append(Span::styled("» ".to_string(), style));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.separator();
                self.prefixes
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM));
            }
            Tag::CodeBlock(kind) => {
                self.separator();
                self.in_code_block = true;
                self.prefixes.push(Span::raw(CODE_PREFIX));
                if let CodeBlockKind::Fenced(lang) = &kind
                    && !lang.is_empty()
                    && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang)
                {
                    let theme = &THEME_SET.themes["base16-ocean.dark"];
                    self.highlighter = Some(HighlightLines::new(syntax, theme));
                }
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.separator();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.new_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.append(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { dest_url, .. } => {
                self.pending_link = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {} // Tables, images
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.separate = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.separate = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.styles.pop();
                self.separate = true;
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.highlighter = None;
                self.prefixes.pop();
                self.separate = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.separate = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.pending_link.take() {
                    self.append(Span::styled(
                        format!(" ({url})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // Ratatui renders tabs zero-width, expand them up front
        let text = cow.replace('\t', "    ");

        if self.in_code_block {
            // Take the highlighter out so highlight_line and new_line don't
            // fight over &mut self
            let mut hl = self.highlighter.take();
            for line in LinesWithEndings::from(&text) {
                self.new_line();
                match hl.as_mut() {
                    Some(hl) => {
                        let ranges = hl.highlight_line(line, &SYNTAX_SET).unwrap_or_default();
                        for (hl_style, fragment) in ranges {
                            let content = fragment.trim_end_matches('\n');
                            if content.is_empty() {
                                continue;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            self.append(Span::styled(
                                content.to_string(),
                                Style::default().fg(fg),
                            ));
                        }
                    }
                    None => {
                        let content = line.trim_end_matches('\n');
                        if !content.is_empty() {
                            self.append(Span::styled(
                                content.to_string(),
                                Style::default().fg(Color::White),
                            ));
                        }
                    }
                }
            }
            self.highlighter = hl;
            return;
        }

        let style = self.current_style();
        self.append(Span::styled(text, style));
    }
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("hello", Color::Blue);
        assert_eq!(line_text(&text.lines[0]), "hello");
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("a **bold** word", Color::Blue);
        let bold = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Findings", Color::Blue);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "Findings")
            .unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(span.style.fg, Some(Color::Blue));
    }

    #[test]
    fn list_items_get_markers() {
        let text = render("- one\n- two", Color::Blue);
        let rendered: Vec<String> = text.lines.iter().map(line_text).collect();
        assert!(rendered.iter().any(|l| l.contains("• one")));
        assert!(rendered.iter().any(|l| l.contains("• two")));
    }

    #[test]
    fn ordered_list_counts_up() {
        let text = render("1. first\n2. second", Color::Blue);
        let rendered: Vec<String> = text.lines.iter().map(line_text).collect();
        assert!(rendered.iter().any(|l| l.starts_with("1. ")));
        assert!(rendered.iter().any(|l| l.starts_with("2. ")));
    }

    #[test]
    fn code_block_lines_are_indented() {
        let text = render("```\nlet x = 1;\n```", Color::Blue);
        let rendered: Vec<String> = text.lines.iter().map(line_text).collect();
        assert!(
            rendered
                .iter()
                .any(|l| l.starts_with(CODE_PREFIX) && l.contains("let x = 1;")),
            "got {rendered:?}"
        );
    }

    #[test]
    fn inline_code_is_highlighted() {
        let text = render("call `send()` now", Color::Blue);
        let code = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "send()")
            .unwrap();
        assert_eq!(code.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn tabs_never_survive_rendering() {
        let text = render("```\n\tindented\n```", Color::Blue);
        assert!(
            !text
                .lines
                .iter()
                .any(|l| l.spans.iter().any(|s| s.content.contains('\t')))
        );
    }
}
