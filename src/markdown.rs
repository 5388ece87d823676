use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TEXT: Color = Color::Rgb(226, 231, 238);
const MUTED: Color = Color::Rgb(119, 131, 149);
const ACCENT_PURPLE: Color = Color::Rgb(212, 171, 255);
const ACCENT_BLUE: Color = Color::Rgb(121, 184, 255);
const ACCENT_CYAN: Color = Color::Rgb(180, 223, 164);
const ACCENT_GREEN: Color = Color::Rgb(129, 199, 132);
const ACCENT_AMBER: Color = Color::Rgb(230, 180, 90);
const CODE_BG: Color = Color::Rgb(20, 26, 34);

pub const IMAGE_MARKER: &str = "▣ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub alt: String,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct RenderedMarkdown {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<String>,
    pub images: Vec<ImageRef>,
}

/// Renders `input` into terminal lines for a container `width` columns wide.
///
/// Text lines are left for the caller's wrapping widget, but image elements
/// are laid out here and are always cut down to fit the container. Raw HTML
/// is shown as literal text and never interpreted.
pub fn render(input: &str, width: u16) -> RenderedMarkdown {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(input, options);

    let mut state = RenderState::new(width);
    for event in parser {
        state.handle(event);
    }

    let links = std::mem::take(&mut state.links);
    let images = std::mem::take(&mut state.images);
    let lines = state.finish();
    RenderedMarkdown {
        lines,
        links,
        images,
    }
}

/// Longest body prefix, in characters, an excerpt is built from.
pub const EXCERPT_SOURCE_CHARS: usize = 300;

/// Flattens the start of a markdown body into one line of plain text for list
/// rows. Formatting is dropped, images collapse to their alt text and
/// whitespace runs become single spaces.
pub fn excerpt(input: &str) -> String {
    let source = match input.char_indices().nth(EXCERPT_SOURCE_CHARS) {
        Some((index, _)) => &input[..index],
        None => input,
    };
    let mut words = String::new();
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES) {
        let piece = match event {
            Event::Text(text) | Event::Code(text) => text,
            Event::Html(html) | Event::InlineHtml(html) => html,
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell
                | TagEnd::Image,
            ) => " ".into(),
            _ => continue,
        };
        words.push_str(&piece);
    }
    let mut flattened = words.split_whitespace().collect::<Vec<&str>>().join(" ");
    if source.len() < input.len() {
        flattened.push_str("...");
    }
    flattened
}

struct PendingImage {
    url: String,
    alt: String,
}

struct RenderState {
    width: usize,
    lines: Vec<Vec<Span<'static>>>,
    style_stack: Vec<Style>,
    links: Vec<String>,
    images: Vec<ImageRef>,
    active_link: Option<usize>,
    active_image: Option<PendingImage>,
    list_depth: usize,
    blockquote_depth: usize,
}

impl RenderState {
    fn new(width: u16) -> Self {
        Self {
            width: usize::from(width.max(1)),
            lines: vec![Vec::new()],
            style_stack: vec![Style::default()],
            links: Vec::new(),
            images: Vec::new(),
            active_link: None,
            active_image: None,
            list_depth: 0,
            blockquote_depth: 0,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        if let Some(image) = self.active_image.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    image.alt.push_str(text.as_ref());
                    return;
                }
                Event::End(TagEnd::Image) => {
                    self.finish_image();
                    return;
                }
                Event::End(_) | Event::Start(_) => {}
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(text.as_ref()),
            Event::Code(text) => {
                let style = Style::default().fg(ACCENT_CYAN).bg(CODE_BG);
                self.push_span(Span::styled(text.into_string(), style));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_span(Span::styled(
                    html.trim_end_matches('\n').to_string(),
                    Style::default().fg(MUTED),
                ));
            }
            Event::SoftBreak | Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.new_line();
                self.push_span(Span::styled(
                    "─".repeat(self.width.min(40)),
                    Style::default().fg(MUTED),
                ));
                self.new_line();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker);
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.ensure_blank_line();
                let style = heading_style(level);
                self.style_stack.push(style);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::BlockQuote(_) => {
                self.blockquote_depth += 1;
                self.new_line();
            }
            Tag::List(_) => {
                self.list_depth += 1;
                self.new_line();
            }
            Tag::Item => {
                self.new_line();
                self.push_text(&format!(
                    "{}- ",
                    "  ".repeat(self.list_depth.saturating_sub(1))
                ));
            }
            Tag::CodeBlock(_) => {
                self.new_line();
                self.push_style(Style::default().fg(ACCENT_GREEN).bg(CODE_BG));
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                self.active_link = Some(self.links.len());
                self.push_style(
                    Style::default()
                        .fg(ACCENT_CYAN)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Image { dest_url, .. } => {
                self.active_image = Some(PendingImage {
                    url: dest_url.to_string(),
                    alt: String::new(),
                });
            }
            Tag::Paragraph => {
                self.ensure_blank_line();
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.pop_style();
                self.new_line();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.pop_style();
            }
            TagEnd::BlockQuote(_) => {
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.new_line();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.new_line();
            }
            TagEnd::CodeBlock => {
                self.pop_style();
                self.new_line();
            }
            TagEnd::Link => {
                self.pop_style();
                if let Some(index) = self.active_link.take() {
                    self.push_span(Span::styled(
                        format!("[{}]", index),
                        Style::default().fg(ACCENT_CYAN),
                    ));
                }
            }
            TagEnd::Paragraph => {
                self.new_line();
            }
            _ => {}
        }
    }

    fn finish_image(&mut self) {
        let Some(image) = self.active_image.take() else {
            return;
        };
        if !self.current_line_is_blank() {
            self.new_line();
        }
        let available = self.width.saturating_sub(self.current_line_width());
        for span in image_spans(&image.alt, &image.url, available) {
            self.push_span(span);
        }
        self.images.push(ImageRef {
            alt: image.alt,
            url: image.url,
        });
        self.new_line();
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        while self.lines.len() > 1 && self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }

        self.lines
            .into_iter()
            .map(Line::from)
            .collect::<Vec<Line<'static>>>()
    }

    fn ensure_blank_line(&mut self) {
        if !self.current_line_is_blank() {
            self.new_line();
        }
    }

    fn current_line_is_blank(&self) -> bool {
        self.lines.last().is_none_or(|line| {
            line.iter()
                .all(|span| span.content.trim_start_matches(['|', ' ']).is_empty())
        })
    }

    fn current_line_width(&self) -> usize {
        self.lines.last().map_or(0, |line| {
            line.iter().map(|span| span.content.width()).sum::<usize>()
        })
    }

    fn new_line(&mut self) {
        self.lines.push(Vec::new());
        if self.blockquote_depth > 0 {
            self.push_span(Span::styled(
                "| ".repeat(self.blockquote_depth),
                Style::default().fg(MUTED),
            ));
        }
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.current_style().patch(style);
        self.style_stack.push(merged);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let style = self.current_style();
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                self.push_span(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                self.new_line();
            }
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.lines.last_mut() {
            line.push(span);
            return;
        }

        self.lines.push(vec![span]);
    }
}

/// Lays an image element out in at most `available` columns: marker, alt
/// text, then the URL, each shortened in that order of preference.
fn image_spans(alt: &str, url: &str, available: usize) -> Vec<Span<'static>> {
    let alt = if alt.trim().is_empty() { "image" } else { alt.trim() };
    let marker_style = Style::default().fg(ACCENT_AMBER).add_modifier(Modifier::BOLD);
    let url_style = Style::default().fg(MUTED).add_modifier(Modifier::UNDERLINED);

    let head = format!("{}{}", IMAGE_MARKER, alt);
    let head_width = head.width();
    if head_width >= available {
        return vec![Span::styled(truncate(&head, available), marker_style)];
    }

    let mut spans = vec![Span::styled(head, marker_style)];
    let room = available - head_width;
    // Two columns of padding before the URL, and at least a few characters of it.
    if room > 5 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(truncate(url, room - 2), url_style));
    }
    spans
}

/// Shortens `input` to at most `max` terminal columns, ending in `...` when
/// there is room for it.
fn truncate(input: &str, max: usize) -> String {
    if input.width() <= max {
        return input.to_string();
    }
    let (budget, suffix) = if max <= 3 { (max, "") } else { (max - 3, "...") };
    let mut clipped = String::new();
    let mut used = 0;
    for ch in input.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        clipped.push(ch);
    }
    clipped.push_str(suffix);
    clipped
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(ACCENT_PURPLE)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H2 => Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        HeadingLevel::H3 => Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
    }
}
