use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::*;

pub(super) fn draw_composer(frame: &mut Frame<'_>, app: &mut App, area: Rect, theme: &Palette) {
    let composer = app.composer();
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 2,
    });
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let title_focused = composer.focus() == ComposerFocus::Title;
    let body_focused = composer.focus() == ComposerFocus::Body;
    let popup_open = composer.attach_prompt().is_some() || composer.notice().is_some();

    let title_block = panel_block_with_border("Title", focus_border(title_focused, theme), theme);
    let title_inner = title_block.inner(sections[0]);
    let (title_lines, title_cursor) = field_view(composer.title(), title_inner, theme);
    frame.render_widget(
        Paragraph::new(title_lines)
            .block(title_block)
            .scroll((title_cursor.scroll_y, title_cursor.scroll_x)),
        sections[0],
    );

    frame.render_widget(Paragraph::new(tabs_line(composer.tab(), theme)), sections[1]);

    let body_block = panel_block_with_border("Description", focus_border(body_focused, theme), theme);
    let body_inner = body_block.inner(sections[2]);
    let mut cursor = None;
    match composer.tab() {
        ComposerTab::Write => {
            let (body_lines, body_cursor) = field_view(composer.body(), body_inner, theme);
            let lines = if composer.body().text().is_empty() && !body_focused {
                vec![Line::from(Span::styled(
                    "Describe the issue. Markdown is supported.",
                    Style::default().fg(theme.muted),
                ))]
            } else {
                body_lines
            };
            frame.render_widget(
                Paragraph::new(lines)
                    .block(body_block)
                    .scroll((body_cursor.scroll_y, body_cursor.scroll_x)),
                sections[2],
            );
            if body_focused {
                cursor = body_cursor.position;
            }
        }
        ComposerTab::Preview => {
            let lines = if composer.has_previewable_body() {
                markdown::render(composer.body().text(), body_inner.width).lines
            } else {
                vec![Line::from(Span::styled(
                    "Nothing to preview",
                    Style::default().fg(theme.muted),
                ))]
            };
            frame.render_widget(
                Paragraph::new(lines)
                    .block(body_block)
                    .wrap(Wrap { trim: false }),
                sections[2],
            );
        }
    }
    if title_focused {
        cursor = title_cursor.position;
    }

    frame.render_widget(Paragraph::new(progress_line(app, theme)), sections[3]);

    let composer = app.composer();
    if let Some(prompt) = composer.attach_prompt() {
        draw_attach_prompt(frame, area, prompt, theme);
        return;
    }
    if let Some(notice) = composer.notice() {
        draw_notice(frame, area, notice, theme);
        return;
    }
    if !popup_open && let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

/// Where a field's caret lands on screen and how far the field is scrolled to
/// keep it visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct FieldCursor {
    pub(super) position: Option<(u16, u16)>,
    pub(super) scroll_x: u16,
    pub(super) scroll_y: u16,
}

/// Lines for `field` with its selection highlighted, plus the caret placement
/// inside `inner`.
pub(super) fn field_view(
    field: &TextField,
    inner: Rect,
    theme: &Palette,
) -> (Vec<Line<'static>>, FieldCursor) {
    let range = field
        .selection()
        .filter(|selection| !selection.is_empty())
        .map(|selection| selection.range());
    let plain = Style::default().fg(theme.text);
    let selected = Style::default()
        .fg(theme.text)
        .bg(theme.selected_text);

    let mut lines = Vec::new();
    let mut offset = 0usize;
    for raw in field.text().split('\n') {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_selected = false;
        for ch in raw.chars() {
            let in_selection = range.is_some_and(|(start, end)| offset >= start && offset < end);
            if in_selection != run_selected && !run.is_empty() {
                let style = if run_selected { selected } else { plain };
                spans.push(Span::styled(std::mem::take(&mut run), style));
            }
            run_selected = in_selection;
            run.push(ch);
            offset += 1;
        }
        if !run.is_empty() {
            let style = if run_selected { selected } else { plain };
            spans.push(Span::styled(run, style));
        }
        lines.push(Line::from(spans));
        offset += 1;
    }

    let mut cursor = FieldCursor::default();
    if let Some((row, col)) = field.cursor_row_col()
        && inner.width > 0
        && inner.height > 0
    {
        let columns: usize = field
            .text()
            .split('\n')
            .nth(row)
            .map_or(0, |line| line.chars().take(col).map(|ch| ch.width().unwrap_or(0)).sum());
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        let col = u16::try_from(columns).unwrap_or(u16::MAX);
        cursor.scroll_y = row.saturating_sub(inner.height - 1);
        cursor.scroll_x = col.saturating_sub(inner.width - 1);
        cursor.position = Some((
            inner.x + (col - cursor.scroll_x),
            inner.y + (row - cursor.scroll_y),
        ));
    }
    (lines, cursor)
}

fn tabs_line(active: ComposerTab, theme: &Palette) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for tab in [ComposerTab::Write, ComposerTab::Preview] {
        let style = if tab == active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("(ctrl+p)", Style::default().fg(theme.muted)));
    Line::from(spans)
}

fn progress_line(app: &App, theme: &Palette) -> Line<'static> {
    let composer = app.composer();
    let mut spans = Vec::new();
    if composer.is_submitting() {
        spans.push(Span::styled(
            "Creating issue...",
            Style::default()
                .fg(theme.positive)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if composer.is_uploading() {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            "Uploading image...",
            Style::default()
                .fg(theme.badge)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if spans.is_empty() {
        spans.push(Span::styled(
            "ctrl+s create issue • ctrl+o attach image",
            Style::default().fg(theme.muted),
        ));
    }
    Line::from(spans)
}

fn draw_attach_prompt(frame: &mut Frame<'_>, area: Rect, prompt: &str, theme: &Palette) {
    let popup = centered_popup(70, 5, area);
    frame.render_widget(Clear, popup);
    let block = popup_block("Attach image", theme.border_focus, theme);
    let inner = block.inner(popup);
    let visible_width = inner.width.saturating_sub(1) as usize;
    let mut shown = prompt.to_string();
    while shown.width() > visible_width {
        shown.remove(0);
    }
    let text = Text::from(vec![
        Line::from(Span::styled(shown.clone(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "Path to an image file • enter upload • esc cancel",
            Style::default().fg(theme.muted),
        )),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), popup);
    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + u16::try_from(shown.width()).unwrap_or(0).min(inner.width - 1);
        frame.set_cursor_position((x, inner.y));
    }
}

fn draw_notice(frame: &mut Frame<'_>, area: Rect, notice: &str, theme: &Palette) {
    let popup = centered_popup(60, 6, area);
    frame.render_widget(Clear, popup);
    let block = popup_block("Cannot continue", theme.danger, theme);
    let text = Text::from(vec![
        Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press enter to dismiss",
            Style::default().fg(theme.muted),
        )),
    ]);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}
