use super::*;

pub(super) fn draw_issue_detail(
    frame: &mut Frame<'_>,
    app: &mut App,
    area: Rect,
    theme: &Palette,
) {
    let Some(detail) = app.detail() else {
        frame.render_widget(panel_block("Issue", theme), area);
        return;
    };
    let issue_id = detail.issue_id().to_string();
    let load = detail.load().clone();
    let scroll = detail.scroll();

    let issue = match load {
        LoadState::Loaded(issue) => issue,
        LoadState::Loading => {
            draw_message(frame, area, theme, "Loading issue...", theme.muted);
            return;
        }
        LoadState::NotFound => {
            let message = format!("Issue not found. No issue has id {}.", issue_id);
            draw_message(frame, area, theme, message.as_str(), theme.danger);
            return;
        }
        LoadState::Failed(error) => {
            let message = format!("Could not load issue: {}. Press r to retry.", error);
            draw_message(frame, area, theme, message.as_str(), theme.danger);
            return;
        }
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    let header_area = sections[0].inner(Margin {
        vertical: 0,
        horizontal: 2,
    });
    let body_area = sections[1].inner(Margin {
        vertical: 0,
        horizontal: 2,
    });

    let header = Text::from(vec![
        Line::from(Span::styled(
            ellipsize(issue.title.as_str(), header_area.width.saturating_sub(4) as usize),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("#{}", issue.short_id()),
                Style::default().fg(theme.accent),
            ),
            Span::styled(" • ", Style::default().fg(theme.border)),
            Span::styled(issue.opened_on(), Style::default().fg(theme.muted)),
        ]),
    ]);
    frame.render_widget(
        Paragraph::new(header).block(panel_block_with_border("Issue", theme.positive, theme)),
        header_area,
    );

    let content_width = body_area.width.saturating_sub(2);
    let viewport_height = body_area.height.saturating_sub(2) as usize;
    let rendered = markdown::render(issue.body.as_str(), content_width);
    let mut lines = rendered.lines;
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No description provided.",
            Style::default().fg(theme.muted),
        )));
    }

    let total_lines = wrapped_line_count(&lines, content_width);
    let max_scroll = total_lines.saturating_sub(viewport_height) as u16;
    app.set_detail_max_scroll(max_scroll);
    let scroll = scroll.min(max_scroll);

    let title = if max_scroll > 0 {
        format!("Description ({}/{})", scroll, max_scroll)
    } else {
        "Description".to_string()
    };
    let paragraph = Paragraph::new(lines)
        .block(panel_block(title.as_str(), theme))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, body_area);
}

fn draw_message(frame: &mut Frame<'_>, area: Rect, theme: &Palette, message: &str, color: Color) {
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 2,
    });
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color),
    )))
    .block(panel_block("Issue", theme))
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
