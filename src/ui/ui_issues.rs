use unicode_width::UnicodeWidthStr;

use super::*;

pub(super) const IMAGE_BADGE: &str = "[image]";

pub(super) fn draw_issues(frame: &mut Frame<'_>, app: &mut App, area: Rect, theme: &Palette) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let visible_issues = app
        .issues_for_view()
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let visible_count = visible_issues.len();
    let total_count = app.issues().len();
    let query = app.issue_query().trim();
    let query_display = if app.issue_search_mode() {
        ellipsize(app.issue_query(), 64)
    } else if query.is_empty() {
        "none".to_string()
    } else {
        ellipsize(query, 64)
    };

    let mut count_spans = vec![
        Span::styled(
            "Issues",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} shown", visible_count),
            Style::default().fg(theme.text),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} total", total_count),
            Style::default().fg(theme.muted),
        ),
    ];
    if app.issues_loading() && app.issues_loaded() {
        count_spans.push(Span::raw("  "));
        count_spans.push(Span::styled(
            "refreshing...",
            Style::default().fg(theme.badge),
        ));
    }
    let header = Text::from(vec![
        Line::from(count_spans),
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(theme.muted)),
            Span::raw(query_display.clone()),
            Span::raw("  "),
            Span::styled("(/ to search)", Style::default().fg(theme.muted)),
        ]),
    ]);
    let header_area = sections[0].inner(Margin {
        vertical: 0,
        horizontal: 2,
    });
    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(focus_border(app.issue_search_mode(), theme)))
        .style(Style::default().bg(theme.panel));
    frame.render_widget(
        Paragraph::new(header)
            .block(header_block)
            .style(Style::default().fg(theme.text)),
        header_area,
    );
    if app.issue_search_mode() {
        let content = header_area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        if content.width > 0 && content.height > 1 {
            let cursor_x = content
                .x
                .saturating_add((8 + query_display.width()) as u16)
                .min(content.x.saturating_add(content.width.saturating_sub(1)));
            frame.set_cursor_position((cursor_x, content.y.saturating_add(1)));
        }
    }

    let list_area = sections[1].inner(Margin {
        vertical: 0,
        horizontal: 2,
    });
    let block = panel_block("Issue list", theme);
    let row_width = list_area.width.saturating_sub(4) as usize;

    if visible_issues.is_empty() {
        let message = empty_message(app);
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(theme.muted),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, list_area);
        return;
    }

    let items = visible_issues
        .iter()
        .map(|issue| {
            let badge_width = if issue.has_image() {
                IMAGE_BADGE.width() + 1
            } else {
                0
            };
            let mut title_spans = vec![Span::styled(
                ellipsize(issue.title.as_str(), row_width.saturating_sub(badge_width)),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            )];
            if issue.has_image() {
                title_spans.push(Span::raw(" "));
                title_spans.push(Span::styled(
                    IMAGE_BADGE,
                    Style::default()
                        .fg(theme.badge)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            let byline = Line::from(vec![
                Span::styled(
                    format!("#{} ", issue.short_id()),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(
                    ellipsize(issue.opened_on().as_str(), row_width.saturating_sub(8)),
                    Style::default().fg(theme.muted),
                ),
            ]);
            let mut lines = vec![Line::from(title_spans)];
            let excerpt = markdown::excerpt(issue.body.as_str());
            if !excerpt.is_empty() {
                lines.push(Line::from(Span::styled(
                    ellipsize(excerpt.as_str(), row_width),
                    Style::default().fg(theme.muted),
                )));
            }
            lines.push(byline);
            ListItem::new(lines)
        })
        .collect::<Vec<ListItem>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selected_row)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌ ");
    let selected = selected_for_list(app.selected_issue(), visible_count);
    let mut state = list_state(selected);
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn empty_message(app: &App) -> String {
    if !app.issues_loaded() {
        if app.issues_loading() {
            return "Loading issues...".to_string();
        }
        return "Issues could not be loaded. Press r to retry.".to_string();
    }
    if app.issues().is_empty() {
        return "No issues yet. Press n to open one.".to_string();
    }
    format!("No issues match \"{}\".", app.issue_query().trim())
}
