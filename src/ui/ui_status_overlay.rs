use super::*;

pub(super) fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect, theme: &Palette) {
    frame.render_widget(Clear, area);

    let (mode, mode_color) = mode_meta(app, theme);
    let mode_badge = format!("{:^10}", mode);
    let status = app.status();
    let status_text = if status.is_empty() { "ready" } else { status };
    let status_color = if status.starts_with("Failed") {
        theme.danger
    } else {
        theme.text
    };

    let mut spans = vec![
        Span::styled(
            mode_badge,
            Style::default()
                .fg(theme.background)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status_text.to_string(), Style::default().fg(status_color)),
    ];
    let help = help_text(app);
    if !help.is_empty() {
        spans.push(Span::styled(" • ", Style::default().fg(theme.border)));
        spans.push(Span::styled(help, Style::default().fg(theme.muted)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.panel));
    frame.render_widget(paragraph, area);
}

fn mode_meta(app: &App, theme: &Palette) -> (&'static str, Color) {
    match app.view() {
        View::Issues if app.issue_search_mode() => ("SEARCH", theme.badge),
        View::Issues => ("ISSUES", theme.accent),
        View::IssueDetail => ("ISSUE", theme.positive),
        View::Composer => ("NEW", theme.badge),
    }
}

fn help_text(app: &App) -> String {
    match app.view() {
        View::Issues if app.issue_search_mode() => {
            "type to filter • enter keep • esc clear".to_string()
        }
        View::Issues => {
            "j/k move • enter open • / search • n new • r refresh • q quit".to_string()
        }
        View::IssueDetail => "j/k scroll • [/] prev/next • r reload • esc back • q quit".to_string(),
        View::Composer => {
            let composer = app.composer();
            if composer.notice().is_some() {
                return "enter dismiss".to_string();
            }
            if composer.attach_prompt().is_some() {
                return "enter upload • esc cancel".to_string();
            }
            format!(
                "tab switch field • ctrl+p {} • ctrl+o attach image • ctrl+s create • esc cancel",
                composer.tab().toggle_label()
            )
        }
    }
}
