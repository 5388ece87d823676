use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::{App, ComposerFocus, ComposerTab, LoadState, TextField, View};
use crate::markdown;
use crate::theme::Palette;

mod ui_composer;
mod ui_issue_detail;
mod ui_issues;
mod ui_shared;
mod ui_status_overlay;

use ui_shared::*;

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let theme = app.theme();
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

    let (main, footer) = split_area(area);
    match app.view() {
        View::Issues => ui_issues::draw_issues(frame, app, main, theme),
        View::IssueDetail => ui_issue_detail::draw_issue_detail(frame, app, main, theme),
        View::Composer => ui_composer::draw_composer(frame, app, main, theme),
    }
    ui_status_overlay::draw_status(frame, app, footer, theme);
}

fn split_area(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use crate::app::{App, AppAction};
    use crate::issue::Issue;

    pub(super) fn render(app: &mut App, width: u16, height: u16) -> Buffer {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| super::draw(frame, app))
            .expect("draw frame");
        terminal.backend().buffer().clone()
    }

    pub(super) fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    pub(super) fn sample_issue(id: &str, title: &str, body: &str, created_at: &str) -> Issue {
        Issue {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: created_at.to_string(),
        }
    }

    pub(super) fn loaded_app(issues: Vec<Issue>) -> App {
        let mut app = App::new(None);
        app.open_issues();
        for action in app.take_actions() {
            if let AppAction::ListIssues { ticket } = action {
                app.finish_issues_load(ticket, issues.clone());
            }
        }
        app
    }

    #[test]
    fn status_bar_shows_keys_for_current_view() {
        let mut app = loaded_app(Vec::new());
        let text = buffer_text(&render(&mut app, 100, 20));
        assert!(text.contains("n new"));

        app.open_composer();
        let text = buffer_text(&render(&mut app, 100, 20));
        assert!(text.contains("ctrl+s create"));
    }
}
