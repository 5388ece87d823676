use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::*;

pub(super) fn panel_block<'a>(title: &'a str, theme: &Palette) -> Block<'a> {
    panel_block_with_border(title, theme.border, theme)
}

pub(super) fn popup_block<'a>(title: &'a str, border: Color, theme: &Palette) -> Block<'a> {
    Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .style(Style::default().bg(theme.panel).fg(theme.text))
        .border_style(Style::default().fg(border))
}

pub(super) fn panel_block_with_border<'a>(
    title: &'a str,
    border: Color,
    theme: &Palette,
) -> Block<'a> {
    let title_color = if border == theme.border_focus {
        theme.border_focus
    } else {
        theme.accent
    };
    let border_type = if border == theme.border_focus {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_type(border_type)
        .style(Style::default().bg(theme.panel).fg(theme.text))
        .border_style(Style::default().fg(border))
}

pub(super) fn focus_border(focused: bool, theme: &Palette) -> Color {
    if focused {
        theme.border_focus
    } else {
        theme.border
    }
}

pub(super) fn list_state(selected: usize) -> ListState {
    let mut state = ListState::default();
    state.select(Some(selected));
    state
}

pub(super) fn selected_for_list(selected: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.min(len - 1)
}

pub(super) fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> usize {
    if lines.is_empty() {
        return 0;
    }
    let content_width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| {
            let line_width = line.width().max(1);
            line_width.div_ceil(content_width)
        })
        .sum()
}

/// Clips `input` to `max` terminal columns, marking the cut with `…`.
pub(super) fn ellipsize(input: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if input.width() <= max {
        return input.to_string();
    }
    let budget = max - 1;
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
    clipped.push('…');
    clipped
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// A popup of fixed `height` rows, `percent_x` wide, centred in `area`.
pub(super) fn centered_popup(percent_x: u16, height: u16, area: Rect) -> Rect {
    let column = centered_rect(percent_x, 100, area);
    let height = height.min(column.height);
    let top = column.y + (column.height - height) / 2;
    Rect::new(column.x, top, column.width, height)
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::text::Line;
    use unicode_width::UnicodeWidthStr;

    use super::{centered_popup, ellipsize, selected_for_list, wrapped_line_count};

    #[test]
    fn ellipsize_marks_clipped_text() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("a longer title", 8), "a longe…");
        assert_eq!(ellipsize("abc", 0), "");
    }

    #[test]
    fn ellipsize_counts_wide_characters_as_two_columns() {
        let clipped = ellipsize("登录页面崩溃了", 8);
        assert_eq!(clipped, "登录页…");
        assert!(clipped.width() <= 8);
        assert_eq!(ellipsize("登录", 4), "登录");
    }

    #[test]
    fn wrapped_line_count_rounds_up_per_line() {
        let lines = vec![Line::from("0123456789"), Line::from(""), Line::from("abc")];
        assert_eq!(wrapped_line_count(&lines, 4), 3 + 1 + 1);
    }

    #[test]
    fn wrapped_line_count_uses_display_width() {
        let lines = vec![Line::from("截图".repeat(5))];
        assert_eq!(wrapped_line_count(&lines, 10), 2);
    }

    #[test]
    fn selection_is_clamped_to_list() {
        assert_eq!(selected_for_list(5, 3), 2);
        assert_eq!(selected_for_list(5, 0), 0);
    }

    #[test]
    fn popup_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 6);
        let popup = centered_popup(60, 10, area);
        assert!(popup.height <= area.height);
        assert!(popup.right() <= area.right());
    }
}
