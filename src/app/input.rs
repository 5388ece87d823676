use super::*;

const PAGE: i32 = 10;

impl App {
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match self.view {
            View::Issues => self.handle_issues_key(key),
            View::IssueDetail => self.handle_detail_key(key),
            View::Composer => self.handle_composer_key(key),
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        match self.view {
            View::Composer => {
                if self.composer.notice().is_some() {
                    return;
                }
                if self.composer.attach_prompt().is_some() {
                    let text = text.replace(['\r', '\n'], "");
                    self.edit_attach_prompt(|prompt| prompt.push_str(&text));
                    return;
                }
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                if self.composer.focus() == ComposerFocus::Title {
                    let single_line = text.replace('\n', " ");
                    self.composer.title_mut().insert_str(&single_line);
                    return;
                }
                if self.composer.tab() == ComposerTab::Write {
                    self.composer.body_mut().insert_str(&text);
                }
            }
            View::Issues if self.issue_search_mode => {
                let mut query = self.issue_query.clone();
                query.push_str(text.trim());
                self.set_issue_query(query);
            }
            _ => {}
        }
    }

    fn handle_issues_key(&mut self, key: KeyEvent) {
        if self.issue_search_mode {
            match key.code {
                KeyCode::Esc => self.clear_issue_search(),
                KeyCode::Enter => self.finish_issue_search(),
                KeyCode::Backspace => {
                    let mut query = self.issue_query.clone();
                    query.pop();
                    self.set_issue_query(query);
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.set_issue_query(String::new());
                }
                KeyCode::Char(ch) => {
                    let mut query = self.issue_query.clone();
                    query.push(ch);
                    self.set_issue_query(query);
                }
                KeyCode::Down => self.move_issue_selection(1),
                KeyCode::Up => self.move_issue_selection(-1),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('j') | KeyCode::Down => self.move_issue_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_issue_selection(-1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_issue_selection(PAGE as isize)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_issue_selection(-(PAGE as isize))
            }
            KeyCode::PageDown => self.move_issue_selection(PAGE as isize),
            KeyCode::PageUp => self.move_issue_selection(-(PAGE as isize)),
            KeyCode::Char('g') | KeyCode::Home => self.select_first_issue(),
            KeyCode::Char('G') | KeyCode::End => self.select_last_issue(),
            KeyCode::Char('/') => self.start_issue_search(),
            KeyCode::Esc => self.clear_issue_search(),
            KeyCode::Char('r') => self.open_issues(),
            KeyCode::Char('n') => self.open_composer(),
            KeyCode::Enter => self.open_selected_issue(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                self.back_from_issue_detail()
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_detail(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_detail(-1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_detail(PAGE)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_detail(-PAGE)
            }
            KeyCode::PageDown => self.scroll_detail(PAGE),
            KeyCode::PageUp => self.scroll_detail(-PAGE),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_detail(-i32::from(u16::MAX)),
            KeyCode::Char('G') | KeyCode::End => self.scroll_detail(i32::from(u16::MAX)),
            KeyCode::Char(']') => self.step_issue(1),
            KeyCode::Char('[') => self.step_issue(-1),
            KeyCode::Char('r') => self.reload_issue(),
            KeyCode::Char('n') => self.open_composer(),
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) {
        if self.composer.notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.composer.dismiss_notice();
            }
            return;
        }

        if self.composer.attach_prompt().is_some() {
            match key.code {
                KeyCode::Esc => self.cancel_attach(),
                KeyCode::Enter => self.confirm_attach(),
                KeyCode::Backspace => self.edit_attach_prompt(|prompt| {
                    prompt.pop();
                }),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.edit_attach_prompt(String::clear)
                }
                KeyCode::Char(ch) => self.edit_attach_prompt(|prompt| prompt.push(ch)),
                _ => {}
            }
            return;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => self.cancel_composer(),
            KeyCode::Char('s') if control => self.submit_composer(),
            KeyCode::Char('p') if control => self.composer.toggle_tab(),
            KeyCode::Char('o') if control => self.start_attach(),
            KeyCode::Char('a') if control => self.composer.focused_field_mut().select_all(),
            KeyCode::Tab | KeyCode::BackTab => self.composer.toggle_focus(),
            _ if self.composer.tab() == ComposerTab::Preview
                && self.composer.focus() == ComposerFocus::Body => {}
            KeyCode::Enter => match self.composer.focus() {
                ComposerFocus::Title => self.composer.focus_body(),
                ComposerFocus::Body => self.composer.body_mut().insert_str("\n"),
            },
            KeyCode::Backspace => self.composer.focused_field_mut().backspace(),
            KeyCode::Delete => self.composer.focused_field_mut().delete(),
            KeyCode::Left => self.composer.focused_field_mut().move_left(extend),
            KeyCode::Right => self.composer.focused_field_mut().move_right(extend),
            KeyCode::Up => self.composer.focused_field_mut().move_up(extend),
            KeyCode::Down => self.composer.focused_field_mut().move_down(extend),
            KeyCode::Home => self.composer.focused_field_mut().move_line_start(extend),
            KeyCode::End => self.composer.focused_field_mut().move_line_end(extend),
            KeyCode::Char(ch) if !control => {
                let mut buffer = [0u8; 4];
                self.composer
                    .focused_field_mut()
                    .insert_str(ch.encode_utf8(&mut buffer));
            }
            _ => {}
        }
    }
}
