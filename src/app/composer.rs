use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerTab {
    Write,
    Preview,
}

impl ComposerTab {
    fn toggle(self) -> Self {
        match self {
            Self::Write => Self::Preview,
            Self::Preview => Self::Write,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Write => "Write",
            Self::Preview => "Preview",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Write => "preview",
            Self::Preview => "write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerFocus {
    Title,
    Body,
}

/// Character offsets into a [`TextField`]. `anchor` stays put while `head`
/// moves; they are equal when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    pub fn range(self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }

    pub fn is_empty(self) -> bool {
        self.anchor == self.head
    }
}

/// Replaces the characters `[start, end)` of `text` with `insert` and returns
/// the new text with the caret offset just past the inserted text.
///
/// Offsets count characters, not bytes. They are clamped to the text and may
/// be given in either order.
pub fn splice_selection(text: &str, start: usize, end: usize, insert: &str) -> (String, usize) {
    let length = text.chars().count();
    let (start, end) = (start.min(end).min(length), start.max(end).min(length));
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);

    let mut spliced = String::with_capacity(text.len() + insert.len());
    spliced.push_str(&text[..start_byte]);
    spliced.push_str(insert);
    spliced.push_str(&text[end_byte..]);
    (spliced, start + insert.chars().count())
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// An editable text value. A field that has never been focused has no
/// selection, which is how the composer knows whether there is a cursor to
/// insert at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    selection: Option<Selection>,
}

impl TextField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn has_cursor(&self) -> bool {
        self.selection.is_some()
    }

    pub fn focus(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::caret(self.len()));
        }
    }

    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let length = self.len();
        self.selection = Some(Selection {
            anchor: anchor.min(length),
            head: head.min(length),
        });
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Typing and pasting: replaces the selection, or appends when the field
    /// has no cursor yet.
    pub fn insert_str(&mut self, insert: &str) {
        let (start, end) = self
            .selection
            .map(Selection::range)
            .unwrap_or((self.len(), self.len()));
        let (text, caret) = splice_selection(&self.text, start, end, insert);
        self.text = text;
        self.selection = Some(Selection::caret(caret));
    }

    /// Inserts a generated snippet (an uploaded image reference) at the cursor,
    /// or on a new line at the end when the field never had one.
    pub fn insert_snippet(&mut self, snippet: &str) {
        match self.selection {
            Some(_) => self.insert_str(snippet),
            None => {
                self.text.push('\n');
                self.text.push_str(snippet);
            }
        }
    }

    pub fn backspace(&mut self) {
        let Some(selection) = self.selection else {
            self.text.pop();
            return;
        };
        let (start, end) = selection.range();
        if start != end {
            self.insert_str("");
            return;
        }
        if start == 0 {
            return;
        }
        let (text, caret) = splice_selection(&self.text, start - 1, start, "");
        self.text = text;
        self.selection = Some(Selection::caret(caret));
    }

    pub fn delete(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        let (start, end) = selection.range();
        if start != end {
            self.insert_str("");
            return;
        }
        if start >= self.len() {
            return;
        }
        let (text, caret) = splice_selection(&self.text, start, start + 1, "");
        self.text = text;
        self.selection = Some(Selection::caret(caret));
    }

    pub fn move_left(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let target = if !extend && !selection.is_empty() {
            selection.range().0
        } else {
            selection.head.saturating_sub(1)
        };
        self.move_head(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let target = if !extend && !selection.is_empty() {
            selection.range().1
        } else {
            (selection.head + 1).min(self.len())
        };
        self.move_head(target, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let (row, _) = self.row_col(selection.head);
        let target = self.offset_at(row, 0);
        self.move_head(target, extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let (row, _) = self.row_col(selection.head);
        let target = self.offset_at(row, usize::MAX);
        self.move_head(target, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let (row, col) = self.row_col(selection.head);
        let target = if row == 0 {
            0
        } else {
            self.offset_at(row - 1, col)
        };
        self.move_head(target, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        let (row, col) = self.row_col(selection.head);
        let last_row = self.text.matches('\n').count();
        let target = if row >= last_row {
            self.len()
        } else {
            self.offset_at(row + 1, col)
        };
        self.move_head(target, extend);
    }

    pub fn select_all(&mut self) {
        self.selection = Some(Selection {
            anchor: 0,
            head: self.len(),
        });
    }

    fn move_head(&mut self, target: usize, extend: bool) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        selection.head = target;
        if !extend {
            selection.anchor = target;
        }
    }

    /// Row and column (both zero-based, in characters) of `offset`.
    pub fn row_col(&self, offset: usize) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for ch in self.text.chars().take(offset) {
            if ch == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    pub fn cursor_row_col(&self) -> Option<(usize, usize)> {
        self.selection
            .map(|selection| self.row_col(selection.head))
    }

    fn offset_at(&self, row: usize, col: usize) -> usize {
        let mut offset = 0;
        for (index, line) in self.text.split('\n').enumerate() {
            let width = line.chars().count();
            if index == row {
                return offset + col.min(width);
            }
            offset += width + 1;
        }
        self.len()
    }
}

#[derive(Debug, Clone)]
pub struct ComposerState {
    title: TextField,
    body: TextField,
    focus: ComposerFocus,
    tab: ComposerTab,
    submitting: bool,
    uploading: bool,
    attach_prompt: Option<String>,
    notice: Option<String>,
}

impl Default for ComposerState {
    fn default() -> Self {
        let mut title = TextField::default();
        title.focus();
        Self {
            title,
            body: TextField::default(),
            focus: ComposerFocus::Title,
            tab: ComposerTab::Write,
            submitting: false,
            uploading: false,
            attach_prompt: None,
            notice: None,
        }
    }
}

impl ComposerState {
    pub fn title(&self) -> &TextField {
        &self.title
    }

    pub fn body(&self) -> &TextField {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut TextField {
        &mut self.body
    }

    pub fn title_mut(&mut self) -> &mut TextField {
        &mut self.title
    }

    pub fn focus(&self) -> ComposerFocus {
        self.focus
    }

    pub fn tab(&self) -> ComposerTab {
        self.tab
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn attach_prompt(&self) -> Option<&str> {
        self.attach_prompt.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn focus_title(&mut self) {
        self.focus = ComposerFocus::Title;
        self.title.focus();
    }

    pub fn focus_body(&mut self) {
        self.focus = ComposerFocus::Body;
        self.body.focus();
    }

    pub fn toggle_focus(&mut self) {
        match self.focus {
            ComposerFocus::Title => self.focus_body(),
            ComposerFocus::Body => self.focus_title(),
        }
    }

    pub fn toggle_tab(&mut self) {
        self.tab = self.tab.toggle();
    }

    pub fn focused_field_mut(&mut self) -> &mut TextField {
        match self.focus {
            ComposerFocus::Title => &mut self.title,
            ComposerFocus::Body => &mut self.body,
        }
    }

    pub fn draft(&self) -> NewIssue {
        NewIssue::new(self.title.text(), self.body.text())
    }

    /// The trimmed body is what decides between a rendered preview and the
    /// placeholder.
    pub fn has_previewable_body(&self) -> bool {
        !self.body.text().trim().is_empty()
    }

    pub fn insert_image(&mut self, file_name: &str, url: &str) {
        self.body.insert_snippet(&image_markdown(file_name, url));
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn open_attach_prompt(&mut self) {
        self.attach_prompt = Some(String::new());
    }

    fn close_attach_prompt(&mut self) -> Option<String> {
        self.attach_prompt.take()
    }
}

impl App {
    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn open_composer(&mut self) {
        self.composer = ComposerState::default();
        self.composer_session = Some(self.next_ticket());
        self.set_view(View::Composer);
    }

    pub(super) fn cancel_composer(&mut self) {
        self.composer_session = None;
        self.composer = ComposerState::default();
        self.open_issues();
    }

    pub fn submit_composer(&mut self) {
        if self.composer.submitting {
            return;
        }
        let Some(ticket) = self.composer_session else {
            return;
        };
        let draft = self.composer.draft();
        if let Err(error) = draft.validate() {
            self.composer.set_notice(error.to_string());
            return;
        }

        self.composer.submitting = true;
        self.set_status("Creating issue...");
        self.push_action(AppAction::CreateIssue {
            ticket,
            issue: draft,
        });
    }

    pub(super) fn start_attach(&mut self) {
        if self.composer.uploading {
            self.set_status("An upload is already in progress");
            return;
        }
        self.composer.open_attach_prompt();
    }

    pub(super) fn confirm_attach(&mut self) {
        let Some(raw) = self.composer.close_attach_prompt() else {
            return;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        let Some(ticket) = self.composer_session else {
            return;
        };

        let path = expand_home(raw);
        self.composer.uploading = true;
        self.set_status(format!("Uploading {}...", upload_file_name(&path)));
        self.push_action(AppAction::UploadImage { ticket, path });
    }

    pub(super) fn cancel_attach(&mut self) {
        self.composer.close_attach_prompt();
    }

    pub(super) fn edit_attach_prompt(&mut self, edit: impl FnOnce(&mut String)) {
        if let Some(prompt) = self.composer.attach_prompt.as_mut() {
            edit(prompt);
        }
    }

    pub fn finish_create(&mut self, ticket: u64, created: Option<Issue>) {
        if self.composer_session != Some(ticket) {
            tracing::debug!(ticket, "issue created after composer closed");
            if self.view == View::Issues {
                self.open_issues();
            }
            return;
        }

        self.composer_session = None;
        self.composer = ComposerState::default();
        self.select_after_load = created.map(|issue| issue.id);
        self.set_status("Issue created");
        self.open_issues();
    }

    pub fn fail_create(&mut self, ticket: u64, message: &str) {
        if self.composer_session != Some(ticket) {
            self.set_status(format!("Failed to create issue: {}", message));
            return;
        }
        self.composer.submitting = false;
        self.set_status(String::new());
        self.composer
            .set_notice(format!("Failed to create issue: {}", message));
    }

    pub fn finish_upload(&mut self, ticket: u64, file_name: &str, url: &str) {
        if self.composer_session != Some(ticket) {
            tracing::debug!(ticket, "upload finished after composer closed");
            return;
        }
        self.composer.uploading = false;
        self.composer.insert_image(file_name, url);
        self.set_status(format!("Uploaded {}", file_name));
    }

    pub fn fail_upload(&mut self, ticket: u64, message: &str) {
        if self.composer_session != Some(ticket) {
            return;
        }
        self.composer.uploading = false;
        self.set_status(String::new());
        self.composer
            .set_notice(format!("Image upload failed: {}", message));
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return Path::new(&home).join(rest);
    }
    PathBuf::from(raw)
}
