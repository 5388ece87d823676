use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::upload_file_name;
use crate::issue::{Issue, NewIssue, image_markdown, sort_newest_first};
use crate::theme::{Palette, resolve_theme};

mod composer;
mod detail;
mod input;
mod issues;

use composer::ComposerState;
pub use composer::{ComposerFocus, ComposerTab, TextField};
use detail::DetailState;
pub use detail::LoadState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Issues,
    IssueDetail,
    Composer,
}

/// Work the UI loop has to hand to a request worker. Every variant carries
/// the ticket the answer must present to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    ListIssues { ticket: u64 },
    FetchIssue { ticket: u64, id: String },
    CreateIssue { ticket: u64, issue: NewIssue },
    UploadImage { ticket: u64, path: PathBuf },
}

pub struct App {
    should_quit: bool,
    theme: &'static Palette,
    view: View,
    issues: Vec<Issue>,
    issues_loading: bool,
    issues_loaded: bool,
    list_ticket: Option<u64>,
    selected_issue: usize,
    select_after_load: Option<String>,
    issue_query: String,
    issue_search_mode: bool,
    detail: Option<DetailState>,
    composer: ComposerState,
    composer_session: Option<u64>,
    last_ticket: u64,
    actions: Vec<AppAction>,
    status: String,
}

impl App {
    pub fn new(theme: Option<&str>) -> Self {
        Self {
            should_quit: false,
            theme: resolve_theme(theme),
            view: View::Issues,
            issues: Vec::new(),
            issues_loading: false,
            issues_loaded: false,
            list_ticket: None,
            selected_issue: 0,
            select_after_load: None,
            issue_query: String::new(),
            issue_search_mode: false,
            detail: None,
            composer: ComposerState::default(),
            composer_session: None,
            last_ticket: 0,
            actions: Vec::new(),
            status: String::new(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn theme(&self) -> &'static Palette {
        self.theme
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Switching away from a view drops its live tickets, so whatever is
    /// still in flight for it is ignored when it lands.
    fn set_view(&mut self, view: View) {
        if self.view == View::IssueDetail && view != View::IssueDetail {
            self.detail = None;
        }
        if self.view == View::Issues && view != View::Issues {
            self.list_ticket = None;
            self.issues_loading = false;
            self.issue_search_mode = false;
        }
        self.view = view;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn next_ticket(&mut self) -> u64 {
        self.last_ticket += 1;
        self.last_ticket
    }

    fn push_action(&mut self, action: AppAction) {
        self.actions.push(action);
    }

    pub fn take_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.actions)
    }
}
