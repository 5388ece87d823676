use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    NotFound,
    Failed(String),
    Loaded(Issue),
}

/// The issue currently open in the detail view and the one request whose
/// answer it will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    issue_id: String,
    ticket: u64,
    load: LoadState,
    scroll: u16,
    max_scroll: u16,
}

impl DetailState {
    pub fn issue_id(&self) -> &str {
        &self.issue_id
    }

    pub fn load(&self) -> &LoadState {
        &self.load
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn issue(&self) -> Option<&Issue> {
        match &self.load {
            LoadState::Loaded(issue) => Some(issue),
            _ => None,
        }
    }
}

impl App {
    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    pub fn current_issue_id(&self) -> Option<&str> {
        self.detail.as_ref().map(DetailState::issue_id)
    }

    /// Points the detail view at `id` and issues a fetch for it. Any fetch
    /// still running for a previous id loses its claim on the view.
    pub fn open_issue(&mut self, id: &str) {
        self.set_view(View::IssueDetail);
        let ticket = self.next_ticket();
        self.detail = Some(DetailState {
            issue_id: id.to_string(),
            ticket,
            load: LoadState::Loading,
            scroll: 0,
            max_scroll: 0,
        });
        self.push_action(AppAction::FetchIssue {
            ticket,
            id: id.to_string(),
        });
    }

    pub(super) fn reload_issue(&mut self) {
        if let Some(id) = self.current_issue_id().map(ToString::to_string) {
            self.open_issue(&id);
        }
    }

    /// Moves the detail view to the issue `delta` rows away in the list.
    pub(super) fn step_issue(&mut self, delta: isize) {
        let Some(current) = self.current_issue_id().map(ToString::to_string) else {
            return;
        };
        let visible = self
            .issues_for_view()
            .iter()
            .map(|issue| issue.id.clone())
            .collect::<Vec<String>>();
        let Some(position) = visible.iter().position(|id| *id == current) else {
            return;
        };
        let target = position as isize + delta;
        if target < 0 || target >= visible.len() as isize {
            return;
        }
        let target = target as usize;
        self.selected_issue = target;
        self.open_issue(&visible[target]);
    }

    fn live_detail_mut(&mut self, ticket: u64, id: &str) -> Option<&mut DetailState> {
        if self.view != View::IssueDetail {
            return None;
        }
        self.detail
            .as_mut()
            .filter(|detail| detail.ticket == ticket && detail.issue_id == id)
    }

    /// Applies a fetch result. Returns `false` when it was for an id or a
    /// request the detail view has moved on from.
    pub fn finish_issue_load(&mut self, ticket: u64, id: &str, issue: Option<Issue>) -> bool {
        let Some(detail) = self.live_detail_mut(ticket, id) else {
            return false;
        };
        match issue {
            Some(issue) => {
                detail.load = LoadState::Loaded(issue.clone());
                self.sync_issue_row(&issue);
            }
            None => detail.load = LoadState::NotFound,
        }
        true
    }

    pub fn fail_issue_load(&mut self, ticket: u64, id: &str, message: &str) -> bool {
        let Some(detail) = self.live_detail_mut(ticket, id) else {
            return false;
        };
        detail.load = LoadState::Failed(message.to_string());
        self.set_status(format!("Failed to load issue: {}", message));
        true
    }

    pub(super) fn back_from_issue_detail(&mut self) {
        let current = self.current_issue_id().map(ToString::to_string);
        self.open_issues();
        if let Some(id) = current {
            self.select_after_load = Some(id);
        }
    }

    pub fn set_detail_max_scroll(&mut self, max_scroll: u16) {
        if let Some(detail) = self.detail.as_mut() {
            detail.max_scroll = max_scroll;
            detail.scroll = detail.scroll.min(max_scroll);
        }
    }

    pub(super) fn scroll_detail(&mut self, delta: i32) {
        if let Some(detail) = self.detail.as_mut() {
            let next = (i32::from(detail.scroll) + delta).clamp(0, i32::from(detail.max_scroll));
            detail.scroll = next as u16;
        }
    }
}
