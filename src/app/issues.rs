use super::*;

impl App {
    /// Enters the list view and asks for a fresh copy of every issue.
    pub fn open_issues(&mut self) {
        self.set_view(View::Issues);
        let ticket = self.next_ticket();
        self.list_ticket = Some(ticket);
        self.issues_loading = true;
        self.push_action(AppAction::ListIssues { ticket });
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issues_loading(&self) -> bool {
        self.issues_loading
    }

    pub fn issues_loaded(&self) -> bool {
        self.issues_loaded
    }

    pub fn issue_query(&self) -> &str {
        &self.issue_query
    }

    pub fn issue_search_mode(&self) -> bool {
        self.issue_search_mode
    }

    pub fn issues_for_view(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.matches_query(&self.issue_query))
            .collect()
    }

    pub fn selected_issue(&self) -> usize {
        self.selected_issue
    }

    pub fn selected_issue_row(&self) -> Option<&Issue> {
        self.issues_for_view().get(self.selected_issue).copied()
    }

    /// Applies a list response. Returns `false` when the response belongs to a
    /// request the list no longer waits for.
    pub fn finish_issues_load(&mut self, ticket: u64, mut issues: Vec<Issue>) -> bool {
        if self.list_ticket != Some(ticket) {
            return false;
        }
        self.list_ticket = None;
        self.issues_loading = false;
        self.issues_loaded = true;

        let previous = self.selected_issue_row().map(|issue| issue.id.clone());
        let target = self.select_after_load.take().or(previous);
        sort_newest_first(&mut issues);
        self.issues = issues;
        self.selected_issue = 0;
        if let Some(id) = target {
            self.select_issue_by_id(&id);
        }
        true
    }

    /// A failed refresh keeps whatever rows were already on screen.
    pub fn fail_issues_load(&mut self, ticket: u64, message: &str) -> bool {
        if self.list_ticket != Some(ticket) {
            return false;
        }
        self.list_ticket = None;
        self.issues_loading = false;
        self.select_after_load = None;
        self.set_status(format!("Failed to load issues: {}", message));
        true
    }

    pub fn select_issue_by_id(&mut self, id: &str) -> bool {
        let position = self
            .issues_for_view()
            .iter()
            .position(|issue| issue.id == id);
        match position {
            Some(index) => {
                self.selected_issue = index;
                true
            }
            None => false,
        }
    }

    /// Keeps the list copy of an issue in step with what the detail view
    /// just fetched.
    pub(super) fn sync_issue_row(&mut self, issue: &Issue) {
        if let Some(row) = self.issues.iter_mut().find(|row| row.id == issue.id) {
            *row = issue.clone();
        }
    }

    pub(super) fn move_issue_selection(&mut self, delta: isize) {
        let len = self.issues_for_view().len();
        if len == 0 {
            self.selected_issue = 0;
            return;
        }
        let current = self.selected_issue.min(len - 1) as isize;
        self.selected_issue = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    pub(super) fn select_first_issue(&mut self) {
        self.selected_issue = 0;
    }

    pub(super) fn select_last_issue(&mut self) {
        self.selected_issue = self.issues_for_view().len().saturating_sub(1);
    }

    pub(super) fn start_issue_search(&mut self) {
        self.issue_search_mode = true;
    }

    pub(super) fn finish_issue_search(&mut self) {
        self.issue_search_mode = false;
    }

    pub(super) fn clear_issue_search(&mut self) {
        self.issue_search_mode = false;
        self.set_issue_query(String::new());
    }

    pub(super) fn set_issue_query(&mut self, query: String) {
        let selected = self.selected_issue_row().map(|issue| issue.id.clone());
        self.issue_query = query;
        self.selected_issue = 0;
        if let Some(id) = selected {
            self.select_issue_by_id(&id);
        }
    }

    pub(super) fn open_selected_issue(&mut self) {
        let Some(id) = self.selected_issue_row().map(|issue| issue.id.clone()) else {
            return;
        };
        self.open_issue(&id);
    }
}
