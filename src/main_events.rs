use super::*;

pub(super) fn handle_events(app: &mut App, event_rx: &Receiver<AppEvent>) {
    while let Ok(event) = event_rx.try_recv() {
        apply_event(app, event);
    }
}

pub(super) fn apply_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::IssuesLoaded { ticket, issues } => {
            let count = issues.len();
            if !app.finish_issues_load(ticket, issues) {
                tracing::debug!(ticket, "dropping stale issue list");
                return;
            }
            if app.status().is_empty() || app.status().starts_with("Failed to load issues") {
                app.set_status(format!("Loaded {} issues", count));
            }
        }
        AppEvent::IssuesFailed { ticket, message } => {
            if !app.fail_issues_load(ticket, &message) {
                tracing::debug!(ticket, "dropping stale issue list failure");
            }
        }
        AppEvent::IssueLoaded { ticket, id, issue } => {
            if !app.finish_issue_load(ticket, &id, issue) {
                tracing::debug!(ticket, id = %id, "dropping stale issue");
            }
        }
        AppEvent::IssueFailed {
            ticket,
            id,
            message,
        } => {
            if !app.fail_issue_load(ticket, &id, &message) {
                tracing::debug!(ticket, id = %id, "dropping stale issue failure");
            }
        }
        AppEvent::IssueCreated { ticket, issue } => app.finish_create(ticket, issue),
        AppEvent::IssueCreateFailed { ticket, message } => app.fail_create(ticket, &message),
        AppEvent::ImageUploaded {
            ticket,
            file_name,
            url,
        } => app.finish_upload(ticket, &file_name, &url),
        AppEvent::ImageUploadFailed { ticket, message } => app.fail_upload(ticket, &message),
    }
}
