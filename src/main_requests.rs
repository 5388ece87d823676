use super::*;

/// Hands every queued action to its own worker thread.
pub(super) fn dispatch_actions(app: &mut App, api: &Arc<dyn IssueApi>, event_tx: &Sender<AppEvent>) {
    for action in app.take_actions() {
        match action {
            AppAction::ListIssues { ticket } => {
                start_list_issues(Arc::clone(api), ticket, event_tx.clone())
            }
            AppAction::FetchIssue { ticket, id } => {
                start_fetch_issue(Arc::clone(api), ticket, id, event_tx.clone())
            }
            AppAction::CreateIssue { ticket, issue } => {
                start_create_issue(Arc::clone(api), ticket, issue, event_tx.clone())
            }
            AppAction::UploadImage { ticket, path } => {
                start_upload_image(Arc::clone(api), ticket, path, event_tx.clone())
            }
        }
    }
}

/// Runs `work` on a fresh thread with its own current-thread runtime. When
/// the runtime cannot be built the failure is reported through `on_error`.
fn spawn_with_runtime<E, F>(event_tx: Sender<AppEvent>, on_error: E, work: F)
where
    E: FnOnce(String) -> AppEvent + Send + 'static,
    F: FnOnce(&tokio::runtime::Runtime, &Sender<AppEvent>) + Send + 'static,
{
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(error) => {
                let _ = event_tx.send(on_error(error.to_string()));
                return;
            }
        };
        work(&runtime, &event_tx);
    });
}

pub(super) fn start_list_issues(api: Arc<dyn IssueApi>, ticket: u64, event_tx: Sender<AppEvent>) {
    spawn_with_runtime(
        event_tx,
        move |message| AppEvent::IssuesFailed { ticket, message },
        move |runtime, event_tx| {
            let event = match runtime.block_on(api.list_issues()) {
                Ok(issues) => {
                    tracing::info!(ticket, count = issues.len(), "listed issues");
                    AppEvent::IssuesLoaded { ticket, issues }
                }
                Err(error) => {
                    tracing::warn!(ticket, %error, "listing issues failed");
                    AppEvent::IssuesFailed {
                        ticket,
                        message: error.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event);
        },
    );
}

pub(super) fn start_fetch_issue(
    api: Arc<dyn IssueApi>,
    ticket: u64,
    id: String,
    event_tx: Sender<AppEvent>,
) {
    let error_id = id.clone();
    spawn_with_runtime(
        event_tx,
        move |message| AppEvent::IssueFailed {
            ticket,
            id: error_id,
            message,
        },
        move |runtime, event_tx| {
            let event = match runtime.block_on(api.get_issue(&id)) {
                Ok(issue) => {
                    tracing::info!(ticket, id = %id, found = issue.is_some(), "fetched issue");
                    AppEvent::IssueLoaded { ticket, id, issue }
                }
                Err(error) => {
                    tracing::warn!(ticket, id = %id, %error, "fetching issue failed");
                    AppEvent::IssueFailed {
                        ticket,
                        id,
                        message: error.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event);
        },
    );
}

pub(super) fn start_create_issue(
    api: Arc<dyn IssueApi>,
    ticket: u64,
    issue: NewIssue,
    event_tx: Sender<AppEvent>,
) {
    spawn_with_runtime(
        event_tx,
        move |message| AppEvent::IssueCreateFailed { ticket, message },
        move |runtime, event_tx| {
            let event = match runtime.block_on(api.create_issue(&issue)) {
                Ok(created) => {
                    tracing::info!(
                        ticket,
                        id = ?created.as_ref().map(|issue| issue.id.as_str()),
                        "created issue"
                    );
                    AppEvent::IssueCreated {
                        ticket,
                        issue: created,
                    }
                }
                Err(error) => {
                    tracing::warn!(ticket, %error, "creating issue failed");
                    AppEvent::IssueCreateFailed {
                        ticket,
                        message: error.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event);
        },
    );
}

pub(super) fn start_upload_image(
    api: Arc<dyn IssueApi>,
    ticket: u64,
    path: PathBuf,
    event_tx: Sender<AppEvent>,
) {
    spawn_with_runtime(
        event_tx,
        move |message| AppEvent::ImageUploadFailed { ticket, message },
        move |runtime, event_tx| {
            let file_name = upload_file_name(&path);
            let event = match runtime.block_on(api.upload_image(&path)) {
                Ok(uploaded) => {
                    tracing::info!(ticket, file = %file_name, url = %uploaded.url, "uploaded image");
                    AppEvent::ImageUploaded {
                        ticket,
                        file_name,
                        url: uploaded.url,
                    }
                }
                Err(error) => {
                    tracing::warn!(ticket, path = %path.display(), %error, "image upload failed");
                    AppEvent::ImageUploadFailed {
                        ticket,
                        message: error.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event);
        },
    );
}
