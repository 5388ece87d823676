mod api;
mod app;
mod cli;
mod config;
mod issue;
mod logging;
mod main_events;
mod main_requests;
mod markdown;
mod theme;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::{IssueApi, IssueClient, upload_file_name};
use crate::app::{App, AppAction};
use crate::cli::Cli;
use crate::config::{Config, Settings};
use crate::issue::{Issue, NewIssue};
use crate::main_events::handle_events;
use crate::main_requests::dispatch_actions;

type TuiBackend = CrosstermBackend<Stdout>;
type Tui = Terminal<TuiBackend>;

const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, &config)?;
    let client = IssueClient::new(&settings.base_url, settings.timeout)
        .with_context(|| format!("Failed to set up client for {}", settings.base_url))?;
    tracing::info!(base_url = %client.base_url(), "issuedeck starting");
    let api: Arc<dyn IssueApi> = Arc::new(client);

    let mut terminal_guard = TerminalGuard::init()?;
    let mut app = App::new(settings.theme.as_deref());
    app.open_issues();

    let (event_tx, event_rx) = mpsc::channel();
    run_app(
        terminal_guard.terminal_mut(),
        &mut app,
        &api,
        &event_rx,
        &event_tx,
    )?;
    tracing::info!("issuedeck exiting");
    Ok(())
}

fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    api: &Arc<dyn IssueApi>,
    event_rx: &Receiver<AppEvent>,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        handle_events(app, event_rx);
        dispatch_actions(app, api, event_tx);
        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.should_quit() {
            return Ok(());
        }

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if !event::poll(timeout)? {
            if last_tick.elapsed() >= TICK_RATE {
                last_tick = Instant::now();
            }
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
            Event::Paste(text) => app.on_paste(&text),
            _ => {}
        }
        dispatch_actions(app, api, event_tx);

        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }
    }
}

/// What a request worker reports back to the UI thread. Each carries the
/// ticket of the request it answers.
#[derive(Debug, Clone)]
enum AppEvent {
    IssuesLoaded {
        ticket: u64,
        issues: Vec<Issue>,
    },
    IssuesFailed {
        ticket: u64,
        message: String,
    },
    IssueLoaded {
        ticket: u64,
        id: String,
        issue: Option<Issue>,
    },
    IssueFailed {
        ticket: u64,
        id: String,
        message: String,
    },
    IssueCreated {
        ticket: u64,
        issue: Option<Issue>,
    },
    IssueCreateFailed {
        ticket: u64,
        message: String,
    },
    ImageUploaded {
        ticket: u64,
        file_name: String,
        url: String,
    },
    ImageUploadFailed {
        ticket: u64,
        message: String,
    },
}

struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn init() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::api::ApiError;
    use crate::app::{LoadState, View};
    use crate::issue::UploadedImage;
    use crate::main_events::apply_event;
    use crate::markdown::IMAGE_MARKER;

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct FakeApi {
        issues: Mutex<Vec<Issue>>,
        fail_list: bool,
    }

    impl FakeApi {
        fn with_issues(issues: Vec<Issue>) -> Self {
            Self {
                issues: Mutex::new(issues),
                fail_list: false,
            }
        }
    }

    #[async_trait]
    impl IssueApi for FakeApi {
        async fn list_issues(&self) -> Result<Vec<Issue>, ApiError> {
            if self.fail_list {
                return Err(ApiError::Timeout);
            }
            Ok(self.issues.lock().expect("issues lock").clone())
        }

        async fn get_issue(&self, id: &str) -> Result<Option<Issue>, ApiError> {
            let issues = self.issues.lock().expect("issues lock");
            Ok(issues.iter().find(|issue| issue.id == id).cloned())
        }

        async fn create_issue(&self, issue: &NewIssue) -> Result<Option<Issue>, ApiError> {
            let mut issues = self.issues.lock().expect("issues lock");
            let created = Issue {
                id: format!("issue-{}", issues.len() + 1),
                title: issue.title.clone(),
                body: issue.body.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            issues.push(created.clone());
            Ok(Some(created))
        }

        async fn upload_image(&self, path: &Path) -> Result<UploadedImage, ApiError> {
            Ok(UploadedImage {
                url: format!("https://cdn.test/{}", upload_file_name(path)),
            })
        }
    }

    fn issue(id: &str, title: &str, body: &str, created_at: &str) -> Issue {
        Issue {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: created_at.to_string(),
        }
    }

    /// Sends whatever the app queued to the workers and applies the next answer.
    fn round_trip(
        app: &mut App,
        api: &Arc<dyn IssueApi>,
        event_tx: &Sender<AppEvent>,
        event_rx: &Receiver<AppEvent>,
    ) -> AppEvent {
        dispatch_actions(app, api, event_tx);
        let event = event_rx.recv_timeout(WAIT).expect("worker answered");
        apply_event(app, event.clone());
        event
    }

    fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| ui::draw(frame, app))
            .expect("draw frame");
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (buffer.area.left()..buffer.area.right())
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn worker_reports_listed_issues() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::with_issues(vec![issue(
            "a",
            "First",
            "",
            "2024-01-01T00:00:00Z",
        )]));
        let (event_tx, event_rx) = mpsc::channel();

        main_requests::start_list_issues(api, 7, event_tx);

        match event_rx.recv_timeout(WAIT).expect("event") {
            AppEvent::IssuesLoaded { ticket, issues } => {
                assert_eq!(ticket, 7);
                assert_eq!(issues.len(), 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn worker_reports_list_failure_with_message() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        let (event_tx, event_rx) = mpsc::channel();

        main_requests::start_list_issues(api, 3, event_tx);

        match event_rx.recv_timeout(WAIT).expect("event") {
            AppEvent::IssuesFailed { ticket, message } => {
                assert_eq!(ticket, 3);
                assert_eq!(message, "request timed out");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn worker_reports_unknown_issue_as_missing() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::default());
        let (event_tx, event_rx) = mpsc::channel();

        main_requests::start_fetch_issue(api, 1, "nope".to_string(), event_tx);

        match event_rx.recv_timeout(WAIT).expect("event") {
            AppEvent::IssueLoaded { id, issue, .. } => {
                assert_eq!(id, "nope");
                assert!(issue.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn worker_names_uploaded_file() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::default());
        let (event_tx, event_rx) = mpsc::channel();

        main_requests::start_upload_image(api, 9, PathBuf::from("/tmp/screen shot.png"), event_tx);

        match event_rx.recv_timeout(WAIT).expect("event") {
            AppEvent::ImageUploaded {
                ticket,
                file_name,
                url,
            } => {
                assert_eq!(ticket, 9);
                assert_eq!(file_name, "screen shot.png");
                assert_eq!(url, "https://cdn.test/screen shot.png");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn late_detail_answer_for_previous_issue_is_dropped() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::with_issues(vec![
            issue("a", "Alpha", "first", "2024-01-02T00:00:00Z"),
            issue("b", "Beta", "second", "2024-01-01T00:00:00Z"),
        ]));
        let (event_tx, event_rx) = mpsc::channel();
        let mut app = App::new(None);

        app.open_issue("a");
        let stale_ticket = match app.take_actions().as_slice() {
            [AppAction::FetchIssue { ticket, .. }] => *ticket,
            other => panic!("unexpected actions {:?}", other),
        };
        app.open_issue("b");
        round_trip(&mut app, &api, &event_tx, &event_rx);

        apply_event(
            &mut app,
            AppEvent::IssueLoaded {
                ticket: stale_ticket,
                id: "a".to_string(),
                issue: Some(issue("a", "Alpha", "first", "2024-01-02T00:00:00Z")),
            },
        );

        let shown = app.detail().and_then(|detail| detail.issue()).map(|issue| issue.title.clone());
        assert_eq!(shown.as_deref(), Some("Beta"));
    }

    #[test]
    fn list_failure_keeps_rows_already_loaded() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::with_issues(vec![issue(
            "a",
            "Alpha",
            "",
            "2024-01-02T00:00:00Z",
        )]));
        let failing: Arc<dyn IssueApi> = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        let (event_tx, event_rx) = mpsc::channel();
        let mut app = App::new(None);
        app.open_issues();
        round_trip(&mut app, &api, &event_tx, &event_rx);

        app.on_key(key(KeyCode::Char('r')));
        round_trip(&mut app, &failing, &event_tx, &event_rx);

        assert_eq!(app.issues().len(), 1);
        assert!(app.status().starts_with("Failed to load issues"));
    }

    #[test]
    fn create_issue_with_image_end_to_end() {
        let api: Arc<dyn IssueApi> = Arc::new(FakeApi::with_issues(vec![issue(
            "old",
            "Older report",
            "plain",
            "2020-05-01T10:00:00Z",
        )]));
        let (event_tx, event_rx) = mpsc::channel();
        let mut app = App::new(None);
        app.open_issues();
        round_trip(&mut app, &api, &event_tx, &event_rx);

        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.view(), View::Composer);
        app.on_paste("Bug");
        app.on_key(key(KeyCode::Tab));
        app.on_paste("See ![x](http://e/x.png)");
        app.on_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        let created = round_trip(&mut app, &api, &event_tx, &event_rx);
        assert!(matches!(created, AppEvent::IssueCreated { issue: Some(_), .. }));
        assert_eq!(app.view(), View::Issues);
        round_trip(&mut app, &api, &event_tx, &event_rx);

        let top = app.issues_for_view()[0].clone();
        assert_eq!(top.title, "Bug");
        assert!(top.has_image());
        assert_eq!(app.selected_issue_row().map(|issue| issue.id.as_str()), Some(top.id.as_str()));

        let list = draw(&mut app, 80, 20);
        let bug_row = (0..list.area.height)
            .map(|y| row_text(&list, y))
            .find(|row| row.contains("Bug"))
            .expect("bug row");
        assert!(bug_row.contains("[image]"));

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.current_issue_id(), Some(top.id.as_str()));
        round_trip(&mut app, &api, &event_tx, &event_rx);
        assert!(matches!(
            app.detail().map(|detail| detail.load()),
            Some(LoadState::Loaded(_))
        ));

        let width = 40;
        let detail = draw(&mut app, width, 16);
        let marker = IMAGE_MARKER.trim_end();
        let image_row = (0..detail.area.height)
            .find(|&y| row_text(&detail, y).contains(marker))
            .expect("image element rendered");
        // The description panel's right border sits at column width - 3.
        let border_x = width - 3;
        assert_eq!(detail[(border_x, image_row)].symbol(), "│");
        let inside = (0..border_x)
            .map(|x| detail[(x, image_row)].symbol().to_string())
            .collect::<String>();
        assert!(inside.contains(marker));
        assert!(inside.contains("x"));
    }
}
