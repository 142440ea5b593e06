use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{bail, Context, Result};
use engine_logging::{engine_info, engine_warn};
use img2pdf_core::{update, AppState, ConvertMode, Msg, SessionSettings, SubmissionState};
use img2pdf_engine::{check_health, DirectorySaver, EngineHandle};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::files::source_files;
use super::shell::{parse_line, HELP};
use super::ui::render::{add_summary, Renderer};
use crate::cli::ConvertArgs;

/// Everything the owner loop reacts to. Core messages plus the few shell
/// requests that only concern presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppInput {
    Core(Msg),
    Alert(String),
    List,
    Help,
    Quit,
}

type Inbox = mpsc::Receiver<AppInput>;

/// Owns the session state. Every message passes through `dispatch` on one
/// thread, so updates are applied in arrival order.
struct App {
    state: AppState,
    effects: EffectRunner,
    renderer: Renderer,
}

impl App {
    fn start(config: &AppConfig, show_listing: bool) -> Result<(Self, Inbox, mpsc::Sender<AppInput>)> {
        let saver = Arc::new(DirectorySaver::new(config.download_dir.clone()));
        let (engine, events) = EngineHandle::start(config.convert_settings(), saver)
            .context("failed to start the conversion engine")?;
        let (tx, rx) = mpsc::channel();
        let app = Self::new(
            config.session_settings(),
            EffectRunner::new(engine, events, tx.clone()),
            Renderer::new(show_listing),
        );
        engine_info!(
            "Session started server={} download_dir={:?}",
            config.server_url,
            config.download_dir
        );
        Ok((app, rx, tx))
    }

    fn new(settings: SessionSettings, effects: EffectRunner, renderer: Renderer) -> Self {
        Self {
            state: AppState::with_settings(settings),
            effects,
            renderer,
        }
    }

    /// Apply `msg`, run the effects it produced and re-render when dirty.
    /// Returns the alerts raised.
    fn dispatch(&mut self, msg: Msg) -> Vec<String> {
        let picked = matches!(msg, Msg::FilesPicked(_));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let alerts = self.effects.enqueue(effects);
        for alert in &alerts {
            self.renderer.alert(alert);
        }
        if was_dirty {
            let view = self.state.view();
            self.renderer.render(&view);
            if picked && alerts.is_empty() {
                if let Some(summary) = view.last_add.as_ref().and_then(add_summary) {
                    self.renderer.note(&summary);
                }
            }
        }
        alerts
    }

    fn submission(&self) -> SubmissionState {
        self.state.submission()
    }
}

/// Pick `args.files`, convert them once and wait for the outcome.
/// Returns whether an artifact was saved.
pub fn run_convert(config: &AppConfig, args: ConvertArgs) -> Result<bool> {
    let mode = args
        .mode
        .as_deref()
        .map(str::parse::<ConvertMode>)
        .transpose()?;
    let (picked, skipped) = source_files(&args.files);
    for path in &skipped {
        eprintln!("! skipped {}: not a readable file", path.display());
    }

    let (mut app, rx, _tx) = App::start(config, false)?;

    let mut setup = vec![Msg::FilesPicked(picked)];
    setup.extend(mode.map(Msg::ModeSelected));
    setup.extend(args.name.map(Msg::BaseNameEdited));
    setup.extend(args.quality.map(Msg::QualityChanged));
    for msg in setup {
        if let Some(alert) = app.dispatch(msg).into_iter().next() {
            bail!(alert);
        }
    }
    if let Some(alert) = app.dispatch(Msg::ConvertClicked).into_iter().next() {
        bail!(alert);
    }

    for input in rx.iter() {
        let AppInput::Core(msg) = input else {
            continue;
        };
        app.dispatch(msg);
        match app.submission() {
            SubmissionState::Succeeded => return Ok(true),
            SubmissionState::Failed => return Ok(false),
            SubmissionState::Idle | SubmissionState::InFlight => {}
        }
    }
    bail!("conversion engine stopped unexpectedly")
}

/// Interactive session reading commands from stdin.
pub fn run_shell(config: &AppConfig) -> Result<()> {
    let (mut app, rx, tx) = App::start(config, true)?;
    spawn_stdin_reader(tx);
    app.renderer.note(HELP);

    for input in rx.iter() {
        match input {
            AppInput::Core(msg) => {
                app.dispatch(msg);
            }
            AppInput::Alert(text) => app.renderer.alert(&text),
            AppInput::List => {
                let view = app.state.view();
                app.renderer.print_listing(&view);
            }
            AppInput::Help => app.renderer.note(HELP),
            AppInput::Quit => {
                if app.submission() == SubmissionState::InFlight {
                    app.dispatch(Msg::CancelClicked);
                }
                break;
            }
        }
    }
    engine_info!("Shell session ended");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            for input in parse_line(&line) {
                if tx.send(input).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(AppInput::Quit);
    });
}

pub fn run_health(config: &AppConfig) -> Result<bool> {
    match check_health(config.convert_settings()) {
        Ok(report) => {
            println!("{}: {}", config.server_url, report.status);
            if !report.features.is_empty() {
                println!("features: {}", report.features.join(", "));
            }
            Ok(report.status.eq_ignore_ascii_case("healthy"))
        }
        Err(err) => {
            eprintln!("{}: unreachable ({err})", config.server_url);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bytes::Bytes;
    use img2pdf_core::{FileHandle, LastResult, SourceFile};
    use img2pdf_engine::{
        Artifact, ConversionClient, ConvertRequest, FailureKind, ProgressSink, SubmissionId,
        SubmitError,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Answers every submission with a small PDF, or a server failure.
    struct StubClient {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ConversionClient for StubClient {
        async fn submit(
            &self,
            _submission_id: SubmissionId,
            request: &ConvertRequest,
            _sink: &dyn ProgressSink,
        ) -> Result<Artifact, SubmitError> {
            if self.fail {
                return Err(SubmitError {
                    kind: FailureKind::HttpStatus(500),
                    message: "disk full".to_string(),
                });
            }
            Ok(Artifact {
                filename: format!("{}.pdf", request.filename),
                content_type: Some("application/pdf".to_string()),
                bytes: Bytes::from_static(b"%PDF"),
            })
        }
    }

    fn app_with(fail: bool, downloads: &TempDir) -> (App, Inbox) {
        let saver = Arc::new(DirectorySaver::new(downloads.path()));
        let (engine, events) =
            EngineHandle::start_with_client(Arc::new(StubClient { fail }), saver).unwrap();
        let (tx, rx) = mpsc::channel();
        let app = App::new(
            SessionSettings::default(),
            EffectRunner::new(engine, events, tx),
            Renderer::new(false),
        );
        (app, rx)
    }

    fn image(name: &str) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            byte_size: 3,
            mime_type: "image/png".to_string(),
            last_modified_ms: 7,
            handle: FileHandle::new(format!("/pics/{name}")),
        }
    }

    fn run_until_settled(app: &mut App, rx: &Inbox) {
        while app.submission() == SubmissionState::InFlight {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                AppInput::Core(msg) => {
                    app.dispatch(msg);
                }
                other => panic!("unexpected input {other:?}"),
            }
        }
    }

    #[test]
    fn convert_flows_through_owner_loop_to_saved_file() {
        let downloads = TempDir::new().unwrap();
        let (mut app, rx) = app_with(false, &downloads);

        assert!(app.dispatch(Msg::FilesPicked(vec![image("cat.png")])).is_empty());
        assert!(app.dispatch(Msg::ConvertClicked).is_empty());
        assert_eq!(app.submission(), SubmissionState::InFlight);
        run_until_settled(&mut app, &rx);

        assert_eq!(app.submission(), SubmissionState::Succeeded);
        let saved = std::fs::read(downloads.path().join("cat.pdf")).unwrap();
        assert_eq!(saved, b"%PDF");
        assert!(matches!(
            app.state.view().last_result,
            Some(LastResult::Saved(ref artifact)) if artifact.filename == "cat.pdf"
        ));
    }

    #[test]
    fn server_failure_surfaces_as_alert_and_failed_state() {
        let downloads = TempDir::new().unwrap();
        let (mut app, rx) = app_with(true, &downloads);

        app.dispatch(Msg::FilesPicked(vec![image("cat.png")]));
        app.dispatch(Msg::ConvertClicked);
        let mut alerts = Vec::new();
        while app.submission() == SubmissionState::InFlight {
            if let AppInput::Core(msg) = rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                alerts.extend(app.dispatch(msg));
            }
        }

        assert_eq!(app.submission(), SubmissionState::Failed);
        assert_eq!(alerts, vec!["disk full".to_string()]);
        assert_eq!(app.state.files().len(), 1);
    }

    #[test]
    fn rejected_pick_reports_alert() {
        let downloads = TempDir::new().unwrap();
        let (mut app, _rx) = app_with(false, &downloads);

        let alerts = app.dispatch(Msg::FilesPicked(Vec::new()));

        assert_eq!(alerts, vec!["no image files in selection".to_string()]);
        assert!(app.state.files().is_empty());
    }
}
