use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{
    emit_stage, ChannelProgressSink, ConversionClient, HealthReport, ProgressSink,
};
use crate::save::ArtifactSaver;
use crate::{
    ConvertRequest, ConvertSettings, EngineEvent, FailureKind, ReqwestConversionClient, SavedFile,
    Stage, SubmissionId, SubmitError,
};

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        request: ConvertRequest,
    },
    Cancel {
        submission_id: SubmissionId,
    },
}

type CancelTokens = Arc<Mutex<HashMap<SubmissionId, CancellationToken>>>;

/// Sends commands to the engine thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving end of the engine's progress and completion events.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Start the engine with the HTTP client built from `settings`.
    pub fn start(
        settings: ConvertSettings,
        saver: Arc<dyn ArtifactSaver>,
    ) -> io::Result<(EngineHandle, EngineEvents)> {
        Self::start_with_client(Arc::new(ReqwestConversionClient::new(settings)), saver)
    }

    pub fn start_with_client(
        client: Arc<dyn ConversionClient>,
        saver: Arc<dyn ArtifactSaver>,
    ) -> io::Result<(EngineHandle, EngineEvents)> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let tokens: CancelTokens = Arc::new(Mutex::new(HashMap::new()));

        thread::Builder::new()
            .name("img2pdf-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Submit {
                            submission_id,
                            request,
                        } => {
                            let token = CancellationToken::new();
                            if let Ok(mut map) = tokens.lock() {
                                map.insert(submission_id, token.clone());
                            }
                            let client = client.clone();
                            let saver = saver.clone();
                            let tokens = tokens.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                let sink = ChannelProgressSink::new(event_tx.clone());
                                let result = run_submission(
                                    client.as_ref(),
                                    saver,
                                    submission_id,
                                    request,
                                    &sink,
                                    token,
                                )
                                .await;
                                if let Ok(mut map) = tokens.lock() {
                                    map.remove(&submission_id);
                                }
                                let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                                    submission_id,
                                    result,
                                });
                            });
                        }
                        EngineCommand::Cancel { submission_id } => {
                            let token = tokens
                                .lock()
                                .ok()
                                .and_then(|map| map.get(&submission_id).cloned());
                            match token {
                                Some(token) => {
                                    engine_info!("Cancelling submission {}", submission_id);
                                    token.cancel();
                                }
                                None => engine_warn!(
                                    "Cancel for unknown submission {}",
                                    submission_id
                                ),
                            }
                        }
                    }
                }
                // Every handle is gone; unfinished submissions are abandoned.
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok((EngineHandle { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn submit(&self, submission_id: SubmissionId, request: ConvertRequest) {
        if self
            .cmd_tx
            .send(EngineCommand::Submit {
                submission_id,
                request,
            })
            .is_err()
        {
            engine_error!("Engine thread gone; submission {} dropped", submission_id);
        }
    }

    pub fn cancel(&self, submission_id: SubmissionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { submission_id });
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

/// Probe `GET /health` from synchronous code. Must not be called from
/// inside a tokio runtime.
pub fn check_health(settings: ConvertSettings) -> Result<HealthReport, SubmitError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;
    let client = ReqwestConversionClient::new(settings);
    runtime.block_on(client.health())
}

async fn run_submission(
    client: &dyn ConversionClient,
    saver: Arc<dyn ArtifactSaver>,
    submission_id: SubmissionId,
    request: ConvertRequest,
    sink: &dyn ProgressSink,
    token: CancellationToken,
) -> Result<SavedFile, SubmitError> {
    let artifact = tokio::select! {
        result = client.submit(submission_id, &request, sink) => result?,
        _ = token.cancelled() => {
            return Err(SubmitError::new(FailureKind::Cancelled, "cancelled by user"));
        }
    };

    let fallback = format!("{}.pdf", request.filename);
    let saved = tokio::task::spawn_blocking(move || saver.save(&artifact, &fallback))
        .await
        .map_err(|err| SubmitError::new(FailureKind::Save, err.to_string()))?
        .map_err(|err| SubmitError::new(FailureKind::Save, err.to_string()))?;

    emit_stage(sink, submission_id, Stage::Done);
    Ok(saved)
}
