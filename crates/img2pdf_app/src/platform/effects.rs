use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use img2pdf_core::{
    ConversionRequest, Effect, Msg, ProgressStage, SavedArtifact, SubmissionFailure,
};
use img2pdf_engine::{
    ConvertRequest, EngineEvent, EngineEvents, EngineHandle, FailureKind, SavedFile, Stage,
    SubmitError, UploadFile,
};

use super::app::AppInput;

/// Carries out the core's effects. Engine work goes to the engine thread;
/// alerts are handed back for the front end to show.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: EngineEvents, tx: mpsc::Sender<AppInput>) -> Self {
        spawn_event_pump(events, tx);
        Self { engine }
    }

    /// Run `effects` in order and return the alert texts among them.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut alerts = Vec::new();
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    request,
                } => {
                    engine_info!(
                        "Submit submission_id={} files={} mode={} filename={}",
                        submission_id,
                        request.files.len(),
                        request.mode,
                        request.filename
                    );
                    self.engine.submit(submission_id, to_engine_request(request));
                }
                Effect::CancelSubmission { submission_id } => {
                    self.engine.cancel(submission_id);
                }
                Effect::ResetFilePicker => {
                    // Paths are typed fresh each time; nothing to reset.
                    engine_debug!("ResetFilePicker");
                }
                Effect::Alert(text) => alerts.push(text),
            }
        }
        alerts
    }
}

fn spawn_event_pump(events: EngineEvents, tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if tx.send(AppInput::Core(event_to_msg(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn to_engine_request(request: ConversionRequest) -> ConvertRequest {
    ConvertRequest {
        convert_type: request.convert_type().to_string(),
        files: request
            .files
            .into_iter()
            .map(|file| UploadFile {
                path: file.handle.path().to_path_buf(),
                name: file.name,
                mime_type: file.mime_type,
            })
            .collect(),
        filename: request.filename,
        quality: request.quality.get(),
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::SubmissionProgress {
            submission_id: progress.submission_id,
            stage: map_stage(progress.stage),
        },
        EngineEvent::SubmissionCompleted {
            submission_id,
            result,
        } => {
            if let Err(err) = &result {
                engine_warn!("Submission {} failed: {}", submission_id, err);
            }
            Msg::SubmissionDone {
                submission_id,
                result: result.map(saved_artifact).map_err(map_failure),
            }
        }
    }
}

fn map_stage(stage: Stage) -> ProgressStage {
    match stage {
        Stage::Preparing => ProgressStage::Preparing,
        Stage::Uploading => ProgressStage::Uploading,
        Stage::Converting => ProgressStage::Converting,
        Stage::PreparingDownload => ProgressStage::PreparingDownload,
        Stage::Done => ProgressStage::Done,
    }
}

fn saved_artifact(saved: SavedFile) -> SavedArtifact {
    SavedArtifact {
        location: saved.path.display().to_string(),
        filename: saved.filename,
        byte_len: saved.byte_len,
    }
}

fn map_failure(err: SubmitError) -> SubmissionFailure {
    match err.kind {
        FailureKind::HttpStatus(status) => SubmissionFailure::Server {
            status,
            message: err.message,
        },
        FailureKind::Cancelled => SubmissionFailure::Cancelled,
        FailureKind::ReadFile | FailureKind::Save => SubmissionFailure::Local {
            message: err.message,
        },
        _ => SubmissionFailure::Transport {
            message: err.message,
        },
    }
}
