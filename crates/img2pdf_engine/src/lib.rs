//! img2pdf engine: conversion requests, reply resolution and local saving.
mod client;
mod engine;
mod filename;
mod persist;
mod resolve;
mod save;
mod types;

pub use client::{
    ChannelProgressSink, ConversionClient, ConvertSettings, HealthReport, ProgressSink,
    ReqwestConversionClient,
};
pub use engine::{check_health, EngineEvents, EngineHandle};
pub use filename::{numbered_name, safe_artifact_name};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{
    is_json_content_type, parse_deferred_reply, server_error_message, DeferredReply,
};
pub use save::{ArtifactSaver, DirectorySaver};
pub use types::{
    Artifact, ConvertRequest, EngineEvent, FailureKind, SavedFile, Stage, SubmissionId,
    SubmissionProgress, SubmitError, UploadFile,
};
