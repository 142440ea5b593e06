use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::resolve::{map_reqwest_error, read_body, server_error_message, ResponseResolver};
use crate::{
    Artifact, ConvertRequest, EngineEvent, FailureKind, Stage, SubmissionId, SubmissionProgress,
    SubmitError,
};

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    /// Service root; `convert` and `health` are resolved against it.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for one whole exchange, body included.
    pub request_timeout: Duration,
    /// How long the upload may run before progress advances to converting.
    /// Replies arriving earlier still report converting before the download.
    pub converting_hint_after: Duration,
    pub max_artifact_bytes: u64,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            converting_hint_after: Duration::from_millis(400),
            max_artifact_bytes: 512 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

pub(crate) fn emit_stage(sink: &dyn ProgressSink, submission_id: SubmissionId, stage: Stage) {
    sink.emit(EngineEvent::Progress(SubmissionProgress {
        submission_id,
        stage,
    }));
}

#[async_trait::async_trait]
pub trait ConversionClient: Send + Sync {
    /// Upload the request and return the artifact the service produced.
    async fn submit(
        &self,
        submission_id: SubmissionId,
        request: &ConvertRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Artifact, SubmitError>;
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestConversionClient {
    settings: ConvertSettings,
}

impl ReqwestConversionClient {
    pub fn new(settings: ConvertSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConvertSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
    }

    /// Base URL with a trailing slash so relative joins stay below it.
    fn base_url(&self) -> Result<Url, SubmitError> {
        let raw = self.settings.base_url.trim();
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&with_slash)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
    }

    fn endpoint(&self, path: &str) -> Result<Url, SubmitError> {
        self.base_url()?
            .join(path)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub async fn health(&self) -> Result<HealthReport, SubmitError> {
        let client = self.build_client()?;
        let response = client
            .get(self.endpoint("health")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = read_body(response, self.settings.max_artifact_bytes).await?;
        if !status.is_success() {
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                server_error_message(status.as_u16(), &body),
            ));
        }
        serde_json::from_slice(&body).map_err(|err| {
            SubmitError::new(
                FailureKind::InvalidResponse,
                format!("unexpected health reply: {err}"),
            )
        })
    }
}

#[async_trait::async_trait]
impl ConversionClient for ReqwestConversionClient {
    async fn submit(
        &self,
        submission_id: SubmissionId,
        request: &ConvertRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Artifact, SubmitError> {
        emit_stage(sink, submission_id, Stage::Preparing);
        let url = self.endpoint("convert")?;
        let client = self.build_client()?;
        let form = build_form(request).await?;

        engine_info!(
            "Submission {} -> {} files={} convert_type={} filename={} quality={}",
            submission_id,
            url,
            request.files.len(),
            request.convert_type,
            request.filename,
            request.quality
        );
        emit_stage(sink, submission_id, Stage::Uploading);

        let send = client.post(url).multipart(form).send();
        tokio::pin!(send);
        let mut converting_emitted = false;
        let response = tokio::select! {
            result = &mut send => result,
            _ = tokio::time::sleep(self.settings.converting_hint_after) => {
                emit_stage(sink, submission_id, Stage::Converting);
                converting_emitted = true;
                send.await
            }
        }
        .map_err(map_reqwest_error)?;
        // A fast reply still passes the converting checkpoint.
        if !converting_emitted {
            emit_stage(sink, submission_id, Stage::Converting);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = server_error_message(status.as_u16(), &body);
            engine_warn!(
                "Submission {} rejected with status {}: {}",
                submission_id,
                status,
                message
            );
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        emit_stage(sink, submission_id, Stage::PreparingDownload);
        let base_url = self.base_url()?;
        let resolver = ResponseResolver {
            client: &client,
            base_url: &base_url,
            max_bytes: self.settings.max_artifact_bytes,
        };
        let artifact = resolver.resolve(response, &request.filename).await?;
        engine_debug!(
            "Submission {} resolved to {} ({} bytes)",
            submission_id,
            artifact.filename,
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}

/// Multipart body: one `files` part per file in order, then the scalar fields.
pub(crate) async fn build_form(request: &ConvertRequest) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for file in &request.files {
        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            SubmitError::new(
                FailureKind::ReadFile,
                format!("could not read {}: {err}", file.path.display()),
            )
        })?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| {
                SubmitError::new(
                    FailureKind::ReadFile,
                    format!("bad mime type {:?} for {}: {err}", file.mime_type, file.name),
                )
            })?;
        form = form.part("files", part);
    }
    Ok(form
        .text("convert_type", request.convert_type.clone())
        .text("filename", request.filename.clone())
        .text("quality", request.quality.to_string()))
}
