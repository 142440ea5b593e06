use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

use crate::{Artifact, FailureKind, SubmitError};

/// JSON body of a deferred reply: the artifact must be fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeferredReply {
    pub download_url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Whether the declared content type is `application/json` (parameters ignored).
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// User-facing message for a failed `/convert`: the string `detail` of a
/// JSON body when present, else `server error <status>`.
pub fn server_error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::trim)
                .filter(|detail| !detail.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("server error {status}"))
}

pub fn parse_deferred_reply(body: &[u8]) -> Result<DeferredReply, SubmitError> {
    let reply: DeferredReply = serde_json::from_slice(body).map_err(|err| {
        SubmitError::new(
            FailureKind::InvalidResponse,
            format!("unexpected JSON reply: {err}"),
        )
    })?;
    if reply.download_url.trim().is_empty() {
        return Err(SubmitError::new(
            FailureKind::InvalidResponse,
            "JSON reply has an empty download_url",
        ));
    }
    Ok(reply)
}

/// Turns a successful `/convert` reply into the artifact to save.
pub(crate) struct ResponseResolver<'a> {
    pub client: &'a reqwest::Client,
    pub base_url: &'a Url,
    pub max_bytes: u64,
}

impl ResponseResolver<'_> {
    pub async fn resolve(
        &self,
        response: reqwest::Response,
        base_name: &str,
    ) -> Result<Artifact, SubmitError> {
        let content_type = content_type_of(&response);
        if !is_json_content_type(content_type.as_deref()) {
            let bytes = read_body(response, self.max_bytes).await?;
            return Ok(Artifact {
                filename: format!("{base_name}.pdf"),
                content_type,
                bytes,
            });
        }

        let body = read_body(response, self.max_bytes).await?;
        let reply = parse_deferred_reply(&body)?;
        let url = self.base_url.join(reply.download_url.trim()).map_err(|err| {
            SubmitError::new(
                FailureKind::InvalidUrl,
                format!("bad download_url {:?}: {err}", reply.download_url),
            )
        })?;
        self.fetch_deferred(url, reply.filename, base_name).await
    }

    async fn fetch_deferred(
        &self,
        url: Url,
        filename: Option<String>,
        base_name: &str,
    ) -> Result<Artifact, SubmitError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(as_download_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::new(
                FailureKind::Download,
                format!("download failed: server error {}", status.as_u16()),
            ));
        }
        let content_type = content_type_of(&response);
        let bytes = read_body(response, self.max_bytes)
            .await
            .map_err(as_download_failure)?;
        Ok(Artifact {
            filename: filename
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| format!("{base_name}.zip")),
            content_type,
            bytes,
        })
    }
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Stream a body into memory, failing once it grows past `max_bytes`.
pub(crate) async fn read_body(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Bytes, SubmitError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(too_large(max_bytes, Some(content_len)));
        }
    }

    let mut buffer = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = buffer.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(too_large(max_bytes, Some(next_len)));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SubmitError {
    SubmitError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}

fn as_download_error(err: reqwest::Error) -> SubmitError {
    as_download_failure(map_reqwest_error(err))
}

fn as_download_failure(err: SubmitError) -> SubmitError {
    match err.kind {
        FailureKind::TooLarge { .. } => err,
        _ => SubmitError::new(
            FailureKind::Download,
            format!("download failed: {}", err.message),
        ),
    }
}
