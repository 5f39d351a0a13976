// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of [`RemoteApi`] using reqwest.
//!
//! Requests carry the bearer token last handed over by the synchronizer. Responses are classified into
//! [`ApiError`] variants so the synchronizer can tell retryable failures from
//! permanent ones.

use std::sync::RwLock;
use std::time::Duration;

use ireport_core::{NewIncident, ProfilePatch, ReactionType};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::json;

use super::api::{ApiError, ApiFuture, ApiResult, RemoteApi, Replayed};
use crate::error::{Error, Result};

/// Default file name for uploaded incident images.
const DEFAULT_IMAGE_NAME: &str = "incident.jpg";

/// Remote API client speaking HTTP/JSON to the reporting backend.
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpApi {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Validation {
                status: 0,
                message: format!("invalid endpoint '{}': {}", path, e),
            })
    }

    /// `incidents/{id}/{action}` with the id percent-encoded as a single segment.
    fn incident_endpoint(&self, incident_id: &str, action: &str) -> ApiResult<Url> {
        if matches!(incident_id, "" | "." | "..") {
            return Err(ApiError::Validation {
                status: 0,
                message: format!("invalid incident ID '{}'", incident_id),
            });
        }
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation {
                status: 0,
                message: format!("API URL '{}' cannot hold a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["incidents", incident_id, action]);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Replayed> {
        let token = self.token.read().ok().and_then(|t| t.clone());
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        // The body is informational; an unparsable body still means success.
        let body: Option<serde_json::Value> = response.json().await.ok();
        Ok(Replayed {
            resource_id: body.as_ref().and_then(resource_id),
        })
    }

    async fn post_incident(&self, incident: &NewIncident) -> ApiResult<Replayed> {
        let mut form = Form::new()
            .text("title", incident.title.clone())
            .text("description", incident.description.clone())
            .text("category", incident.category.as_str());

        if let Some(location) = &incident.location {
            form = form.text("location", location.clone());
        }

        if let Some(image) = &incident.image {
            let bytes = tokio::fs::read(&image.path)
                .await
                .map_err(|e| ApiError::Io(format!("{}: {}", image.path, e)))?;
            let name = image
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string());
            let part = Part::bytes(bytes)
                .file_name(name)
                .mime_str(&image.mime_type)
                .map_err(|e| ApiError::Io(format!("invalid image type: {}", e)))?;
            form = form.part("image", part);
        }

        let url = self.endpoint("incidents/")?;
        self.send(self.client.post(url).multipart(form)).await
    }
}

impl RemoteApi for HttpApi {
    fn create_incident<'a>(&'a self, incident: &'a NewIncident) -> ApiFuture<'a> {
        Box::pin(self.post_incident(incident))
    }

    fn create_comment<'a>(&'a self, incident_id: &'a str, content: &'a str) -> ApiFuture<'a> {
        Box::pin(async move {
            let url = self.incident_endpoint(incident_id, "comments")?;
            let body = json!({ "content": content });
            self.send(self.client.post(url).json(&body)).await
        })
    }

    fn toggle_reaction<'a>(
        &'a self,
        incident_id: &'a str,
        reaction: ReactionType,
    ) -> ApiFuture<'a> {
        Box::pin(async move {
            let url = self.incident_endpoint(incident_id, "reactions")?;
            let body = json!({ "reaction_type": reaction.as_str() });
            self.send(self.client.post(url).json(&body)).await
        })
    }

    fn update_profile<'a>(&'a self, patch: &'a ProfilePatch) -> ApiFuture<'a> {
        Box::pin(async move {
            let url = self.endpoint("users/profile")?;
            self.send(self.client.put(url).json(patch)).await
        })
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

/// Parse a base URL, making sure relative endpoints resolve below its path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| Error::Config(format!("invalid API URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "invalid API URL '{}': must be http:// or https://",
            raw
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Extract the created resource id from a response body.
fn resource_id(body: &serde_json::Value) -> Option<String> {
    match body.get("id")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
