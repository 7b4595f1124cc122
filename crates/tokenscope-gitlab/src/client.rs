use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokenscope_core::{
    AllowlistEntry, AllowlistKind, EntityKind, Error, GitLabApi, Group, Project, Result,
    ScopeState,
};
use tracing::debug;
use url::Url;

/// Connection settings for [`GitLabClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Instance URL, e.g. `https://gitlab.example.com`.
    pub base_url: String,

    /// Personal, project or group access token with `api` scope.
    pub token: String,

    /// HTTP request timeout (default: 30 seconds).
    pub request_timeout: Duration,

    /// Page size for list endpoints (default: 100, the GitLab maximum).
    pub per_page: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            request_timeout: Duration::from_secs(30),
            per_page: 100,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self
    }
}

pub struct GitLabClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
    per_page: u32,
}

impl GitLabClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut api_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| Error::config(format!("invalid GitLab URL {}: {e}", config.base_url)))?;
        api_url
            .path_segments_mut()
            .map_err(|()| Error::config(format!("invalid GitLab URL {}", config.base_url)))?
            .pop_if_empty()
            .extend(["api", "v4"]);

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url,
            token: config.token,
            per_page: config.per_page,
        })
    }

    /// API URL for the given path segments. Each segment is percent-encoded,
    /// so a full path like `group/project` stays a single segment.
    fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn scope_url(&self, project_id: u64, tail: &[&str]) -> Url {
        let id = project_id.to_string();
        let mut segments = vec!["projects", id.as_str(), "job_token_scope"];
        segments.extend_from_slice(tail);
        self.endpoint(segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json")
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        req.send()
            .await
            .map_err(|e| Error::transport(format!("Failed to connect to GitLab: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self.send(self.request(Method::GET, url)).await?;
        let body = handle_response(resp).await?;
        decode(&body)
    }

    /// Look up a project or group, mapping 404 to a resolution error.
    async fn get_entity<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        collection: &str,
        reference: &str,
    ) -> Result<T> {
        let url = self.endpoint([collection, reference]);
        let resp = self.send(self.request(Method::GET, url)).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::resolution(kind, reference));
        }
        let body = handle_response(resp).await?;
        decode(&body)
    }

    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let req = self.request(Method::GET, url.clone()).query(&[
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
            ]);
            let resp = self.send(req).await?;
            let next_page = resp
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());
            let body = handle_response(resp).await?;
            let mut batch: Vec<T> = decode(&body)?;
            let batch_len = batch.len();
            items.append(&mut batch);

            match next_page {
                Some(next) if next > page && batch_len > 0 => page = next,
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl GitLabApi for GitLabClient {
    async fn get_project(&self, reference: &str) -> Result<Project> {
        self.get_entity(EntityKind::Project, "projects", reference)
            .await
    }

    async fn get_group(&self, reference: &str) -> Result<Group> {
        self.get_entity(EntityKind::Group, "groups", reference).await
    }

    async fn get_job_token_scope(&self, project_id: u64) -> Result<ScopeState> {
        self.get_json(self.scope_url(project_id, &[])).await
    }

    async fn update_job_token_scope(&self, project_id: u64, enabled: bool) -> Result<()> {
        let req = self
            .request(Method::PATCH, self.scope_url(project_id, &[]))
            .json(&json!({ "enabled": enabled }));
        handle_response(self.send(req).await?).await?;
        debug!(project_id, enabled, "PATCH job_token_scope");
        Ok(())
    }

    async fn list_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
    ) -> Result<Vec<AllowlistEntry>> {
        self.get_all_pages(self.scope_url(project_id, &[kind.path_segment()]))
            .await
    }

    async fn add_to_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(kind.target_key().to_string(), Value::from(target_id));
        let req = self
            .request(
                Method::POST,
                self.scope_url(project_id, &[kind.path_segment()]),
            )
            .json(&body);
        handle_response(self.send(req).await?).await?;
        debug!(project_id, %kind, target_id, "POST allowlist entry");
        Ok(())
    }

    async fn remove_from_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        let target = target_id.to_string();
        let url = self.scope_url(project_id, &[kind.path_segment(), target.as_str()]);
        handle_response(self.send(self.request(Method::DELETE, url)).await?).await?;
        debug!(project_id, %kind, target_id, "DELETE allowlist entry");
        Ok(())
    }
}

/// Body of a successful response, or an API error built from GitLab's
/// `message`/`error` fields.
async fn handle_response(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| Error::transport(format!("Failed to read GitLab response: {e}")))?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| error_message(&json))
            .unwrap_or(body);
        return Err(Error::api(status.as_u16(), message));
    }

    Ok(body)
}

fn error_message(json: &Value) -> Option<String> {
    let field = json.get("message").or_else(|| json.get("error"))?;
    match field {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Failed to parse response JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            GitLabClient::new(ClientConfig::new("https://example.com/gitlab/", "t")).unwrap();
        assert_eq!(
            client.endpoint(["projects", "acme/app"]).as_str(),
            "https://example.com/gitlab/api/v4/projects/acme%2Fapp"
        );
    }

    #[test]
    fn test_scope_url() {
        let client = GitLabClient::new(ClientConfig::new("https://example.com", "t")).unwrap();
        assert_eq!(
            client.scope_url(5, &["groups_allowlist", "9"]).as_str(),
            "https://example.com/api/v4/projects/5/job_token_scope/groups_allowlist/9"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GitLabClient::new(ClientConfig::new("not a url", "t")).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(&json!({"message": "403 Forbidden"})).as_deref(),
            Some("403 Forbidden")
        );
        assert_eq!(
            error_message(&json!({"message": {"target_project_id": ["is invalid"]}})).as_deref(),
            Some(r#"{"target_project_id":["is invalid"]}"#)
        );
        assert_eq!(
            error_message(&json!({"error": "invalid_token"})).as_deref(),
            Some("invalid_token")
        );
        assert_eq!(error_message(&json!({})), None);
    }

    #[test]
    fn test_per_page_clamped() {
        assert_eq!(ClientConfig::new("u", "t").with_per_page(500).per_page, 100);
        assert_eq!(ClientConfig::new("u", "t").with_per_page(0).per_page, 1);
    }
}
