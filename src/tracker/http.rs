use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{TrackerApi, TrackerError};
use crate::config::Credentials;
use crate::model::tracker::{
    Component, CreatedIssue, IssueRef, IssueSearch, NewComponent, NewIssue, Project,
    ProjectSearch, Transition, TransitionList, TransitionRequest,
};

pub const API_PREFIX: &str = "/rest/api/3";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTracker {
    api_base: String,
    auth_header: Option<String>,
    client: reqwest::Client,
}

impl HttpTracker {
    pub fn new(base_url: &str, credentials: Option<&Credentials>) -> Result<Self> {
        let auth_header = credentials.map(|c| {
            let creds = format!("{}:{}", c.user, c.api_token);
            let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
            format!("Basic {encoded}")
        });
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_base: format!("{}{API_PREFIX}", base_url.trim_end_matches('/')),
            auth_header,
            client,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.auth_header.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.auth_header {
            Some(auth) => builder.header("Authorization", auth),
            None => builder,
        }
    }

    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<Response, TrackerError> {
        builder.send().await.map_err(|source| TrackerError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Sends and rejects any non-2xx answer.
    async fn send_ok(&self, url: &str, builder: RequestBuilder) -> Result<Response, TrackerError> {
        let resp = self.send(url, builder).await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(status_error(url, resp).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<T, TrackerError> {
        let resp = self.send_ok(url, builder).await?;
        resp.json().await.map_err(|source| TrackerError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

async fn status_error(url: &str, resp: Response) -> TrackerError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    TrackerError::Status {
        url: url.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl TrackerApi for HttpTracker {
    async fn search_projects(&self, query: Option<&str>) -> Result<Vec<Project>, TrackerError> {
        let url = self.url("/project/search");
        let mut builder = self.request(Method::GET, &url);
        if let Some(q) = query {
            builder = builder.query(&[("query", q)]);
        }
        let search: ProjectSearch = self.get_json(&url, builder).await?;
        Ok(search.values)
    }

    async fn project_components(&self, project_key: &str) -> Result<Vec<Component>, TrackerError> {
        let url = self.url(&format!(
            "/project/{}/components",
            urlencoding::encode(project_key)
        ));
        let builder = self.request(Method::GET, &url);
        self.get_json(&url, builder).await
    }

    async fn create_component(
        &self,
        project_key: &str,
        name: &str,
    ) -> Result<Component, TrackerError> {
        let url = self.url("/component");
        let body = NewComponent {
            project: project_key.to_string(),
            name: name.to_string(),
        };
        let builder = self.request(Method::POST, &url).json(&body);
        self.get_json(&url, builder).await
    }

    async fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
    ) -> Result<Vec<IssueRef>, TrackerError> {
        let url = self.url("/search");
        let builder = self
            .request(Method::GET, &url)
            .query(&[("jql", jql)])
            .query(&[("maxResults", max_results)]);
        let search: IssueSearch = self.get_json(&url, builder).await?;
        Ok(search.issues)
    }

    async fn issue_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, TrackerError> {
        let url = self.url(&format!(
            "/issue/{}/transitions",
            urlencoding::encode(issue_key)
        ));
        let builder = self.request(Method::GET, &url);
        let list: TransitionList = self.get_json(&url, builder).await?;
        Ok(list.transitions)
    }

    async fn apply_transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<(), TrackerError> {
        let url = self.url(&format!(
            "/issue/{}/transitions",
            urlencoding::encode(issue_key)
        ));
        let builder = self
            .request(Method::POST, &url)
            .json(&TransitionRequest::new(transition_id));
        let resp = self.send(&url, builder).await?;
        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(status_error(&url, resp).await),
        }
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<String, TrackerError> {
        let url = self.url("/issue");
        let builder = self.request(Method::POST, &url).json(issue);
        let created: CreatedIssue = self.get_json(&url, builder).await?;
        Ok(created.key)
    }
}
