//! In-memory stand-in for the tracker REST API.
//!
//! State lives in a [`MockTracker`] handle rather than in globals, so each
//! test (or server process) owns an isolated copy.

pub mod routes;
pub mod seed;

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::model::tracker::{Component, Issue, IssueRef, Project, Transition};

pub use routes::router;
pub use seed::{default_data, load_seed, TrackerData};

/// Prefix for keys of issues created through the API.
pub const ISSUE_KEY_PREFIX: &str = "SD";
pub const DEFAULT_MAX_RESULTS: usize = 50;
/// Status every transition lands on.
pub const TRANSITIONED_STATUS: &str = "Done";
pub const NEW_ISSUE_STATUS: &str = "Open";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MockError {
    #[error("Invalid component payload")]
    InvalidComponent,
    #[error("Invalid issue payload")]
    InvalidIssue,
    #[error("Issue not found")]
    IssueNotFound,
}

#[derive(Debug, Clone)]
pub struct MockTracker {
    data: Arc<Mutex<TrackerData>>,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new(default_data())
    }
}

impl MockTracker {
    pub fn new(data: TrackerData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Projects whose name contains `query`, ignoring case. Empty matches all.
    pub fn search_projects(&self, query: &str) -> Vec<Project> {
        let query = query.to_lowercase();
        self.data
            .lock()
            .projects
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn components(&self, project_key: &str) -> Vec<Component> {
        self.data
            .lock()
            .components
            .get(project_key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn create_component(
        &self,
        project: Option<&str>,
        name: Option<&str>,
    ) -> Result<Component, MockError> {
        let (Some(project), Some(name)) = (
            project.filter(|p| !p.is_empty()),
            name.filter(|n| !n.is_empty()),
        ) else {
            return Err(MockError::InvalidComponent);
        };
        let component = Component {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.data
            .lock()
            .components
            .entry(project.to_string())
            .or_default()
            .push(component.clone());
        Ok(component)
    }

    /// Issues whose status and project key both appear somewhere in `jql`.
    /// No query parsing happens.
    pub fn search_issues(&self, jql: &str, max_results: usize) -> Vec<IssueRef> {
        self.data
            .lock()
            .issues
            .iter()
            .filter(|i| jql.contains(&i.status) && jql.contains(&i.project))
            .take(max_results)
            .map(IssueRef::from)
            .collect()
    }

    /// The same fixed set for every issue key, known or not.
    pub fn transitions(&self, _issue_key: &str) -> Vec<Transition> {
        self.data.lock().transitions.clone()
    }

    /// Moves the issue to `Done` whatever transition was asked for.
    pub fn apply_transition(&self, issue_key: &str, _transition_id: &str) -> Result<(), MockError> {
        let mut data = self.data.lock();
        let issue = data
            .issues
            .iter_mut()
            .find(|i| i.key == issue_key)
            .ok_or(MockError::IssueNotFound)?;
        issue.status = TRANSITIONED_STATUS.to_string();
        Ok(())
    }

    /// Stores a new `Open` issue for `fields.project.key` and returns its key.
    pub fn create_issue(&self, payload: &serde_json::Value) -> Result<String, MockError> {
        let project = payload
            .pointer("/fields/project/key")
            .and_then(|v| v.as_str())
            .ok_or(MockError::InvalidIssue)?;

        let mut data = self.data.lock();
        let key = format!("{ISSUE_KEY_PREFIX}-{}", data.issues.len() + 1);
        data.issues.push(Issue {
            id: uuid::Uuid::new_v4().to_string(),
            key: key.clone(),
            project: project.to_string(),
            status: NEW_ISSUE_STATUS.to_string(),
        });
        Ok(key)
    }

    pub fn issue(&self, key: &str) -> Option<Issue> {
        self.data.lock().issues.iter().find(|i| i.key == key).cloned()
    }

    pub fn snapshot(&self) -> TrackerData {
        self.data.lock().clone()
    }
}
