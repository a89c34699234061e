pub mod error;
pub mod http;

use async_trait::async_trait;

use crate::model::tracker::{Component, IssueRef, NewIssue, Project, Transition};

pub use error::TrackerError;
pub use http::HttpTracker;

/// The subset of the project-tracking REST API the verification run needs.
///
/// `HttpTracker` talks to a live service (or the mock); tests substitute an
/// in-process implementation.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// `None` lists every project, `Some(q)` filters by name.
    async fn search_projects(&self, query: Option<&str>) -> Result<Vec<Project>, TrackerError>;
    async fn project_components(&self, project_key: &str) -> Result<Vec<Component>, TrackerError>;
    async fn create_component(
        &self,
        project_key: &str,
        name: &str,
    ) -> Result<Component, TrackerError>;
    async fn search_issues(&self, jql: &str, max_results: u32)
        -> Result<Vec<IssueRef>, TrackerError>;
    async fn issue_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, TrackerError>;
    /// Succeeds only when the service answers 200 or 204.
    async fn apply_transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<(), TrackerError>;
    /// Returns the key of the created issue.
    async fn create_issue(&self, issue: &NewIssue) -> Result<String, TrackerError>;
}
