use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::tracker::{Component, Issue, Project, Transition};

/// Everything the mock service holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerData {
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Components keyed by project key.
    #[serde(default)]
    pub components: HashMap<String, Vec<Component>>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

fn project(id: &str, key: &str, name: &str) -> Project {
    Project {
        id: id.into(),
        key: key.into(),
        name: name.into(),
    }
}

fn issue(id: &str, key: &str, project: &str, status: &str) -> Issue {
    Issue {
        id: id.into(),
        key: key.into(),
        project: project.into(),
        status: status.into(),
    }
}

/// One client (ACME) with a RUN sibling, a service desk, two issues in
/// Build and the Done/Closed transitions.
pub fn default_data() -> TrackerData {
    TrackerData {
        projects: vec![
            project("10001", "ACME", "ACME"),
            project("10002", "ACME-RUN", "ACME RUN"),
            project("10003", "SD", "Service Desk"),
        ],
        components: HashMap::from([("ACME".to_string(), Vec::new())]),
        issues: vec![
            issue("20001", "ACME-1", "ACME", "Build"),
            issue("20002", "ACME-2", "ACME", "Build"),
        ],
        transitions: vec![
            Transition {
                id: "1".into(),
                name: "Done".into(),
            },
            Transition {
                id: "2".into(),
                name: "Closed".into(),
            },
        ],
    }
}

pub fn load_seed(path: &Path) -> Result<TrackerData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed from {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))
}
