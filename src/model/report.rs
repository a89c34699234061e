use serde::Serialize;

use super::tracker::{Component, Project};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub key: String,
    pub name: String,
}

impl From<&Project> for ProjectRef {
    fn from(p: &Project) -> Self {
        Self {
            key: p.key.clone(),
            name: p.name.clone(),
        }
    }
}

/// How the related RUN project was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPath {
    Direct,
    Scan,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCheck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<LookupPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProjectCheck {
    pub fn found(project: ProjectRef, via: Option<LookupPath>) -> Self {
        Self {
            ok: true,
            project: Some(project),
            via,
            message: None,
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            project: None,
            via: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentCheck {
    pub ok: bool,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentCheck {
    pub fn existing(component: Component) -> Self {
        Self {
            ok: true,
            created: false,
            component: Some(component),
            error: None,
        }
    }

    pub fn created(component: Component) -> Self {
        Self {
            ok: true,
            created: true,
            component: Some(component),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            created: false,
            component: None,
            error: Some(error.into()),
        }
    }
}

/// Result of moving a single issue out of the build status.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitioned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransitionOutcome {
    pub fn transitioned(name: impl Into<String>) -> Self {
        Self {
            ok: true,
            transitioned_to: Some(name.into()),
            status: None,
            text: None,
            error: None,
        }
    }

    /// The service answered, but not with 200/204.
    pub fn rejected(status: u16, text: impl Into<String>) -> Self {
        Self {
            ok: false,
            transitioned_to: None,
            status: Some(status),
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            transitioned_to: None,
            status: None,
            text: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueTransition {
    pub key: String,
    pub result: TransitionOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseIssuesCheck {
    pub ok: bool,
    pub count: usize,
    pub results: Vec<IssueTransition>,
}

impl CloseIssuesCheck {
    pub fn new(results: Vec<IssueTransition>) -> Self {
        Self {
            ok: results.iter().all(|r| r.result.ok),
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketCheck {
    pub ok: bool,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TicketCheck {
    pub fn created(key: String) -> Self {
        Self {
            ok: true,
            created: true,
            key: Some(key),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            created: false,
            key: None,
            error: Some(error.into()),
        }
    }
}

/// One entry in the report. Serialized with its name as the `name` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Check {
    FindProject(ProjectCheck),
    ComponentCreation(ComponentCheck),
    RunProject(ProjectCheck),
    CloseBuildIssues(CloseIssuesCheck),
    InformServiceDesk(TicketCheck),
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Check::FindProject(_) => "find_project",
            Check::ComponentCreation(_) => "component_creation",
            Check::RunProject(_) => "run_project",
            Check::CloseBuildIssues(_) => "close_build_issues",
            Check::InformServiceDesk(_) => "inform_service_desk",
        }
    }

    pub fn ok(&self) -> bool {
        match self {
            Check::FindProject(c) | Check::RunProject(c) => c.ok,
            Check::ComponentCreation(c) => c.ok,
            Check::CloseBuildIssues(c) => c.ok,
            Check::InformServiceDesk(c) => c.ok,
        }
    }
}

/// Outcome of one verification run. Checks can only be appended.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    client: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<ProjectRef>,
    checks: Vec<Check>,
}

impl Report {
    pub fn new(client: &str) -> Self {
        Self {
            client: client.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            project: None,
            checks: Vec::new(),
        }
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn project(&self) -> Option<&ProjectRef> {
        self.project.as_ref()
    }

    pub fn set_project(&mut self, project: ProjectRef) {
        self.project = Some(project);
    }

    pub fn push(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn find(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.name() == name)
    }
}
