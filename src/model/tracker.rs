use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// Issue as returned by the search endpoint: identity only, no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(default)]
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectSearch {
    #[serde(default)]
    pub values: Vec<Project>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IssueSearch {
    #[serde(default)]
    pub issues: Vec<IssueRef>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransitionList {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComponent {
    pub project: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionId {
    pub id: String,
}

impl TransitionRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            transition: TransitionId { id: id.into() },
        }
    }
}

/// Body of `POST /issue`. Only the fields the summary ticket needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub fields: NewIssueFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssueFields {
    pub project: KeyRef,
    pub summary: String,
    pub description: String,
    pub issuetype: NameRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

impl NewIssue {
    pub fn task(project_key: &str, summary: String, description: String) -> Self {
        Self {
            fields: NewIssueFields {
                project: KeyRef {
                    key: project_key.to_string(),
                },
                summary,
                description,
                issuetype: NameRef {
                    name: "Task".into(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
}

/// Issue as stored by the mock service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub project: String,
    pub status: String,
}

impl From<&Issue> for IssueRef {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            key: issue.key.clone(),
        }
    }
}
