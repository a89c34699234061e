use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::model::tracker::{Component, IssueRef};

/// In-process tracker that records calls and fails selected operations.
#[derive(Default)]
struct FakeTracker {
    projects: Vec<Project>,
    components: Mutex<Vec<Component>>,
    issues: Vec<IssueRef>,
    transitions: Vec<Transition>,
    failing: HashSet<&'static str>,
    reject_transitions_with: Option<u16>,
    project_queries: Mutex<Vec<Option<String>>>,
    issue_queries: Mutex<Vec<String>>,
    applied: Mutex<Vec<(String, String)>>,
    filed: Mutex<Vec<NewIssue>>,
}

impl FakeTracker {
    fn with_projects(names: &[(&str, &str)]) -> Self {
        Self {
            projects: names
                .iter()
                .enumerate()
                .map(|(i, (key, name))| Project {
                    id: format!("1000{i}"),
                    key: key.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            transitions: vec![transition("1", "Done"), transition("2", "Closed")],
            ..Self::default()
        }
    }

    fn with_issues(mut self, keys: &[&str]) -> Self {
        self.issues = keys
            .iter()
            .map(|k| IssueRef {
                id: format!("id-{k}"),
                key: k.to_string(),
            })
            .collect();
        self
    }

    fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    fn with_component(self, name: &str) -> Self {
        self.components.lock().unwrap().push(Component {
            id: "c-1".into(),
            name: name.into(),
        });
        self
    }

    fn failing(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    fn check(&self, op: &'static str) -> Result<(), TrackerError> {
        if self.failing.contains(op) {
            return Err(TrackerError::Status {
                url: format!("fake://{op}"),
                status: 500,
                body: "Mock failure".into(),
            });
        }
        Ok(())
    }
}

fn transition(id: &str, name: &str) -> Transition {
    Transition {
        id: id.into(),
        name: name.into(),
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn search_projects(&self, query: Option<&str>) -> Result<Vec<Project>, TrackerError> {
        self.project_queries
            .lock()
            .unwrap()
            .push(query.map(String::from));
        self.check(if query.is_some() {
            "search_projects"
        } else {
            "list_projects"
        })?;
        let q = query.unwrap_or_default().to_lowercase();
        Ok(self
            .projects
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&q))
            .cloned()
            .collect())
    }

    async fn project_components(&self, _project_key: &str) -> Result<Vec<Component>, TrackerError> {
        self.check("project_components")?;
        Ok(self.components.lock().unwrap().clone())
    }

    async fn create_component(
        &self,
        _project_key: &str,
        name: &str,
    ) -> Result<Component, TrackerError> {
        self.check("create_component")?;
        let component = Component {
            id: "c-new".into(),
            name: name.into(),
        };
        self.components.lock().unwrap().push(component.clone());
        Ok(component)
    }

    async fn search_issues(
        &self,
        jql: &str,
        _max_results: u32,
    ) -> Result<Vec<IssueRef>, TrackerError> {
        self.issue_queries.lock().unwrap().push(jql.to_string());
        self.check("search_issues")?;
        Ok(self.issues.clone())
    }

    async fn issue_transitions(&self, _issue_key: &str) -> Result<Vec<Transition>, TrackerError> {
        self.check("issue_transitions")?;
        Ok(self.transitions.clone())
    }

    async fn apply_transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<(), TrackerError> {
        if let Some(status) = self.reject_transitions_with {
            return Err(TrackerError::Status {
                url: "fake://apply_transition".into(),
                status,
                body: "Issue not found".into(),
            });
        }
        self.applied
            .lock()
            .unwrap()
            .push((issue_key.to_string(), transition_id.to_string()));
        Ok(())
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<String, TrackerError> {
        self.check("create_issue")?;
        let mut filed = self.filed.lock().unwrap();
        filed.push(issue.clone());
        Ok(format!("SD-{}", filed.len()))
    }
}

fn acme() -> FakeTracker {
    FakeTracker::with_projects(&[("ACME", "ACME"), ("ACME-RUN", "ACME RUN"), ("SD", "Service Desk")])
}

fn names(report: &Report) -> Vec<&'static str> {
    report.checks().iter().map(Check::name).collect()
}

fn targets() -> Vec<String> {
    vec!["Done".into(), "Closed".into()]
}

#[test]
fn select_project_prefers_exact_match() {
    let projects = FakeTracker::with_projects(&[("ACME-RUN", "ACME RUN"), ("ACME", "acme")]).projects;
    let found = select_project(&projects, "ACME").unwrap();
    assert_eq!(found.key, "ACME");
}

#[test]
fn select_project_falls_back_to_substring() {
    let projects = FakeTracker::with_projects(&[("GLX", "Globex Corporation")]).projects;
    assert_eq!(select_project(&projects, "globex").unwrap().key, "GLX");
    assert!(select_project(&projects, "initech").is_none());
}

#[test]
fn scan_needs_both_run_and_client_in_name() {
    let projects = FakeTracker::with_projects(&[
        ("RUN", "Shared Run Ops"),
        ("GLX", "Globex"),
        ("GLXR", "Globex - Run team"),
    ])
    .projects;
    assert_eq!(scan_for_run_project(&projects, "GLOBEX").unwrap().key, "GLXR");
    assert!(scan_for_run_project(&projects, "initech").is_none());
}

#[test]
fn choose_transition_prefers_targets_in_offered_order() {
    let available = vec![
        transition("11", "Start Progress"),
        transition("21", "closed"),
        transition("31", "Done"),
    ];
    assert_eq!(choose_transition(&available, &targets()).unwrap().id, "21");
}

#[test]
fn choose_transition_falls_back_to_last_offered() {
    let available = vec![transition("11", "Start Progress"), transition("41", "Archive")];
    assert_eq!(choose_transition(&available, &targets()).unwrap().id, "41");
    assert!(choose_transition(&[], &targets()).is_none());
}

#[test]
fn issue_query_quotes_key_and_status() {
    assert_eq!(
        issue_query("ACME", "Build"),
        r#"project = "ACME" AND status = "Build""#
    );
}

#[tokio::test]
async fn missing_project_yields_single_failed_check() {
    let tracker = acme();
    let report = run(&tracker, &VerifySettings::default(), "Initech").await;

    assert_eq!(names(&report), vec!["find_project"]);
    assert!(!report.checks()[0].ok());
    assert!(report.project().is_none());
    assert!(tracker.filed.lock().unwrap().is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["checks"][0]["message"], "Project not found for client 'Initech'");
}

#[tokio::test]
async fn project_search_failure_counts_as_not_found() {
    let tracker = acme().failing("search_projects");
    let report = run(&tracker, &VerifySettings::default(), "ACME").await;
    assert_eq!(names(&report), vec!["find_project"]);
    assert!(!report.checks()[0].ok());
}

#[tokio::test]
async fn full_run_records_every_step_in_order() {
    let tracker = acme().with_issues(&["ACME-1", "ACME-2"]);
    let report = run(&tracker, &VerifySettings::default(), "ACME").await;

    assert_eq!(
        names(&report),
        vec![
            "find_project",
            "component_creation",
            "run_project",
            "close_build_issues",
            "inform_service_desk",
        ]
    );
    assert!(report.checks().iter().all(Check::ok));
    assert_eq!(report.project().unwrap().key, "ACME");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["checks"][1]["created"], true);
    assert_eq!(json["checks"][1]["component"]["name"], "Création du composant JIRA");
    assert_eq!(json["checks"][2]["project"]["key"], "ACME-RUN");
    assert_eq!(json["checks"][2]["via"], "direct");
    assert_eq!(json["checks"][3]["count"], 2);
    assert_eq!(json["checks"][3]["results"][0]["key"], "ACME-1");
    assert_eq!(json["checks"][3]["results"][0]["result"]["transitioned_to"], "Done");
    assert_eq!(json["checks"][4]["key"], "SD-1");

    assert_eq!(
        tracker.issue_queries.lock().unwrap().as_slice(),
        &[r#"project = "ACME" AND status = "Build""#.to_string()]
    );
    assert_eq!(
        tracker.applied.lock().unwrap().as_slice(),
        &[
            ("ACME-1".to_string(), "1".to_string()),
            ("ACME-2".to_string(), "1".to_string()),
        ]
    );
}

#[tokio::test]
async fn summary_ticket_embeds_report_so_far() {
    let tracker = acme();
    let settings = VerifySettings {
        service_desk_project: "HELP".into(),
        ..VerifySettings::default()
    };
    run(&tracker, &settings, "ACME").await;

    let filed = tracker.filed.lock().unwrap();
    assert_eq!(filed.len(), 1);
    let fields = &filed[0].fields;
    assert_eq!(fields.project.key, "HELP");
    assert_eq!(fields.issuetype.name, "Task");
    assert!(fields
        .summary
        .starts_with("Verification results for client ACME - "));
    assert!(fields.description.starts_with("Verification summary:\n\n"));
    assert!(fields.description.contains("\"close_build_issues\""));
    assert!(!fields.description.contains("\"inform_service_desk\""));
}

#[tokio::test]
async fn existing_component_is_not_recreated() {
    let tracker = acme().with_component("CRÉATION DU COMPOSANT JIRA");
    let check = ensure_component(&tracker, "ACME", "Création du composant JIRA").await;
    assert!(check.ok);
    assert!(!check.created);
    assert_eq!(check.component.unwrap().id, "c-1");
    assert_eq!(tracker.components.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn component_listing_failure_still_creates() {
    let tracker = acme().failing("project_components");
    let check = ensure_component(&tracker, "ACME", "Ops").await;
    assert!(check.ok);
    assert!(check.created);
}

#[tokio::test]
async fn component_creation_failure_does_not_stop_the_run() {
    let tracker = acme().failing("create_component");
    let report = run(&tracker, &VerifySettings::default(), "ACME").await;

    assert_eq!(report.checks().len(), 5);
    let component = report.find("component_creation").unwrap();
    assert!(!component.ok());
    let json = serde_json::to_value(component).unwrap();
    assert_eq!(json["created"], false);
    assert!(json["error"].as_str().unwrap().contains("HTTP 500"));
    assert!(report.find("inform_service_desk").unwrap().ok());
}

#[tokio::test]
async fn run_project_found_by_scan_when_name_lookup_misses() {
    let tracker = FakeTracker::with_projects(&[("GLX", "Globex"), ("GOPS", "Globex Ops Run")]);
    let check = find_run_project(&tracker, "Globex").await;
    assert!(check.ok);
    assert_eq!(check.via, Some(LookupPath::Scan));
    assert_eq!(check.project.unwrap().key, "GOPS");
    assert_eq!(
        tracker.project_queries.lock().unwrap().as_slice(),
        &[Some("Globex RUN".to_string()), None]
    );
}

#[tokio::test]
async fn run_project_missing_when_scan_fails() {
    let tracker = FakeTracker::with_projects(&[("GLX", "Globex")]).failing("list_projects");
    let check = find_run_project(&tracker, "Globex").await;
    assert!(!check.ok);
    assert_eq!(check.message.as_deref(), Some("RUN project not found"));
}

#[tokio::test]
async fn issue_without_transitions_is_reported() {
    let tracker = acme().with_issues(&["ACME-1"]).with_transitions(vec![]);
    let check = close_issues_in_status(&tracker, "ACME", "Build", &targets()).await;
    assert!(!check.ok);
    assert_eq!(check.count, 1);
    assert_eq!(check.results[0].result.error.as_deref(), Some(NO_TRANSITION));
    assert!(tracker.applied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn transition_listing_failure_counts_as_no_transition() {
    let tracker = acme().with_issues(&["ACME-1"]).failing("issue_transitions");
    let outcome = transition_issue(&tracker, "ACME-1", &targets()).await;
    assert!(!outcome.ok);
    assert_eq!(outcome.error.as_deref(), Some(NO_TRANSITION));
}

#[tokio::test]
async fn rejected_transition_keeps_status_and_text() {
    let mut tracker = acme().with_issues(&["ACME-9"]);
    tracker.reject_transitions_with = Some(404);
    let outcome = transition_issue(&tracker, "ACME-9", &targets()).await;
    assert!(!outcome.ok);
    assert_eq!(outcome.status, Some(404));
    assert_eq!(outcome.text.as_deref(), Some("Issue not found"));
}

#[tokio::test]
async fn issue_search_failure_closes_nothing() {
    let tracker = acme().with_issues(&["ACME-1"]).failing("search_issues");
    let check = close_issues_in_status(&tracker, "ACME", "Build", &targets()).await;
    assert_eq!(check.count, 0);
    assert!(check.results.is_empty());
}

#[tokio::test]
async fn service_desk_failure_is_recorded() {
    let tracker = acme().failing("create_issue");
    let report = run(&tracker, &VerifySettings::default(), "ACME").await;
    let ticket = serde_json::to_value(report.find("inform_service_desk").unwrap()).unwrap();
    assert_eq!(ticket["ok"], false);
    assert_eq!(ticket["created"], false);
    assert!(ticket.get("key").is_none());
}
