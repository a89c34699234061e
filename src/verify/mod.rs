//! The verification run: a fixed sequence of best-effort steps against a
//! tracker, each producing one typed check in the report.
//!
//! No step aborts the run. Failed calls are logged and folded into the check
//! they belong to; only a missing client project ends the run early.

use tracing::{info, warn};

use crate::config::VerifySettings;
use crate::model::report::{
    Check, CloseIssuesCheck, ComponentCheck, IssueTransition, LookupPath, ProjectCheck,
    ProjectRef, Report, TicketCheck, TransitionOutcome,
};
use crate::model::tracker::{NewIssue, Project, Transition};
use crate::tracker::{TrackerApi, TrackerError};

pub const ISSUE_SEARCH_LIMIT: u32 = 500;
pub const NO_TRANSITION: &str = "no available transition";

pub async fn run(api: &dyn TrackerApi, settings: &VerifySettings, client: &str) -> Report {
    let mut report = Report::new(client);

    let Some(project) = find_project_by_name(api, client).await else {
        warn!(client, "client project not found");
        report.push(Check::FindProject(ProjectCheck::missing(format!(
            "Project not found for client '{client}'"
        ))));
        return report;
    };
    info!(client, project = %project.key, "client project found");
    let project_ref = ProjectRef::from(&project);
    report.set_project(project_ref.clone());
    report.push(Check::FindProject(ProjectCheck::found(project_ref, None)));

    let component = ensure_component(api, &project.key, &settings.component_name).await;
    report.push(Check::ComponentCreation(component));

    report.push(Check::RunProject(find_run_project(api, client).await));

    let closed = close_issues_in_status(
        api,
        &project.key,
        &settings.build_status,
        &settings.transition_targets,
    )
    .await;
    report.push(Check::CloseBuildIssues(closed));

    let ticket = inform_service_desk(api, &settings.service_desk_project, &report).await;
    report.push(Check::InformServiceDesk(ticket));

    report
}

/// Search by name, preferring an exact case-insensitive match over a
/// substring match. A failed search is treated as "not found".
pub async fn find_project_by_name(api: &dyn TrackerApi, name: &str) -> Option<Project> {
    match api.search_projects(Some(name)).await {
        Ok(projects) => select_project(&projects, name).cloned(),
        Err(e) => {
            warn!(query = name, error = %e, "project search failed");
            None
        }
    }
}

pub fn select_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    let wanted = name.to_lowercase();
    projects
        .iter()
        .find(|p| p.name.to_lowercase() == wanted)
        .or_else(|| {
            projects
                .iter()
                .find(|p| p.name.to_lowercase().contains(&wanted))
        })
}

pub async fn ensure_component(
    api: &dyn TrackerApi,
    project_key: &str,
    component_name: &str,
) -> ComponentCheck {
    let wanted = component_name.to_lowercase();
    match api.project_components(project_key).await {
        Ok(components) => {
            if let Some(existing) = components
                .into_iter()
                .find(|c| c.name.to_lowercase() == wanted)
            {
                info!(project = project_key, component = %existing.name, "component already exists");
                return ComponentCheck::existing(existing);
            }
        }
        // Listing is advisory; fall through to creation.
        Err(e) => warn!(project = project_key, error = %e, "listing components failed"),
    }

    match api.create_component(project_key, component_name).await {
        Ok(component) => {
            info!(project = project_key, component = %component.name, "component created");
            ComponentCheck::created(component)
        }
        Err(e) => {
            warn!(project = project_key, error = %e, "component creation failed");
            ComponentCheck::failed(e.to_string())
        }
    }
}

/// Look for "<client> RUN" by name, then scan the unfiltered project list.
pub async fn find_run_project(api: &dyn TrackerApi, client: &str) -> ProjectCheck {
    if let Some(project) = find_project_by_name(api, &format!("{client} RUN")).await {
        info!(client, project = %project.key, "RUN project found by name");
        return ProjectCheck::found(ProjectRef::from(&project), Some(LookupPath::Direct));
    }

    match api.search_projects(None).await {
        Ok(all) => {
            if let Some(project) = scan_for_run_project(&all, client) {
                info!(client, project = %project.key, "RUN project found by scan");
                return ProjectCheck::found(ProjectRef::from(project), Some(LookupPath::Scan));
            }
        }
        Err(e) => warn!(client, error = %e, "project listing failed"),
    }

    warn!(client, "RUN project not found");
    ProjectCheck::missing("RUN project not found")
}

pub fn scan_for_run_project<'a>(projects: &'a [Project], client: &str) -> Option<&'a Project> {
    let client = client.to_lowercase();
    projects.iter().find(|p| {
        let name = p.name.to_lowercase();
        name.contains("run") && name.contains(&client)
    })
}

pub fn issue_query(project_key: &str, status: &str) -> String {
    format!(r#"project = "{project_key}" AND status = "{status}""#)
}

pub async fn close_issues_in_status(
    api: &dyn TrackerApi,
    project_key: &str,
    status: &str,
    targets: &[String],
) -> CloseIssuesCheck {
    let jql = issue_query(project_key, status);
    let issues = api
        .search_issues(&jql, ISSUE_SEARCH_LIMIT)
        .await
        .unwrap_or_else(|e| {
            warn!(project = project_key, status, error = %e, "issue search failed");
            Vec::new()
        });

    let mut results = Vec::with_capacity(issues.len());
    for issue in issues {
        let result = transition_issue(api, &issue.key, targets).await;
        results.push(IssueTransition {
            key: issue.key,
            result,
        });
    }
    CloseIssuesCheck::new(results)
}

/// First available transition named in `targets`, else the last one offered.
pub fn choose_transition<'a>(available: &'a [Transition], targets: &[String]) -> Option<&'a Transition> {
    let targets: Vec<String> = targets.iter().map(|t| t.to_lowercase()).collect();
    available
        .iter()
        .find(|t| targets.contains(&t.name.to_lowercase()))
        .or_else(|| available.last())
}

pub async fn transition_issue(
    api: &dyn TrackerApi,
    issue_key: &str,
    targets: &[String],
) -> TransitionOutcome {
    let available = api.issue_transitions(issue_key).await.unwrap_or_else(|e| {
        warn!(issue = issue_key, error = %e, "listing transitions failed");
        Vec::new()
    });

    let Some(chosen) = choose_transition(&available, targets) else {
        warn!(issue = issue_key, "no transition available");
        return TransitionOutcome::failed(NO_TRANSITION);
    };

    match api.apply_transition(issue_key, &chosen.id).await {
        Ok(()) => {
            info!(issue = issue_key, transition = %chosen.name, "issue transitioned");
            TransitionOutcome::transitioned(chosen.name.clone())
        }
        Err(TrackerError::Status { status, body, .. }) => {
            warn!(issue = issue_key, status, "transition rejected");
            TransitionOutcome::rejected(status, body)
        }
        Err(e) => {
            warn!(issue = issue_key, error = %e, "transition failed");
            TransitionOutcome::failed(e.to_string())
        }
    }
}

pub fn summary_line(client: &str) -> String {
    format!(
        "Verification results for client {client} - {}",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

pub async fn inform_service_desk(
    api: &dyn TrackerApi,
    project_key: &str,
    report: &Report,
) -> TicketCheck {
    let rendered = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => return TicketCheck::failed(format!("failed to render report: {e}")),
    };
    let description = format!("Verification summary:\n\n{rendered}");
    let issue = NewIssue::task(project_key, summary_line(report.client()), description);

    match api.create_issue(&issue).await {
        Ok(key) => {
            info!(project = project_key, issue = %key, "service desk ticket created");
            TicketCheck::created(key)
        }
        Err(e) => {
            warn!(project = project_key, error = %e, "service desk ticket failed");
            TicketCheck::failed(e.to_string())
        }
    }
}

#[cfg(test)]
pub mod tests;
