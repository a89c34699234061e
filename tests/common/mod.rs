#![allow(dead_code)]

use tokio::net::TcpListener;
use tracker_verify::mock::{router, MockTracker, TrackerData};
use tracker_verify::model::tracker::{Issue, Project, Transition};

/// Serve `tracker` on an ephemeral port and return its base URL.
pub async fn spawn_mock(tracker: MockTracker) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(tracker))
            .await
            .expect("serve app");
    });
    format!("http://{addr}")
}

/// Same as [`spawn_mock`] for synchronous tests: the server gets its own
/// runtime on a background thread.
pub fn spawn_mock_blocking(tracker: MockTracker) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("build runtime");
        rt.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind listener");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            axum::serve(listener, router(tracker))
                .await
                .expect("serve app");
        });
    });
    format!("http://{}", rx.recv().expect("server addr"))
}

pub fn project(key: &str, name: &str) -> Project {
    Project {
        id: format!("id-{key}"),
        key: key.into(),
        name: name.into(),
    }
}

pub fn issue(key: &str, project: &str, status: &str) -> Issue {
    Issue {
        id: format!("id-{key}"),
        key: key.into(),
        project: project.into(),
        status: status.into(),
    }
}

pub fn transition(id: &str, name: &str) -> Transition {
    Transition {
        id: id.into(),
        name: name.into(),
    }
}

/// A client with a single issue in Build and a single matching transition.
pub fn single_build_issue() -> TrackerData {
    TrackerData {
        projects: vec![project("INI", "Initech"), project("SD", "Service Desk")],
        issues: vec![issue("INI-1", "INI", "Build")],
        transitions: vec![transition("5", "Done")],
        ..TrackerData::default()
    }
}
