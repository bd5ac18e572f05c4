use httpmock::prelude::*;
use jkw::http::{Credentials, HttpTransport};
use jkw_core::workflow::{begin, PendingBuild};
use jkw_core::{BuildCommand, JenkinsClient, Outcome, ResultStatus, Transport};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const AUTH: &str = "Basic Y2ktYm90OjExYWEyMmJi";

fn client(server: &MockServer) -> JenkinsClient {
    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(
            &Credentials::new("ci-bot", "11aa22bb"),
            Duration::from_secs(5),
        )
        .unwrap(),
    );
    JenkinsClient::new(&server.base_url(), None, transport).unwrap()
}

#[tokio::test]
async fn lists_jobs_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/json").header("Authorization", AUTH);
            then.status(200).header("content-type", "application/json").body(
                r#"{"jobs":[{"name":"api","lastCompletedBuild":{"result":"SUCCESS"}},
                            {"name":"web","lastCompletedBuild":{"result":"ABORTED"}}]}"#,
            );
        })
        .await;

    let jobs = client(&server).list_jobs().await.unwrap();
    mock.assert_async().await;
    let statuses: Vec<(&str, ResultStatus)> =
        jobs.iter().map(|j| (j.name.as_str(), j.status())).collect();
    assert_eq!(
        statuses,
        vec![("api", ResultStatus::Success), ("web", ResultStatus::Aborted)]
    );
}

#[tokio::test]
async fn parameterless_job_is_triggered_directly() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/job/app/api/json");
            then.status(200).body(r#"{"property":[]}"#);
        })
        .await;
    let trigger = server
        .mock_async(|when, then| {
            when.method(POST).path("/job/app/build").header("Authorization", AUTH);
            then.status(201);
        })
        .await;
    let parameterized = server
        .mock_async(|when, then| {
            when.method(POST).path("/job/app/buildWithParameters");
            then.status(201);
        })
        .await;

    let client = client(&server);
    let PendingBuild::Direct(direct) = begin(&client, "app", BuildCommand::Build).await.unwrap()
    else {
        panic!("expected a direct trigger");
    };
    let outcome = direct
        .confirm_and_trigger(&client, &mut |_: &str| true)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Triggered);
    trigger.assert_async().await;
    parameterized.assert_hits_async(0).await;
}

#[tokio::test]
async fn parameterized_job_posts_form() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/job/app/api/json");
            then.status(200).body(
                r#"{"property":[{"parameterDefinitions":[
                    {"name":"BRANCH","type":"StringParameterDefinition","defaultParameterValue":{"value":"main"}},
                    {"name":"DRY_RUN","type":"BooleanParameterDefinition","defaultParameterValue":{"value":false}}
                ]}]}"#,
            );
        })
        .await;
    let submit = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/job/app/buildWithParameters")
                .header("Authorization", AUTH)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body("BRANCH=feature%2Fsearch&DRY_RUN=true");
            then.status(201);
        })
        .await;

    let client = client(&server);
    let PendingBuild::Form(mut form) = begin(&client, "app", BuildCommand::Build).await.unwrap()
    else {
        panic!("expected a parameter form");
    };
    form.set_edit("BRANCH", "feature/search").unwrap();
    form.toggle("DRY_RUN").unwrap();
    let outcome = form
        .confirm_and_submit(&client, &mut |_: &str| true)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Submitted);
    submit.assert_async().await;
}

#[tokio::test]
async fn unauthorized_is_reported_with_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/job/app/api/json");
            then.status(401);
        })
        .await;

    let err = client(&server).build_history("app").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("/job/app/api/json"));
}
