mod common;

use axum::http::StatusCode;
use recruitment_portal::test_support::test_app;
use serde_json::json;
use tokio::task::JoinSet;

use common::{get, job_body, post, put, register};

#[tokio::test]
async fn new_job_notifies_every_applicant() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;
    let mut applicants = Vec::new();
    for email in ["a1@x.com", "a2@x.com", "a3@x.com"] {
        applicants.push(register(&app.router, email, "applicant").await.0);
    }

    let (status, body) =
        post(&app.router, "/api/jobs", job_body(&recruiter, "Backend Engineer")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Job created successfully");
    assert_eq!(body["job"]["jobType"], "full_time");
    assert_eq!(body["job"]["recruiterId"], recruiter.as_str());

    for applicant in &applicants {
        let (_, inbox) = get(&app.router, &format!("/api/notifications/{}", applicant)).await;
        let inbox = inbox["notifications"].as_array().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0]["type"], "new_job");
        assert_eq!(inbox[0]["jobTitle"], "Backend Engineer");
        assert_eq!(inbox[0]["read"], false);
    }
    let (_, inbox) = get(&app.router, &format!("/api/notifications/{}", recruiter)).await;
    assert!(inbox["notifications"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn job_crud() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;

    let mut missing = job_body(&recruiter, "Designer");
    missing["location"] = json!("");
    let (status, body) = post(&app.router, "/api/jobs", missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "title, details, location, type, deadline, recruiterId/postedBy are required"
    );

    let mut bad_type = job_body(&recruiter, "Designer");
    bad_type["jobType"] = json!("freelance");
    let (status, _) = post(&app.router, "/api/jobs", bad_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, first) = post(&app.router, "/api/jobs", job_body(&recruiter, "Designer")).await;
    let (_, second) = post(&app.router, "/api/jobs", job_body(&recruiter, "Writer")).await;
    let first_id = first["job"]["id"].as_str().unwrap().to_string();

    let (status, body) = get(&app.router, "/api/jobs").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Writer", "Designer"]);

    let (_, mine) = get(&app.router, &format!("/api/jobs/recruiter/{}", recruiter)).await;
    assert_eq!(mine["jobs"].as_array().unwrap().len(), 2);

    let mut update = job_body(&recruiter, "Senior Designer");
    update["jobType"] = json!("contract");
    let (status, body) = put(&app.router, &format!("/api/jobs/{}", first_id), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "Senior Designer");
    assert_eq!(body["job"]["jobType"], "contract");

    let (status, _) = common::send(
        &app.router,
        axum::http::Method::DELETE,
        &format!("/api/jobs/{}", second["job"]["id"].as_str().unwrap()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app.router, &format!("/api/jobs/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn applying_twice_is_a_conflict() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;
    let (applicant, _) = register(&app.router, "a@x.com", "applicant").await;
    let (_, job) = post(&app.router, "/api/jobs", job_body(&recruiter, "Analyst")).await;
    let job_id = job["job"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(&app.router, "/api/applications", json!({ "jobId": job_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please login first to apply for a job");

    let apply = json!({ "jobId": job_id, "userId": applicant });
    let (status, body) = post(&app.router, "/api/applications", apply.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["application"]["status"], "pending");
    assert_eq!(body["application"]["jobTitle"], "Analyst");

    let (status, body) = post(&app.router, "/api/applications", apply).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already applied to this job");

    let (_, listed) = get(&app.router, &format!("/api/applications/job/{}", job_id)).await;
    assert_eq!(listed["applications"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_applies_yield_one_application() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;
    let (applicant, _) = register(&app.router, "a@x.com", "applicant").await;
    let (_, job) = post(&app.router, "/api/jobs", job_body(&recruiter, "Analyst")).await;
    let apply = json!({ "jobId": job["job"]["id"], "userId": applicant });

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let apply = apply.clone();
        tasks.spawn(async move { post(&router, "/api/applications", apply).await.0 });
    }
    let mut statuses = Vec::new();
    while let Some(status) = tasks.join_next().await {
        statuses.push(status.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);
}

#[tokio::test]
async fn status_changes_notify_only_on_decisions() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;
    let (_, job) = post(&app.router, "/api/jobs", job_body(&recruiter, "Analyst")).await;
    // registered after the posting, so the inbox starts empty
    let (applicant, _) = register(&app.router, "a@x.com", "applicant").await;
    let (_, application) = post(
        &app.router,
        "/api/applications",
        json!({ "jobId": job["job"]["id"], "userId": applicant }),
    )
    .await;
    let status_uri = format!(
        "/api/applications/{}/status",
        application["application"]["id"].as_str().unwrap()
    );
    let inbox_uri = format!("/api/notifications/{}", applicant);
    let inbox_len = |body: &serde_json::Value| body["notifications"].as_array().unwrap().len();

    let (status, body) = put(&app.router, &status_uri, json!({ "status": "maybe" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Valid status (pending, accepted, rejected) is required");

    let (status, body) = put(&app.router, &status_uri, json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Application pending successfully");
    assert_eq!(inbox_len(&get(&app.router, &inbox_uri).await.1), 0);

    let (status, body) = put(
        &app.router,
        &status_uri,
        json!({ "status": "accepted", "notes": "Strong portfolio" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["notes"], "Strong portfolio");
    let (_, inbox) = get(&app.router, &inbox_uri).await;
    assert_eq!(inbox_len(&inbox), 1);
    assert_eq!(inbox["notifications"][0]["type"], "application_accepted");

    // same status again: no second notification, notes kept
    let (_, body) = put(&app.router, &status_uri, json!({ "status": "accepted" })).await;
    assert_eq!(body["application"]["notes"], "Strong portfolio");
    assert_eq!(inbox_len(&get(&app.router, &inbox_uri).await.1), 1);

    put(&app.router, &status_uri, json!({ "status": "rejected" })).await;
    let (_, inbox) = get(&app.router, &inbox_uri).await;
    assert_eq!(inbox_len(&inbox), 2);
    assert_eq!(inbox["notifications"][0]["type"], "application_rejected");

    let (status, _) = put(
        &app.router,
        &format!("/api/applications/{}/status", uuid::Uuid::new_v4()),
        json!({ "status": "accepted" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_read_flags() {
    let app = test_app().await;
    let (recruiter, _) = register(&app.router, "r@x.com", "recruiter").await;
    let (applicant, _) = register(&app.router, "a@x.com", "applicant").await;
    post(&app.router, "/api/jobs", job_body(&recruiter, "One")).await;
    post(&app.router, "/api/jobs", job_body(&recruiter, "Two")).await;

    let inbox_uri = format!("/api/notifications/{}", applicant);
    let (_, inbox) = get(&app.router, &inbox_uri).await;
    let first = inbox["notifications"][0]["id"].as_str().unwrap().to_string();

    let read_uri = format!("/api/notifications/{}/read", first);
    let (status, body) = put(&app.router, &read_uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["read"], true);

    let (status, body) = put(
        &app.router,
        &format!("/api/notifications/user/{}/read-all", applicant),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All notifications marked as read");
    let (_, inbox) = get(&app.router, &inbox_uri).await;
    assert!(inbox["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["read"] == true));

    let delete_uri = format!("/api/notifications/{}", first);
    let (status, _) =
        common::send(&app.router, axum::http::Method::DELETE, &delete_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        common::send(&app.router, axum::http::Method::DELETE, &delete_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Notification not found");
}
