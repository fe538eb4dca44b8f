mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};

use common::{app, backend_job, call, create_job, signup};

#[tokio::test]
async fn profile_upsert_is_idempotent_and_self_only() {
    let app = app();
    let (token, user_id) = signup(&app, "Carl", "carl@example.com", "candidate").await;
    let (other_token, _) = signup(&app, "Dana", "dana@example.com", "candidate").await;
    let uri = format!("/api/profile/{}", user_id);

    let (status, body) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Profile not found");

    let fields = json!({
        "location": "Lisbon",
        "technicalSkills": "Rust, SQL",
        "graduationYear": "2020",
    });
    let (status, first) = call(&app, Method::PUT, &uri, Some(&token), Some(fields.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Profile updated successfully");
    assert_eq!(first["profile"]["userId"], user_id);

    let (status, second) = call(&app, Method::PUT, &uri, Some(&token), Some(fields)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["profile"]["id"], first["profile"]["id"]);

    let (status, body) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["technicalSkills"], "Rust, SQL");
    assert_eq!(body["user"]["email"], "carl@example.com");

    let (status, _) = call(&app, Method::GET, &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::PUT, &uri, Some(&other_token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn timestamp(value: &JsonValue) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn profile_upsert_replaces_omitted_fields() {
    let app = app();
    let (token, user_id) = signup(&app, "Carl", "carl@example.com", "candidate").await;
    let uri = format!("/api/profile/{}", user_id);

    let (status, first) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "location": "Lisbon", "degree": "BSc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["profile"]["degree"], "BSc");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let (status, second) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "location": "Oslo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["profile"]["location"], "Oslo");
    assert!(second["profile"]["degree"].is_null());
    assert_eq!(second["profile"]["id"], first["profile"]["id"]);
    assert_eq!(second["profile"]["createdAt"], first["profile"]["createdAt"]);
    assert!(
        timestamp(&second["profile"]["updatedAt"]) > timestamp(&first["profile"]["updatedAt"])
    );

    let (_, body) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(body["location"], "Oslo");
    assert!(body["degree"].is_null());
}

#[tokio::test]
async fn signup_login_and_current_user() {
    let app = app();
    let (_, user_id) = signup(&app, "Hana", "Hana@Example.com", "hr").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "name": "Impostor",
            "email": "hana@example.com",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "hana@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "hana@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "hr");
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/auth/user/{}", user_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Hana");
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ann", "email": "not-an-email", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "secret123",
            "role": "admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Role must be candidate or hr");
}

#[tokio::test]
async fn dashboard_is_scoped_by_role() {
    let app = app();
    let (hr_token, hr_id) = signup(&app, "Hana", "hana@example.com", "hr").await;
    let (cand_token, cand_id) = signup(&app, "Carl", "carl@example.com", "candidate").await;
    let job_id = create_job(&app, &hr_token, hr_id, backend_job()).await;
    call(
        &app,
        Method::POST,
        &format!("/api/jobs/apply/{}/{}", job_id, cand_id),
        Some(&cand_token),
        None,
    )
    .await;

    let second_job = create_job(
        &app,
        &hr_token,
        hr_id,
        json!({
            "title": "Data Engineer",
            "company": "Acme",
            "location": "Remote",
            "description": "...",
            "requirements": "Python",
        }),
    )
    .await;
    let mut second_job_applications = Vec::new();
    for n in 0..3 {
        let (token, id) = signup(
            &app,
            &format!("Cand {}", n),
            &format!("cand{}@example.com", n),
            "candidate",
        )
        .await;
        let (_, body) = call(
            &app,
            Method::POST,
            &format!("/api/jobs/apply/{}/{}", second_job, id),
            Some(&token),
            None,
        )
        .await;
        second_job_applications.push(body["application"]["id"].as_i64().unwrap());
    }
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/jobs/applications/{}/status", second_job_applications[0]),
        Some(&hr_token),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/api/dashboard", Some(&hr_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "hr");
    assert_eq!(body["myJobs"], 2);
    assert_eq!(body["totalApplications"], 4);
    assert_eq!(body["activeJobs"], 2);
    assert_eq!(body["statusCounts"]["pending"], 3);
    assert_eq!(body["statusCounts"]["rejected"], 1);
    assert_eq!(body["statusCounts"]["accepted"], 0);
    assert_eq!(body["jobs"][0]["applicationCount"], 3);
    assert_eq!(body["jobs"][1]["applicationCount"], 1);

    // Two newest per job, newest job first, then the older job.
    let recent = body["recentApplications"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0]["id"], second_job_applications[2]);
    assert_eq!(recent[1]["id"], second_job_applications[1]);
    assert_eq!(recent[2]["job"]["title"], "Backend Engineer");
    assert_eq!(recent[2]["candidate"]["email"], "carl@example.com");

    let (status, body) = call(&app, Method::GET, "/api/dashboard", Some(&cand_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "candidate");
    assert_eq!(body["totalJobs"], 2);
    assert_eq!(body["applications"], 1);
    assert_eq!(body["statusCounts"]["pending"], 1);
    assert_eq!(body["recentJobs"][0]["title"], "Data Engineer");
    assert_eq!(body["recentJobs"][1]["title"], "Backend Engineer");
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/jobs"].is_object());
}
