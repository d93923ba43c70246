#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub const BOUNDARY: &str = "X-RECRUITMENT-PORTAL-BOUNDARY";

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn read(response: axum::response::Response) -> (StatusCode, JsonValue) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    send(app, Method::PUT, uri, None, Some(body)).await
}

/// Registers an account and returns `(user id, session token)`.
pub async fn register(app: &Router, email: &str, role: &str) -> (String, String) {
    let (status, body) = post(
        app,
        "/api/auth/register",
        json!({ "email": email, "password": "secret1", "role": role }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", email, body);
    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

pub async fn admin_token(app: &Router) -> String {
    let (status, body) = post(
        app,
        "/api/auth/login",
        json!({ "email": "admin@recruiter.com", "password": "admin123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login: {}", body);
    body["token"].as_str().unwrap().to_string()
}

pub fn job_body(recruiter_id: &str, title: &str) -> JsonValue {
    json!({
        "title": title,
        "details": "Build and run the hiring pipeline",
        "location": "Berlin",
        "jobType": "Full-Time",
        "deadline": "2031-06-30",
        "recruiterId": recruiter_id,
    })
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub async fn send_multipart(
    app: &Router,
    uri: &str,
    parts: &[Part<'_>],
) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    read(app.clone().oneshot(request).await.unwrap()).await
}
