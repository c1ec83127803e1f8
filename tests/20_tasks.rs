mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_move_delete_scenario() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, user) = common::register_user(&server.base_url).await?;

    // Create with only a title; everything else takes store defaults
    let task = common::create_task(&server.base_url, &token, json!({ "title": "Buy milk" })).await?;
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["completed"], false);
    assert_eq!(task["hasReminder"], false);
    assert_eq!(task["createdBy"], user["id"]);
    let id = task["id"].as_str().unwrap().to_string();

    // Move to another column; every other field stays put
    let res = client
        .patch(format!("{}/api/tasks/{}/status", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "status": "inProgress" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let moved = res.json::<Value>().await?["data"].clone();
    assert_eq!(moved["status"], "inProgress");
    assert_eq!(moved["title"], "Buy milk");
    assert_eq!(moved["priority"], "medium");
    assert_eq!(moved["completed"], false);

    // Delete, then the task is gone
    let res = client
        .delete(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"], json!({}));

    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn blank_titles_never_persist() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    for body in [json!({ "title": "" }), json!({ "title": "   " }), json!({})] {
        let res = client
            .post(format!("{}/api/tasks", server.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let err = res.json::<Value>().await?;
        assert_eq!(err["success"], false);
    }

    // Nothing was persisted for this fresh user
    let res = client
        .get(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn status_update_rejects_unknown_columns() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    let task = common::create_task(&server.base_url, &token, json!({ "title": "Stays put" })).await?;
    let id = task["id"].as_str().unwrap();

    for body in [json!({}), json!({ "status": "done" }), json!({ "status": "inprogress" })] {
        let res = client
            .patch(format!("{}/api/tasks/{}/status", server.base_url, id))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let err = res.json::<Value>().await?;
        assert_eq!(err["message"], "Please provide a valid status");
    }

    // The task is untouched
    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["data"]["status"], "todo");

    Ok(())
}

#[tokio::test]
async fn toggling_completion_twice_is_idempotent() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    let task = common::create_task(&server.base_url, &token, json!({ "title": "Flip me" })).await?;
    let id = task["id"].as_str().unwrap();
    assert_eq!(task["completed"], false);

    let url = format!("{}/api/tasks/{}/completed", server.base_url, id);

    let once = client.patch(&url).bearer_auth(&token).send().await?;
    assert_eq!(once.status(), StatusCode::OK);
    let once = once.json::<Value>().await?["data"].clone();
    assert_eq!(once["completed"], true);
    // The completion flag is independent of the board column
    assert_eq!(once["status"], "todo");

    let twice = client.patch(&url).bearer_auth(&token).send().await?;
    let twice = twice.json::<Value>().await?["data"].clone();
    assert_eq!(twice["completed"], false);

    Ok(())
}

#[tokio::test]
async fn partial_update_leaves_unspecified_fields_alone() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    let task = common::create_task(
        &server.base_url,
        &token,
        json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "dueDate": "2026-09-01T09:00:00Z",
        }),
    )
    .await?;
    let id = task["id"].as_str().unwrap();

    // Bump the priority only
    let res = client
        .put(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "priority": "high" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?["data"].clone();
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["title"], "Write report");
    assert_eq!(updated["description"], "quarterly numbers");
    assert!(updated["dueDate"].is_string());

    // An explicit null clears the due date; an absent key would not
    let res = client
        .put(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "dueDate": null }))
        .send()
        .await?;
    let cleared = res.json::<Value>().await?["data"].clone();
    assert!(cleared["dueDate"].is_null());
    assert_eq!(cleared["priority"], "high");

    // Over-long titles are rejected and nothing changes
    let res = client
        .put(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "title": "x".repeat(101) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn list_reports_count_and_only_own_tasks() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    for title in ["one", "two", "three"] {
        common::create_task(&server.base_url, &token, json!({ "title": title })).await?;
    }

    let res = client
        .get(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    Ok(())
}
