//! HTTP-level integration tests for the complaint lifecycle.
//!
//! Every test runs against a fresh in-memory store.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, patch_json_auth, post_json_auth, put_json_auth,
    seed_admin, seed_complaint, seed_regular,
};
use redress_core::lifecycle::TransitionPolicy;
use serde_json::json;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_pending_complaint_with_empty_children() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;

    let body = json!({
        "title": "  Login fails  ",
        "description": "I cannot log in since the last update",
        "category": "Technical",
        "priority": "critical",
    });
    let response = post_json_auth(app, "/api/v1/complaints", body, &alice.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["id"].is_i64());
    assert_eq!(data["title"], "Login fails");
    assert_eq!(data["category"], "technical");
    assert_eq!(data["priority"], "Urgent");
    assert_eq!(data["status"], "Pending");
    assert_eq!(data["owner_id"], alice.id());
    assert!(data["assigned_to"].is_null());
    assert!(data["reference"].as_str().unwrap().starts_with("CMP-"));
    assert_eq!(data["comments"], json!([]));
    assert_eq!(data["status_history"], json!([]));
}

#[tokio::test]
async fn create_defaults_category_and_priority() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;

    let body = json!({ "title": "Slow support", "description": "Nobody answered my email" });
    let response = post_json_auth(app, "/api/v1/complaints", body, &alice.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["category"], "other");
    assert_eq!(json["data"]["priority"], "Low");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;

    let body = json!({ "title": "ab", "description": "short", "priority": "whenever" });
    let response = post_json_auth(app, "/api/v1/complaints", body, &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["description", "priority", "title"]);
}

#[tokio::test]
async fn create_with_malformed_body_is_bad_request() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;

    let body = json!({ "title": "Missing description" });
    let response = post_json_auth(app, "/api/v1/complaints", body, &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn create_requires_authentication() {
    let (app, _state) = common::build_test_app();
    let response = get(app, "/api/v1/complaints").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn triage_scenario_from_submission_to_admin_listing() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let bob = seed_regular(&state, "Bob").await;
    let admin = seed_admin(&state, "Admin").await;

    // User A submits.
    let body = json!({
        "title": "Login fails",
        "description": "The login page rejects my password",
        "category": "technical",
    });
    let response = post_json_auth(app.clone(), "/api/v1/complaints", body, &alice.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Admin moves it to InProgress with a note.
    let body = json!({ "status": "InProgress", "note": "Investigating" });
    let uri = format!("/api/v1/complaints/{id}/status");
    let response = put_json_auth(app.clone(), &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "InProgress");

    // Owner sees exactly one history entry with the admin as actor.
    let uri = format!("/api/v1/complaints/{id}");
    let response = get_auth(app.clone(), &uri, &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let history = json["data"]["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["status"], "InProgress");
    assert_eq!(history[0]["previous_status"], "Pending");
    assert_eq!(history[0]["actor_id"], admin.id());
    assert_eq!(history[0]["note"], "Investigating");

    // User B is forbidden.
    let response = get_auth(app.clone(), &uri, &bob.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin's filtered listing contains it, with the histogram.
    let response = get_auth(
        app,
        "/api/v1/complaints/all?status=InProgress&category=technical",
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], id);
    assert_eq!(json["histogram"]["InProgress"], 1);
    assert_eq!(json["histogram"]["Pending"], 0);
    assert_eq!(json["histogram"]["Resolved"], 0);
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_owner_is_forbidden_on_every_single_record_route() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let bob = seed_regular(&state, "Bob").await;
    let complaint = seed_complaint(&state, &alice, "Alice's complaint").await;
    let id = complaint.id;

    for uri in [
        format!("/api/v1/complaints/{id}"),
        format!("/api/v1/complaints/{id}/comments"),
        format!("/api/v1/complaints/{id}/history"),
        format!("/api/v1/complaints/by-reference/{}", complaint.reference),
    ] {
        let response = get_auth(app.clone(), &uri, &bob.token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {uri}");
    }

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/complaints/{id}"),
        json!({ "title": "Hijacked" }),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/complaints/{id}/comments"),
        json!({ "message": "Not mine" }),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Ownership is checked before the body is validated.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/complaints/{id}"),
        json!({ "title": "x" }),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        &format!("/api/v1/complaints/{id}/comments"),
        json!({ "message": "   " }),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_complaint_is_not_found_even_with_invalid_bodies() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/complaints/999/comments",
        json!({ "message": "   " }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/complaints/999",
        json!({ "title": "x" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app,
        "/api/v1/complaints/999/status",
        json!({ "status": "Archived" }),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_only_routes_reject_regular_users() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let complaint = seed_complaint(&state, &alice, "My complaint").await;
    let id = complaint.id;

    let response = get_auth(app.clone(), "/api/v1/complaints/all", &alice.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/complaints/{id}/status"),
        json!({ "status": "Resolved" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/complaints/{id}/assign"),
        json!({ "assigned_to": "Me" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app, &format!("/api/v1/complaints/{id}"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_complaint_is_not_found() {
    let (app, state) = common::build_test_app();
    let admin = seed_admin(&state, "Admin").await;

    let response = get_auth(app, "/api/v1/complaints/999", &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Complaint with id 999 not found");
}

// ---------------------------------------------------------------------------
// Listing and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn own_listing_paginates_newest_first() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let bob = seed_regular(&state, "Bob").await;
    for i in 0..25 {
        seed_complaint(&state, &alice, &format!("Complaint {i}")).await;
    }
    seed_complaint(&state, &bob, "Bob's complaint").await;

    let expectations = [(1, 10), (2, 10), (3, 5), (4, 0)];
    for (page, expected_len) in expectations {
        let uri = format!("/api/v1/complaints?page={page}&limit=10");
        let response = get_auth(app.clone(), &uri, &alice.token).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), expected_len, "page {page}");
        assert_eq!(json["total"], 25);
        assert_eq!(json["page"], page);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["total_pages"], 3);
    }

    let response = get_auth(app, "/api/v1/complaints?limit=3", &alice.token).await;
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Complaint 24", "Complaint 23", "Complaint 22"]);
}

#[tokio::test]
async fn pagination_parameters_are_clamped() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    seed_complaint(&state, &alice, "Only one").await;

    let response = get_auth(app.clone(), "/api/v1/complaints?page=0&limit=1000", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 100);

    let response = get_auth(app, "/api/v1/complaints?limit=0", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["limit"], 1);
}

#[tokio::test]
async fn invalid_filter_value_is_rejected() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;

    let response = get_auth(app, "/api/v1/complaints?status=Archived", &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_is_scoped_for_users_and_global_for_admins() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let bob = seed_regular(&state, "Bob").await;
    let admin = seed_admin(&state, "Admin").await;

    let first = seed_complaint(&state, &alice, "First").await;
    for i in 0..6 {
        seed_complaint(&state, &alice, &format!("More {i}")).await;
    }
    seed_complaint(&state, &bob, "Bob's").await;

    let uri = format!("/api/v1/complaints/{}/status", first.id);
    let response = put_json_auth(app.clone(), &uri, json!({ "status": "Resolved" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/complaints/dashboard", &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 7);
    assert_eq!(data["pending"], 6);
    assert_eq!(data["in_progress"], 0);
    assert_eq!(data["resolved"], 1);
    let recent = data["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert!(recent.iter().all(|c| c["owner_id"] == alice.id()));

    let response = get_auth(app, "/api/v1/complaints/dashboard", &admin.token).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 8);
    assert_eq!(data["pending"], 7);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_status_change_appends_one_history_entry() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Flaky service").await;
    let uri = format!("/api/v1/complaints/{}/status", complaint.id);

    for status in ["InProgress", "InProgress", "Pending", "Resolved"] {
        let response =
            put_json_auth(app.clone(), &uri, json!({ "status": status }), &admin.token).await;
        assert_eq!(response.status(), StatusCode::OK, "status {status}");
    }

    let history_uri = format!("/api/v1/complaints/{}/history", complaint.id);
    let response = get_auth(app, &history_uri, &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let statuses: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["InProgress", "InProgress", "Pending", "Resolved"]);
}

#[tokio::test]
async fn forward_only_policy_rejects_backward_transitions() {
    let mut config = common::test_config();
    config.transition_policy = TransitionPolicy::ForwardOnly;
    let (app, state) = common::build_test_app_with(config);
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Flaky service").await;
    let uri = format!("/api/v1/complaints/{}/status", complaint.id);

    let response =
        put_json_auth(app.clone(), &uri, json!({ "status": "Resolved" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(app.clone(), &uri, json!({ "status": "Pending" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let history = state
        .complaints
        .list_status_history(complaint.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn resolution_is_only_accepted_with_resolved_status() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Double charge").await;
    let uri = format!("/api/v1/complaints/{}/status", complaint.id);

    let body = json!({ "status": "InProgress", "resolution": "Refunded" });
    let response = put_json_auth(app.clone(), &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "status": "Resolved", "resolution": "Refunded", "note": "Done" });
    let response = put_json_auth(app, &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Resolved");
    assert_eq!(json["data"]["resolution"], "Refunded");
}

#[tokio::test]
async fn reopening_a_resolved_complaint_clears_its_resolution() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Double charge").await;
    let uri = format!("/api/v1/complaints/{}/status", complaint.id);

    let body = json!({ "status": "Resolved", "resolution": "Refunded" });
    let response = put_json_auth(app.clone(), &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "status": "Pending", "note": "Customer says it happened again" });
    let response = put_json_auth(app.clone(), &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["status"], "Pending");
    assert!(data["resolution"].is_null());

    let response = get_auth(app, &format!("/api/v1/complaints/{}", complaint.id), &alice.token).await;
    let data = body_json(response).await["data"].clone();
    assert!(data["resolution"].is_null());
    assert_eq!(data["status_history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn triage_patch_updates_several_fields_at_once() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}", complaint.id);

    let body = json!({ "priority": "High", "assigned_to": "  Billing team ", "status": "in progress" });
    let response = patch_json_auth(app.clone(), &uri, body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["priority"], "High");
    assert_eq!(data["assigned_to"], "Billing team");
    assert_eq!(data["status"], "InProgress");

    let response = patch_json_auth(app, &uri, json!({}), &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assignment_does_not_touch_status_or_history() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}/assign", complaint.id);

    let response =
        put_json_auth(app.clone(), &uri, json!({ "assigned_to": "Jordan" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["assigned_to"], "Jordan");
    assert_eq!(data["status"], "Pending");

    let response = put_json_auth(app, &uri, json!({ "assigned_to": "   " }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let history = state
        .complaints
        .list_status_history(complaint.id)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn owner_edits_are_blocked_once_resolved() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}", complaint.id);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Wrong invoice for March" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Wrong invoice for March");

    let status_uri = format!("{uri}/status");
    let response =
        put_json_auth(app.clone(), &status_uri, json!({ "status": "Resolved" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(app, &uri, json!({ "title": "Too late" }), &alice.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comments_and_replies_are_appended_in_order() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}/comments", complaint.id);

    let response =
        post_json_auth(app.clone(), &uri, json!({ "message": "  Any update?  " }), &alice.token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await["data"].clone();
    assert_eq!(comment["message"], "Any update?");
    assert_eq!(comment["kind"], "comment");
    assert_eq!(comment["author_id"], alice.id());

    let response =
        post_json_auth(app.clone(), &uri, json!({ "message": "Looking into it" }), &admin.token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["kind"], "reply");

    let response = get_auth(app, &uri, &alice.token).await;
    let json = body_json(response).await;
    let messages: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["Any update?", "Looking into it"]);
}

#[tokio::test]
async fn blank_or_oversized_comment_is_rejected() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}/comments", complaint.id);

    let response = post_json_auth(app.clone(), &uri, json!({ "message": "   " }), &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let long = "x".repeat(501);
    let response = post_json_auth(app, &uri, json!({ "message": long }), &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(state.complaints.list_comments(complaint.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Reference lookup and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complaint_can_be_found_by_reference() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;

    let uri = format!(
        "/api/v1/complaints/by-reference/{}",
        complaint.reference.to_lowercase()
    );
    let response = get_auth(app.clone(), &uri, &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], complaint.id);

    let response = get_auth(app.clone(), "/api/v1/complaints/by-reference/CMP-000000-000000", &alice.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/complaints/by-reference/nonsense", &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_delete_removes_complaint_and_children() {
    let (app, state) = common::build_test_app();
    let alice = seed_regular(&state, "Alice").await;
    let admin = seed_admin(&state, "Admin").await;
    let complaint = seed_complaint(&state, &alice, "Wrong invoice").await;
    let uri = format!("/api/v1/complaints/{}", complaint.id);

    post_json_auth(
        app.clone(),
        &format!("{uri}/comments"),
        json!({ "message": "hello" }),
        &alice.token,
    )
    .await;

    let response = delete_auth(app.clone(), &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(state.complaints.list_comments(complaint.id).await.unwrap().is_empty());
}
