//! HTTP API tests
//!
//! Requests go through the full router (auth middleware, handlers, error
//! mapping) with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{seed_field, token_for, TestContext};
use fieldchat::shared::{Identity, MessageDraft, RoomType};

fn request(method: Method, uri: &str, who: Option<&Identity>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(who) = who {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(who)));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(ctx: &TestContext, request: Request<Body>) -> (StatusCode, Value) {
    let response = ctx.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_room(ctx: &TestContext, who: &Identity) -> i64 {
    let (status, body) = call(
        ctx,
        request(Method::POST, "/api/chat/rooms", Some(who), Some(json!({}))),
    )
    .await;
    assert!(status == StatusCode::CREATED || status == StatusCode::OK);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;
    let (status, body) = call(&ctx, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let (status, body) = call(&ctx, request(Method::GET, "/api/chat/rooms", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let forged = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(&ctx, forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_identity() {
    let ctx = TestContext::new().await;
    let (status, body) = call(&ctx, request(Method::GET, "/api/auth/me", Some(&ctx.admin), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "carol");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["id"], ctx.admin.id.to_string());
}

#[tokio::test]
async fn test_create_room_then_reuse() {
    let ctx = TestContext::new().await;
    let field = seed_field(ctx.pool(), "Court A").await;

    let body = json!({"field_id": field.id, "room_type": "field_inquiry"});
    let (status, first) = call(
        &ctx,
        request(Method::POST, "/api/chat/rooms", Some(&ctx.user), Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["room_type"], "field_inquiry");
    assert_eq!(first["is_active"], true);
    assert_eq!(first["admin_id"], Value::Null);

    let (status, second) = call(
        &ctx,
        request(Method::POST, "/api/chat/rooms", Some(&ctx.user), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    let (status, body) = call(
        &ctx,
        request(
            Method::POST,
            "/api/chat/rooms",
            Some(&ctx.user),
            Some(json!({"field_id": 9999})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Field not found");
}

#[tokio::test]
async fn test_missing_room_vs_foreign_room() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;

    let (status, body) = call(
        &ctx,
        request(Method::GET, &format!("/api/chat/rooms/{}", room_id), Some(&ctx.other_user), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    let (status, body) = call(
        &ctx,
        request(Method::GET, "/api/chat/rooms/4242", Some(&ctx.other_user), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chat room not found");

    let (status, body) = call(
        &ctx,
        request(Method::GET, &format!("/api/chat/rooms/{}", room_id), Some(&ctx.admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_type_display"], "General Support");
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_send_message_created_or_no_content() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;
    let uri = format!("/api/chat/rooms/{}/send_message", room_id);

    let (status, body) = call(
        &ctx,
        request(
            Method::POST,
            &uri,
            Some(&ctx.user),
            Some(json!({"content": "Do you rent balls?", "message_type": "text"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "Do you rent balls?");
    assert_eq!(body["message_type_display"], "Text");
    assert_eq!(body["sender"]["username"], "alice");
    assert_eq!(body["is_read_by_user"], true);
    assert_eq!(body["is_read_by_admin"], false);

    let (status, body) = call(
        &ctx,
        request(Method::POST, &uri, Some(&ctx.user), Some(json!({"content": "  "}))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = call(
        &ctx,
        request(Method::POST, &uri, Some(&ctx.other_user), Some(json!({"content": "hi"}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mark_read_and_unread_count() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;

    let mut ids = Vec::new();
    for text in ["one", "two"] {
        let message = ctx
            .chat()
            .post_message(&ctx.admin, room_id, MessageDraft::text(text))
            .await
            .unwrap()
            .unwrap();
        ids.push(message.id);
    }

    let (status, body) = call(
        &ctx,
        request(Method::GET, "/api/chat/unread_count", Some(&ctx.user), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"unread_count": 2}));

    let (status, body) = call(
        &ctx,
        request(
            Method::POST,
            &format!("/api/chat/rooms/{}/mark_read", room_id),
            Some(&ctx.user),
            Some(json!({"message_ids": ids})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Messages marked as read");
    assert_eq!(body["updated"], 2);

    let (_, body) = call(
        &ctx,
        request(Method::GET, "/api/chat/unread_count", Some(&ctx.user), None),
    )
    .await;
    assert_eq!(body, json!({"unread_count": 0}));
}

#[tokio::test]
async fn test_message_history_pages() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;

    for n in 0..5 {
        ctx.chat()
            .post_message(&ctx.user, room_id, MessageDraft::text(format!("m{}", n)))
            .await
            .unwrap();
    }

    let (status, body) = call(
        &ctx,
        request(
            Method::GET,
            &format!("/api/chat/rooms/{}/messages?page=2&page_size=2", room_id),
            Some(&ctx.user),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_more"], true);
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["m2", "m3"]);

    let (_, body) = call(
        &ctx,
        request(
            Method::GET,
            &format!("/api/chat/rooms/{}/messages?page=3&page_size=2", room_id),
            Some(&ctx.user),
            None,
        ),
    )
    .await;
    assert_eq!(body["has_more"], false);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_room_list_is_scoped() {
    let ctx = TestContext::new().await;
    create_room(&ctx, &ctx.user).await;
    create_room(&ctx, &ctx.other_user).await;

    let (status, body) = call(&ctx, request(Method::GET, "/api/chat/rooms", Some(&ctx.user), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["user_id"], ctx.user.id.to_string());
    assert_eq!(body[0]["unread_count"], 0);
    assert_eq!(body[0]["last_message"], Value::Null);

    let (_, body) = call(&ctx, request(Method::GET, "/api/chat/rooms", Some(&ctx.admin), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_assign_admin_responses() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;
    let uri = format!("/api/chat/rooms/{}/assign_admin", room_id);

    let (status, body) = call(
        &ctx,
        request(Method::POST, &uri, Some(&ctx.user), Some(json!({"admin_id": ctx.admin.id}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only admin can assign chat rooms");

    let (status, body) = call(
        &ctx,
        request(Method::POST, &uri, Some(&ctx.admin), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "admin_id is required");

    let (status, body) = call(
        &ctx,
        request(Method::POST, &uri, Some(&ctx.admin), Some(json!({"admin_id": ctx.user.id}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Admin not found");

    let (status, body) = call(
        &ctx,
        request(
            Method::POST,
            &uri,
            Some(&ctx.admin),
            Some(json!({"admin_id": ctx.other_admin.id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin assigned successfully");
    assert_eq!(body["assignment"]["admin_id"], ctx.other_admin.id.to_string());

    let (status, body) = call(
        &ctx,
        request(
            Method::GET,
            &format!("/api/chat/rooms/{}/assignments", room_id),
            Some(&ctx.admin),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_close_room() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;
    let uri = format!("/api/chat/rooms/{}/close", room_id);

    let (status, body) = call(&ctx, request(Method::POST, &uri, Some(&ctx.user), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let fresh = create_room(&ctx, &ctx.user).await;
    assert_ne!(fresh, room_id);

    let (room, created) = ctx
        .chat()
        .find_or_create_room(&ctx.user, None, RoomType::General)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(room.id, fresh);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let ctx = TestContext::new().await;
    let (status, body) = call(&ctx, request(Method::GET, "/api/nowhere", Some(&ctx.user), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_unparsable_requests_use_error_body() {
    let ctx = TestContext::new().await;
    let room_id = create_room(&ctx, &ctx.user).await;

    let broken = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/chat/rooms/{}/send_message", room_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&ctx.user)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"content\": "))
        .unwrap();
    let (status, body) = call(&ctx, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let (status, body) = call(
        &ctx,
        request(
            Method::POST,
            &format!("/api/chat/rooms/{}/mark_read", room_id),
            Some(&ctx.user),
            Some(json!({"message_ids": "all"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = call(
        &ctx,
        request(Method::GET, "/api/chat/rooms/not-a-number", Some(&ctx.user), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = call(
        &ctx,
        request(
            Method::GET,
            &format!("/api/chat/rooms/{}/messages?page=first", room_id),
            Some(&ctx.user),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}
