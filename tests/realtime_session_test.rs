//! Live session tests
//!
//! Drives `ChatSession` directly and reads each connection's event queue,
//! the same queue the websocket transport drains.

mod common;

use pretty_assertions::assert_eq;

use common::TestContext;
use fieldchat::backend::chat::PageQuery;
use fieldchat::backend::realtime::hub::EventReceiver;
use fieldchat::backend::realtime::{ChatSession, Connect, Rejection};
use fieldchat::shared::{
    ChatRoom, Identity, MessageDraft, PresenceStatus, RoomType, ServerEvent,
};

async fn open_room(ctx: &TestContext) -> ChatRoom {
    let (room, _) = ctx
        .chat()
        .find_or_create_room(&ctx.user, None, RoomType::General)
        .await
        .unwrap();
    room
}

async fn join(ctx: &TestContext, who: &Identity, room: &ChatRoom) -> (ChatSession, EventReceiver) {
    match ChatSession::connect(ctx.chat(), Some(who.clone()), room.id)
        .await
        .unwrap()
    {
        Connect::Joined(session, events) => (session, events),
        Connect::Rejected(reason) => panic!("Expected to join, rejected: {}", reason),
    }
}

fn rejection(connect: Connect) -> Rejection {
    match connect {
        Connect::Rejected(reason) => reason,
        Connect::Joined(session, _) => panic!(
            "Expected a rejection, joined as {}",
            session.connection_id()
        ),
    }
}

fn drain(events: &mut EventReceiver) -> Vec<ServerEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test]
async fn test_join_announces_online_to_everyone() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (_user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    assert_eq!(
        drain(&mut user_events),
        vec![ServerEvent::presence(&ctx.user, PresenceStatus::Online)]
    );

    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    let online = ServerEvent::presence(&ctx.admin, PresenceStatus::Online);
    assert_eq!(drain(&mut user_events), vec![online.clone()]);
    assert_eq!(drain(&mut admin_events), vec![online]);
}

#[tokio::test]
async fn test_typing_not_echoed_to_origin() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut user_events);
    drain(&mut admin_events);

    user.handle_text(r#"{"type":"typing","is_typing":true}"#).await;

    assert!(drain(&mut user_events).is_empty());
    assert_eq!(
        drain(&mut admin_events),
        vec![ServerEvent::typing(&ctx.user, true)]
    );
}

#[tokio::test]
async fn test_chat_message_echoed_to_sender() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut user_events);
    drain(&mut admin_events);

    user.handle_text(r#"{"type":"chat_message","content":"Can I book pitch 1 at 7?"}"#)
        .await;

    let to_user = drain(&mut user_events);
    let to_admin = drain(&mut admin_events);
    assert_eq!(to_user.len(), 1);
    assert_eq!(to_user, to_admin);

    match &to_user[0] {
        ServerEvent::ChatMessage { message } => {
            assert_eq!(message.content, "Can I book pitch 1 at 7?");
            assert_eq!(message.sender.id, ctx.user.id);
            assert_eq!(message.room_id, room.id);
            assert!(message.is_read_by_user);
            assert!(!message.is_read_by_admin);
        }
        other => panic!("Expected chat_message, got {:?}", other),
    }

    let stored = ctx
        .chat()
        .list_messages(&ctx.user, room.id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(stored.messages.len(), 1);
}

#[tokio::test]
async fn test_mark_read_receipt_reaches_all_members() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let message = ctx
        .chat()
        .post_message(&ctx.user, room.id, MessageDraft::text("ping"))
        .await
        .unwrap()
        .unwrap();

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut user_events);
    drain(&mut admin_events);

    admin
        .handle_text(&format!(r#"{{"type":"mark_read","message_ids":[{}]}}"#, message.id))
        .await;

    let receipt = ServerEvent::messages_read(&ctx.admin, vec![message.id]);
    assert_eq!(drain(&mut admin_events), vec![receipt.clone()]);
    assert_eq!(drain(&mut user_events), vec![receipt]);

    let stored = ctx
        .chat()
        .list_messages(&ctx.admin, room.id, PageQuery::default())
        .await
        .unwrap();
    assert!(stored.messages[0].is_read_by_admin);

    drop(user);
}

#[tokio::test]
async fn test_blank_frame_is_dropped_silently() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    drain(&mut user_events);

    user.handle_text(r#"{"type":"chat_message","content":"   "}"#).await;

    assert!(drain(&mut user_events).is_empty());
}

#[tokio::test]
async fn test_malformed_frame_errors_only_to_sender() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut user_events);
    drain(&mut admin_events);

    user.handle_text("{not json").await;
    assert_eq!(
        drain(&mut user_events),
        vec![ServerEvent::error("Invalid JSON")]
    );

    user.handle_text(r#"{"type":"wave"}"#).await;
    assert_eq!(
        drain(&mut user_events),
        vec![ServerEvent::error("Unknown event type: wave")]
    );
    assert!(drain(&mut admin_events).is_empty());

    // Still joined and working.
    user.handle_text(r#"{"content":"still here"}"#).await;
    assert_eq!(drain(&mut admin_events).len(), 1);
    assert_eq!(ctx.state.hub.member_count(room.id), 2);
}

#[tokio::test]
async fn test_non_owner_rejected_without_broadcast() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (_user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    drain(&mut user_events);

    let outcome = ChatSession::connect(ctx.chat(), Some(ctx.other_user.clone()), room.id)
        .await
        .unwrap();
    assert_eq!(rejection(outcome), Rejection::AccessDenied);

    assert!(drain(&mut user_events).is_empty());
    assert_eq!(ctx.state.hub.member_count(room.id), 1);
}

#[tokio::test]
async fn test_anonymous_and_missing_room_rejected() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let anonymous = ChatSession::connect(ctx.chat(), None, room.id).await.unwrap();
    assert_eq!(rejection(anonymous), Rejection::Anonymous);

    let missing = ChatSession::connect(ctx.chat(), Some(ctx.admin.clone()), room.id + 1)
        .await
        .unwrap();
    assert_eq!(rejection(missing), Rejection::RoomNotFound);

    assert_eq!(ctx.state.hub.room_count(), 0);
}

#[tokio::test]
async fn test_close_announces_offline_once() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut user_events);
    drain(&mut admin_events);

    user.close();

    assert_eq!(
        drain(&mut admin_events),
        vec![ServerEvent::presence(&ctx.user, PresenceStatus::Offline)]
    );
    assert_eq!(ctx.state.hub.member_count(room.id), 1);
}

#[tokio::test]
async fn test_dropped_session_leaves_room() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    {
        let (_user, _user_events) = join(&ctx, &ctx.user, &room).await;
    }

    let events = drain(&mut admin_events);
    let offline = ServerEvent::presence(&ctx.user, PresenceStatus::Offline);
    assert_eq!(events.iter().filter(|e| **e == offline).count(), 1);
    assert_eq!(ctx.state.hub.member_count(room.id), 1);
}

#[tokio::test]
async fn test_http_post_reaches_live_members() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;

    let (_admin, mut admin_events) = join(&ctx, &ctx.admin, &room).await;
    drain(&mut admin_events);

    let message = ctx
        .chat()
        .post_message(&ctx.user, room.id, MessageDraft::text("sent over HTTP"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        drain(&mut admin_events),
        vec![ServerEvent::ChatMessage { message }]
    );
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let ctx = TestContext::new().await;
    let room = open_room(&ctx).await;
    let (other_room, _) = ctx
        .chat()
        .find_or_create_room(&ctx.other_user, None, RoomType::General)
        .await
        .unwrap();

    let (user, mut user_events) = join(&ctx, &ctx.user, &room).await;
    let (_watcher, mut other_events) = join(&ctx, &ctx.other_user, &other_room).await;
    drain(&mut user_events);
    drain(&mut other_events);

    user.handle_text(r#"{"content":"only for room one"}"#).await;
    user.handle_text(r#"{"type":"typing","is_typing":false}"#).await;

    assert_eq!(drain(&mut user_events).len(), 1);
    assert!(drain(&mut other_events).is_empty());
}
