use std::time::Duration;

use super::*;
use crate::config::NotifyConfig;
use crate::services::render::EMPTY_LIST_MESSAGE;
use crate::state::test_helpers::{ChatCall, RecordingChat};
use time::UtcOffset;

fn gateway(chat: &Arc<RecordingChat>) -> (ChatCommandGateway, ShoppingListStore, ConfirmationGate) {
    gateway_with_dispatcher(chat, NotificationDispatcher::disabled())
}

/// Gateway whose notifications go to chat "-100" through the same mock.
fn notifying_gateway(chat: &Arc<RecordingChat>) -> (ChatCommandGateway, ShoppingListStore, ConfirmationGate) {
    let dispatcher = NotificationDispatcher::spawn(
        chat.clone(),
        "-100".into(),
        ListRenderer::new(UtcOffset::UTC),
        NotifyConfig { queue_capacity: 8, send_timeout_secs: 5 },
    );
    gateway_with_dispatcher(chat, dispatcher)
}

fn gateway_with_dispatcher(
    chat: &Arc<RecordingChat>,
    dispatcher: NotificationDispatcher,
) -> (ChatCommandGateway, ShoppingListStore, ConfirmationGate) {
    let store = ShoppingListStore::new();
    let gate = ConfirmationGate::new();
    let gw = ChatCommandGateway::new(
        store.clone(),
        gate.clone(),
        ListRenderer::new(UtcOffset::UTC),
        dispatcher,
        chat.clone(),
    );
    (gw, store, gate)
}

fn sends_to(calls: &[ChatCall], target: &str) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            ChatCall::Send { chat_id, text, .. } if chat_id == target => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// parsing
// =============================================================================

#[test]
fn parse_commands_and_aliases() {
    assert_eq!(ChatCommand::parse("/list"), Some(ChatCommand::List));
    assert_eq!(ChatCommand::parse("/lista"), Some(ChatCommand::List));
    assert_eq!(ChatCommand::parse("/clear now"), Some(ChatCommand::Clear));
    assert_eq!(ChatCommand::parse("/start"), Some(ChatCommand::Help));
    assert_eq!(ChatCommand::parse("/help@lista_super_bot"), Some(ChatCommand::Help));
    assert_eq!(ChatCommand::parse("/LIST"), Some(ChatCommand::List));
}

#[test]
fn parse_rejects_plain_text() {
    assert_eq!(ChatCommand::parse("leche"), None);
    assert_eq!(ChatCommand::parse("   "), None);
}

#[test]
fn parse_keeps_unknown_command_name() {
    assert_eq!(ChatCommand::parse("/borrar"), Some(ChatCommand::Unknown("borrar".into())));
}

#[test]
fn button_ids_round_trip_through_wire_names() {
    for id in [ButtonId::ListAgain, ButtonId::ClearList, ButtonId::ConfirmClear, ButtonId::CancelClear] {
        assert_eq!(ButtonId::parse(id.as_str()), id);
    }
    assert_eq!(ButtonId::parse("nope"), ButtonId::Unknown("nope".into()));
}

// =============================================================================
// commands
// =============================================================================

#[tokio::test]
async fn list_command_sends_render_with_clear_button() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_list_command("s1").await;

    let calls = chat.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        ChatCall::Send { chat_id, text, buttons } => {
            assert_eq!(chat_id, "s1");
            assert!(text.starts_with("🛒 LISTA DE COMPRAS (1 producto)\n\n1. 🥛 leche"));
            assert_eq!(buttons, &vec!["clear-list".to_string()]);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn clear_command_requests_confirmation_without_clearing() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, gate) = gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("s1").await;

    assert_eq!(store.size(), 1);
    assert_eq!(gate.pending("s1").map(|r| r.action), Some(PendingAction::ClearList));
    match &chat.calls()[0] {
        ChatCall::Send { buttons, .. } => {
            assert_eq!(buttons, &vec!["confirm-clear".to_string(), "cancel-clear".to_string()]);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn help_and_unknown_commands_reply_with_text() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, _, _) = gateway(&chat);

    gw.handle(ChatEvent::Command { session_id: "s1".into(), command: ChatCommand::Help })
        .await;
    gw.handle(ChatEvent::Command { session_id: "s1".into(), command: ChatCommand::Unknown("foo".into()) })
        .await;

    let texts: Vec<_> = chat
        .calls()
        .into_iter()
        .map(|c| match c {
            ChatCall::Send { text, .. } => text,
            other => panic!("unexpected call: {other:?}"),
        })
        .collect();
    assert_eq!(texts[0], HELP_TEXT);
    assert!(texts[1].contains("/foo"));
}

#[tokio::test]
async fn reply_failure_is_swallowed() {
    let chat = Arc::new(RecordingChat::failing());
    let (gw, store, _) = gateway(&chat);
    store.append("pan").unwrap();
    gw.handle_list_command("s1").await;
    assert_eq!(store.size(), 1);
}

// =============================================================================
// buttons
// =============================================================================

#[tokio::test]
async fn confirm_without_request_does_not_clear() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("leche").unwrap();

    let outcome = gw
        .handle_button("s1", 10, "cb", &ButtonId::ConfirmClear)
        .await;

    assert_eq!(outcome, ButtonOutcome::NothingPending);
    assert_eq!(store.size(), 1);
    assert_eq!(chat.calls(), vec![ChatCall::Answer { callback_id: "cb".into(), text: NOTHING_PENDING_ACK.into() }]);
}

#[tokio::test]
async fn request_then_confirm_clears_exactly_once() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("leche").unwrap();
    store.append("pan").unwrap();

    gw.handle_clear_command("s1").await;
    let first = gw
        .handle_button("s1", 10, "cb1", &ButtonId::ConfirmClear)
        .await;
    store.append("huevos").unwrap();
    let second = gw
        .handle_button("s1", 10, "cb2", &ButtonId::ConfirmClear)
        .await;

    assert_eq!(first, ButtonOutcome::Cleared(2));
    assert_eq!(second, ButtonOutcome::NothingPending);
    assert_eq!(store.size(), 1);
    assert!(chat.calls().contains(&ChatCall::Edit {
        chat_id: "s1".into(),
        message_id: 10,
        text: render::cleared_notice(2),
        buttons: vec![],
    }));
}

#[tokio::test]
async fn request_then_cancel_leaves_list_untouched() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, gate) = gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("s1").await;
    let outcome = gw
        .handle_button("s1", 10, "cb", &ButtonId::CancelClear)
        .await;

    assert_eq!(outcome, ButtonOutcome::Cancelled { had_pending: true });
    assert_eq!(store.size(), 1);
    assert!(gate.pending("s1").is_none());
    assert!(chat.calls().contains(&ChatCall::Edit {
        chat_id: "s1".into(),
        message_id: 10,
        text: render::CANCELLED_NOTICE.into(),
        buttons: vec![],
    }));
}

#[tokio::test]
async fn clear_button_from_list_view_prompts_first() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, gate) = gateway(&chat);
    store.append("leche").unwrap();

    let outcome = gw
        .handle_button("s1", 10, "cb", &ButtonId::ClearList)
        .await;

    assert_eq!(outcome, ButtonOutcome::Prompted);
    assert_eq!(store.size(), 1);
    assert!(gate.pending("s1").is_some());
    assert!(matches!(
        &chat.calls()[0],
        ChatCall::Edit { buttons, .. } if buttons == &vec!["confirm-clear".to_string(), "cancel-clear".to_string()]
    ));
}

#[tokio::test]
async fn clear_button_with_pending_request_confirms() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("s1").await;
    let outcome = gw
        .handle_button("s1", 10, "cb", &ButtonId::ClearList)
        .await;

    assert_eq!(outcome, ButtonOutcome::Cleared(1));
    assert_eq!(store.size(), 0);
}

#[tokio::test]
async fn double_tap_clear_list_does_not_clear() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, gate) = gateway(&chat);
    store.append("leche").unwrap();
    store.append("pan").unwrap();

    let first = gw
        .handle_button("s1", 10, "cb1", &ButtonId::ClearList)
        .await;
    let second = gw
        .handle_button("s1", 10, "cb2", &ButtonId::ClearList)
        .await;

    assert_eq!(first, ButtonOutcome::Prompted);
    assert_eq!(second, ButtonOutcome::Prompted);
    assert_eq!(store.size(), 2);
    assert!(gate.pending("s1").is_some());

    // The prompt's confirm button still resolves it.
    let confirmed = gw
        .handle_button("s1", 10, "cb3", &ButtonId::ConfirmClear)
        .await;
    assert_eq!(confirmed, ButtonOutcome::Cleared(2));
}

#[tokio::test]
async fn chat_clear_notifies_household_chat() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = notifying_gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("s1").await;
    gw.handle_button("s1", 10, "cb", &ButtonId::ConfirmClear)
        .await;

    let calls = chat.wait_for_calls(4).await;
    assert_eq!(sends_to(&calls, "-100"), vec![EMPTY_LIST_MESSAGE.to_string()]);
}

#[tokio::test]
async fn clear_inside_household_chat_is_not_repeated() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = notifying_gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("-100").await;
    gw.handle_button("-100", 10, "cb", &ButtonId::ConfirmClear)
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.size(), 0);
    // Only the prompt itself was sent there.
    assert_eq!(sends_to(&chat.calls(), "-100").len(), 1);
}

#[tokio::test]
async fn report_failure_answers_buttons_and_replies_to_commands() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, _, _) = gateway(&chat);

    gw.report_failure(&ChatEvent::Button {
        session_id: "s1".into(),
        message_id: 3,
        callback_id: "cb".into(),
        button: ButtonId::ListAgain,
    })
    .await;
    gw.report_failure(&ChatEvent::Command { session_id: "s1".into(), command: ChatCommand::List })
        .await;

    assert_eq!(
        chat.calls(),
        vec![
            ChatCall::Answer { callback_id: "cb".into(), text: FAILURE_ACK.into() },
            ChatCall::Send { chat_id: "s1".into(), text: FAILURE_ACK.into(), buttons: vec![] },
        ]
    );
}

#[tokio::test]
async fn pending_request_is_scoped_to_its_session() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("leche").unwrap();

    gw.handle_clear_command("s1").await;
    let outcome = gw
        .handle_button("s2", 10, "cb", &ButtonId::ConfirmClear)
        .await;

    assert_eq!(outcome, ButtonOutcome::NothingPending);
    assert_eq!(store.size(), 1);
}

#[tokio::test]
async fn list_again_edits_in_place() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, _) = gateway(&chat);
    store.append("pan").unwrap();

    let outcome = gw
        .handle_button("s1", 3, "cb", &ButtonId::ListAgain)
        .await;

    assert_eq!(outcome, ButtonOutcome::Refreshed);
    match &chat.calls()[0] {
        ChatCall::Edit { message_id, text, buttons, .. } => {
            assert_eq!(*message_id, 3);
            assert!(text.contains("1. 🍞 pan"));
            assert_eq!(buttons, &vec!["list-again".to_string(), "clear-list".to_string()]);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_button_only_acknowledges() {
    let chat = Arc::new(RecordingChat::default());
    let (gw, store, gate) = gateway(&chat);
    store.append("pan").unwrap();
    gate.request("s1", PendingAction::ClearList);

    let outcome = gw
        .handle_button("s1", 3, "cb", &ButtonId::Unknown("boom".into()))
        .await;

    assert_eq!(outcome, ButtonOutcome::Ignored);
    assert_eq!(store.size(), 1);
    assert!(gate.pending("s1").is_some());
    assert_eq!(chat.calls(), vec![ChatCall::Answer { callback_id: "cb".into(), text: UNKNOWN_BUTTON_ACK.into() }]);
}

#[tokio::test]
async fn failed_edit_answers_with_failure_notice() {
    let chat = Arc::new(RecordingChat::failing());
    let (gw, store, _) = gateway(&chat);
    store.append("pan").unwrap();

    gw.handle_clear_command("s1").await;
    let outcome = gw
        .handle_button("s1", 3, "cb", &ButtonId::ConfirmClear)
        .await;

    assert_eq!(outcome, ButtonOutcome::Cleared(1));
    assert!(chat.calls().contains(&ChatCall::Answer { callback_id: "cb".into(), text: FAILURE_ACK.into() }));
}

#[test]
fn not_modified_error_is_recognised() {
    let err = ChatError::Api {
        status: 400,
        description: "Bad Request: message is not modified: specified new message content".into(),
    };
    assert!(is_not_modified(&err));
    assert!(!is_not_modified(&ChatError::Timeout(5)));
}
