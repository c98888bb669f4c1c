//! Session state machine: races, events and listener lifecycle

mod common;

use common::*;
use std::sync::Arc;
use tokio_test::{assert_pending, assert_ready_eq, task};
use types::{ChainId, ErrorKind, SessionStatus, WalletId};
use wallet_service::{
    ConnectOutcome, Eip1193Provider, InjectedProvider, ProviderRpcError, ProviderSlot, SessionState,
};

/// Snapshot with the epoch zeroed, for comparing terminal states
fn settled(state: SessionState) -> SessionState {
    SessionState { epoch: 0, ..state }
}

#[tokio::test]
async fn test_connect_then_events_flow_through() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    assert_eq!(session.connect(WalletId::MetaMask).await, ConnectOutcome::Connected);
    assert_eq!(drain(&mut rx), vec!["Wallet connected successfully!"]);

    wallet.emit_chain("0x38");
    let state = session.snapshot();
    assert_eq!(state.chain_id, Some(ChainId(56)));
    assert_eq!(state.chain_id_hex.as_deref(), Some("0x38"));
    assert_eq!(state.status, SessionStatus::Connected);
}

#[test]
fn test_latest_connect_wins_when_it_finishes_first() {
    let wallet = MockWallet::new(&[], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    let first_reply = wallet.defer_connect();
    let second_reply = wallet.defer_connect();

    let mut first = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(first.poll());
    let mut second = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(second.poll());

    wallet.set_accounts(&[BOB]);
    second_reply.send(Ok(vec![BOB.to_string()])).unwrap();
    assert_ready_eq!(second.poll(), ConnectOutcome::Connected);

    first_reply
        .send(Ok(vec![ALICE.to_string(), CAROL.to_string()]))
        .unwrap();
    assert!(first.is_woken());
    assert_ready_eq!(first.poll(), ConnectOutcome::Stale);

    let state = session.snapshot();
    assert_eq!(state.status, SessionStatus::Connected);
    assert_eq!(state.account.as_deref(), Some(BOB));
    assert_eq!(state.accounts, vec![BOB.to_string()]);
    assert_eq!(drain(&mut rx), vec!["Wallet connected successfully!"]);
}

#[test]
fn test_latest_connect_wins_when_it_finishes_last() {
    let wallet = MockWallet::new(&[BOB], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    let first_reply = wallet.defer_connect();
    let second_reply = wallet.defer_connect();

    let mut first = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(first.poll());
    let mut second = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(second.poll());

    // Earlier call fails late: must not flip the session to error
    first_reply.send(Err(ProviderRpcError::user_rejected())).unwrap();
    assert_ready_eq!(first.poll(), ConnectOutcome::Stale);
    assert_eq!(session.status(), SessionStatus::Connecting);
    assert!(drain(&mut rx).is_empty());

    second_reply.send(Ok(vec![BOB.to_string()])).unwrap();
    assert_ready_eq!(second.poll(), ConnectOutcome::Connected);

    let state = session.snapshot();
    assert_eq!(state.account.as_deref(), Some(BOB));
    assert_eq!(state.error_kind, None);
    assert_eq!(drain(&mut rx), vec!["Wallet connected successfully!"]);
}

#[test]
fn test_disconnect_during_connect_discards_result() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    let reply = wallet.defer_connect();
    let mut connect = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(connect.poll());

    session.disconnect_local();
    reply.send(Ok(vec![ALICE.to_string()])).unwrap();
    assert_ready_eq!(connect.poll(), ConnectOutcome::Stale);

    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(wallet.provider.listener_count("accountsChanged"), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_user_rejection_vs_generic_failure() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    wallet.fail_next_connect(ProviderRpcError::new(4001, "User rejected the request."));
    assert_eq!(
        session.connect(WalletId::MetaMask).await,
        ConnectOutcome::Failed(ErrorKind::UserRejected)
    );
    assert_eq!(drain(&mut rx), vec!["Connection rejected"]);

    wallet.fail_next_connect(ProviderRpcError::new(-32002, "Request already pending"));
    assert_eq!(
        session.connect(WalletId::MetaMask).await,
        ConnectOutcome::Failed(ErrorKind::ConnectFailed)
    );
    assert_eq!(drain(&mut rx), vec!["Failed to connect wallet"]);

    let state = session.snapshot();
    assert_eq!(state.status, SessionStatus::Error);
    assert_eq!(state.account, None);
    assert!(state.accounts.is_empty());
    assert_eq!(state.active_wallet, None);

    // Retry from error
    assert_eq!(session.connect(WalletId::MetaMask).await, ConnectOutcome::Connected);
    assert_eq!(session.snapshot().error_kind, None);
}

#[tokio::test]
async fn test_not_installed_fails_fast_without_notification() {
    let (session, mut rx) = session_for(ProviderSlot::new());

    assert_eq!(
        session.connect(WalletId::MetaMask).await,
        ConnectOutcome::Failed(ErrorKind::NotInstalled)
    );
    assert_eq!(session.snapshot().error_kind, Some(ErrorKind::NotInstalled));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_late_injection_is_picked_up() {
    let slot = ProviderSlot::new();
    let (session, _rx) = session_for(slot.clone());

    session.connect(WalletId::MetaMask).await;
    assert_eq!(session.status(), SessionStatus::Error);

    let wallet = MockWallet::new(&[ALICE], "0x61");
    slot.inject(wallet.provider.clone());
    assert_eq!(session.connect(WalletId::MetaMask).await, ConnectOutcome::Connected);
    assert_eq!(session.snapshot().chain_id, Some(ChainId::BSC_TESTNET));
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    session.disconnect_local();
    let first = session.snapshot();
    assert_eq!(settled(first.clone()), SessionState::default());
    assert_eq!(drain(&mut rx), vec!["Wallet disconnected"]);

    session.disconnect_local();
    let second = session.snapshot();
    assert_eq!(settled(second.clone()), settled(first.clone()));
    assert!(second.epoch > first.epoch);
    assert!(drain(&mut rx).is_empty());

    for event in ["accountsChanged", "chainChanged", "disconnect"] {
        assert_eq!(wallet.provider.listener_count(event), 0);
    }
}

#[tokio::test]
async fn test_empty_accounts_event_equals_disconnect() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    wallet.emit_accounts(&[]);
    let via_event = settled(session.snapshot());
    assert_eq!(drain(&mut rx), vec!["Wallet disconnected"]);

    let (other, _rx) = session_for(wallet.slot());
    other.connect(WalletId::MetaMask).await;
    other.disconnect_local();
    assert_eq!(via_event, settled(other.snapshot()));
    assert_eq!(via_event, SessionState::default());
}

#[tokio::test]
async fn test_provider_disconnect_event_resets_session() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    wallet.emit_disconnect();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(drain(&mut rx), vec!["Wallet disconnected"]);
}

#[tokio::test]
async fn test_account_switch_notifies_once() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    let before = session.epoch();
    wallet.emit_accounts(&[BOB, ALICE]);
    let state = session.snapshot();
    assert_eq!(state.account.as_deref(), Some(BOB));
    assert_eq!(state.accounts.len(), 2);
    assert_eq!(state.previous_account.as_deref(), Some(ALICE));
    assert_eq!(state.epoch, before + 1);
    assert_eq!(drain(&mut rx), vec!["Account switched"]);

    // Re-announcing the same active account is silent
    wallet.emit_accounts(&[BOB]);
    assert!(drain(&mut rx).is_empty());
    assert_eq!(session.snapshot().accounts, vec![BOB.to_string()]);
}

#[tokio::test]
async fn test_reconnect_does_not_duplicate_listeners() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    session.connect(WalletId::MetaMask).await;
    session.connect(WalletId::MetaMask).await;
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    for event in ["accountsChanged", "chainChanged", "disconnect"] {
        assert_eq!(wallet.provider.listener_count(event), 1);
    }

    wallet.emit_accounts(&[BOB]);
    assert_eq!(drain(&mut rx), vec!["Account switched"]);
}

#[tokio::test]
async fn test_unparseable_chain_keeps_hex() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, _rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;

    wallet.emit_chain("0xnot-hex");
    let state = session.snapshot();
    assert_eq!(state.chain_id_hex.as_deref(), Some("0xnot-hex"));
    assert_eq!(state.chain_id, None);
    assert_eq!(state.status, SessionStatus::Connected);
}

#[tokio::test]
async fn test_sync_swallows_read_failures() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, _rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;

    wallet.set_chain(None);
    wallet.set_accounts(&[]);
    session.sync().await;

    let state = session.snapshot();
    assert_eq!(state.status, SessionStatus::Connected);
    assert_eq!(state.account.as_deref(), Some(ALICE));
    assert_eq!(state.chain_id, Some(ChainId::ETHEREUM));

    wallet.set_chain(Some("0x2105"));
    wallet.set_accounts(&[CAROL]);
    session.sync().await;
    let state = session.snapshot();
    assert_eq!(state.chain_id, Some(ChainId(8453)));
    assert_eq!(state.account.as_deref(), Some(CAROL));
}

#[tokio::test]
async fn test_sync_without_session_is_a_no_op() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, _rx) = session_for(wallet.slot());

    session.sync().await;
    let state = session.snapshot();
    assert_eq!(state.status, SessionStatus::Idle);
    assert_eq!(state.account, None);
}

#[tokio::test]
async fn test_multi_injection_connects_to_flagged_member() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let members: Vec<Arc<dyn Eip1193Provider>> = vec![
        Arc::new(InjectedProvider::new(false)),
        wallet.provider.clone(),
    ];
    let root = InjectedProvider::new(false).with_providers(members);
    let (session, _rx) = session_for(ProviderSlot::with_provider(Arc::new(root)));

    assert_eq!(session.init(), vec![WalletId::MetaMask]);
    assert_eq!(session.connect(WalletId::MetaMask).await, ConnectOutcome::Connected);
    assert_eq!(wallet.provider.listener_count("chainChanged"), 1);
}

#[test]
fn test_sync_during_first_connect_does_not_supersede_it() {
    let wallet = MockWallet::new(&[], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    let reply = wallet.defer_connect();
    let mut connect = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(connect.poll());
    let epoch = session.epoch();

    // Auto-refresh tick while nothing is connected yet
    let mut refresh = task::spawn(session.sync());
    assert_ready_eq!(refresh.poll(), ());
    assert_eq!(session.epoch(), epoch);

    wallet.set_accounts(&[ALICE]);
    reply.send(Ok(vec![ALICE.to_string()])).unwrap();
    assert_ready_eq!(connect.poll(), ConnectOutcome::Connected);

    let state = session.snapshot();
    assert_eq!(state.status, SessionStatus::Connected);
    assert_eq!(state.account.as_deref(), Some(ALICE));
    assert_eq!(drain(&mut rx), vec!["Wallet connected successfully!"]);
}

#[tokio::test]
async fn test_sync_during_reconnect_does_not_supersede_it() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    let reply = wallet.defer_connect();
    let mut connect = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(connect.poll());
    assert_eq!(session.status(), SessionStatus::Connecting);

    session.sync().await;

    wallet.set_accounts(&[BOB]);
    reply.send(Ok(vec![BOB.to_string()])).unwrap();
    assert_ready_eq!(connect.poll(), ConnectOutcome::Connected);
    assert_eq!(session.snapshot().account.as_deref(), Some(BOB));
    assert_eq!(session.status(), SessionStatus::Connected);
}

#[tokio::test]
async fn test_sync_leaves_epoch_alone() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, _rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;

    let before = session.epoch();
    session.sync().await;
    session.sync().await;
    assert_eq!(session.epoch(), before);
}

#[test]
fn test_connect_notifies_after_initial_sync() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());

    let chain_reply = wallet.defer_chain();
    let mut connect = task::spawn(session.connect(WalletId::MetaMask));
    assert_pending!(connect.poll());

    // Committed and listening, but the initial sync is still reading the chain
    assert_eq!(session.status(), SessionStatus::Connected);
    assert_eq!(wallet.provider.listener_count("chainChanged"), 1);
    assert!(drain(&mut rx).is_empty());

    chain_reply.send(Ok("0x61".to_string())).unwrap();
    assert_ready_eq!(connect.poll(), ConnectOutcome::Connected);
    assert_eq!(session.snapshot().chain_id, Some(ChainId::BSC_TESTNET));
    assert_eq!(drain(&mut rx), vec!["Wallet connected successfully!"]);
}

#[tokio::test]
async fn test_reconnect_resets_previous_account() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, _rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;

    wallet.set_accounts(&[BOB]);
    wallet.emit_accounts(&[BOB]);
    assert_eq!(session.snapshot().previous_account.as_deref(), Some(ALICE));

    wallet.set_accounts(&[CAROL]);
    session.connect(WalletId::MetaMask).await;
    assert_eq!(session.snapshot().previous_account.as_deref(), Some(CAROL));

    // A failed reconnect leaves nothing from the earlier session behind
    wallet.fail_next_connect(ProviderRpcError::user_rejected());
    session.connect(WalletId::MetaMask).await;
    assert_eq!(session.snapshot().previous_account, None);
}

#[tokio::test]
async fn test_disconnect_event_without_code_still_resets() {
    let wallet = MockWallet::new(&[ALICE], "0x1");
    let (session, mut rx) = session_for(wallet.slot());
    session.connect(WalletId::MetaMask).await;
    drain(&mut rx);

    wallet
        .provider
        .emit("disconnect", serde_json::json!({"message": "connection lost"}));
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(drain(&mut rx), vec!["Wallet disconnected"]);
}
