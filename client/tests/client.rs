use std::sync::Arc;

use tipy_client::{ClientError, Direction, TipClient, TokenRoute};
use tipy_crypto::keypair_from_seed;
use tipy_nullables::{NullClock, NullStore};
use tipy_program::TipError;
use tipy_runtime::Bank;
use tipy_store_lmdb::LmdbEnvironment;
use tipy_types::{KeyPair, Rent};

fn kp(n: u8) -> KeyPair {
    keypair_from_seed(&[n; 32])
}

fn client(clock: Arc<NullClock>) -> TipClient<NullStore> {
    let mut bank = Bank::new(NullStore::new(), clock, Rent::default());
    tipy_program::install(&mut bank);
    TipClient::new(Arc::new(bank))
}

#[test]
fn native_tip_then_lookup() {
    let client = client(Arc::new(NullClock::new(100)));
    let (alice, bob) = (kp(1), kp(2));
    client.bank().airdrop(&alice.public, 2_000_000_000).unwrap();

    let address = client
        .send_native_tip(&alice, &bob.public, 250_000_000, "coffee")
        .unwrap();
    let entry = client.entry(&alice.public, &bob.public).unwrap().unwrap();
    assert_eq!(client.entry_at(&address).unwrap(), Some(entry.clone()));
    assert_eq!(entry.message, "coffee");
    assert!(client.entry(&bob.public, &alice.public).unwrap().is_none());
    assert_eq!(client.balance(&bob.public).unwrap(), 250_000_000);
}

#[test]
fn token_tip_through_helpers() {
    let client = client(Arc::new(NullClock::new(100)));
    let (alice, bob) = (kp(1), kp(2));
    client.bank().airdrop(&alice.public, 1_000_000_000).unwrap();

    let mint = client.create_mint(&alice, 2).unwrap();
    let sender_tokens = client.create_token_account(&alice, &mint, &alice.public).unwrap();
    let receiver_tokens = client.create_token_account(&alice, &mint, &bob.public).unwrap();
    client.mint_to(&alice, &mint, &sender_tokens, 1_000_000).unwrap();

    let route = TokenRoute {
        mint,
        sender_tokens,
        receiver_tokens,
    };
    client
        .send_token_tip(&alice, &bob.public, &route, 1_000, "thanks")
        .unwrap();

    assert_eq!(client.token_balance(&sender_tokens).unwrap(), 999_000);
    assert_eq!(client.token_balance(&receiver_tokens).unwrap(), 1_000);
    assert!(!client.entry(&alice.public, &bob.public).unwrap().unwrap().is_native);
}

#[test]
fn rejected_tip_exposes_code() {
    let client = client(Arc::new(NullClock::new(100)));
    let (alice, bob) = (kp(1), kp(2));
    client.bank().airdrop(&alice.public, 1_000_000_000).unwrap();

    let err = client
        .send_native_tip(&alice, &bob.public, 1, &"x".repeat(101))
        .unwrap_err();
    assert_eq!(err.tip_error(), Some(TipError::MessageTooLong));
    assert!(matches!(err, ClientError::Transaction(_)));
}

#[test]
fn history_lists_both_directions_newest_first() {
    let clock = Arc::new(NullClock::new(1_000));
    let client = client(clock.clone());
    let (alice, bob, carol) = (kp(1), kp(2), kp(3));
    for who in [&alice, &bob, &carol] {
        client.bank().airdrop(&who.public, 1_000_000_000).unwrap();
    }

    client.send_native_tip(&alice, &bob.public, 10, "one").unwrap();
    clock.advance(10);
    client.send_native_tip(&carol, &alice.public, 20, "two").unwrap();
    clock.advance(10);
    client.send_native_tip(&bob, &carol.public, 30, "not mine").unwrap();
    clock.advance(10);
    client.send_native_tip(&alice, &carol.public, 40, "three").unwrap();

    let history = client.history(&alice.public).unwrap();
    let summary: Vec<(Direction, &str, i64)> = history
        .iter()
        .map(|item| (item.direction, item.entry.message.as_str(), item.entry.timestamp))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Direction::Sent, "three", 1_030),
            (Direction::Received, "two", 1_010),
            (Direction::Sent, "one", 1_000),
        ]
    );
    assert_eq!(history[1].counterparty(), carol.public);

    let json = serde_json::to_value(&history[0]).unwrap();
    assert_eq!(json["direction"], "sent");
}

#[test]
fn entries_survive_reopening_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let (alice, bob) = (kp(1), kp(2));
    {
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let mut bank = Bank::new(env, Arc::new(NullClock::new(5)), Rent::default());
        tipy_program::install(&mut bank);
        let client = TipClient::new(Arc::new(bank));
        client.bank().airdrop(&alice.public, 1_000_000_000).unwrap();
        client.send_native_tip(&alice, &bob.public, 7, "persisted").unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
    let mut bank = Bank::new(env, Arc::new(NullClock::new(5)), Rent::default());
    tipy_program::install(&mut bank);
    let client = TipClient::new(Arc::new(bank));
    let entry = client.entry(&alice.public, &bob.public).unwrap().unwrap();
    assert_eq!(entry.message, "persisted");
    assert_eq!(client.history(&bob.public).unwrap().len(), 1);
}
