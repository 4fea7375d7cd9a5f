use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use tipy_crypto::keypair_from_seed;
use tipy_nullables::{NullClock, NullStore};
use tipy_program::{entry_address, send_tip, LedgerEntry, TipAccounts, TipError};
use tipy_runtime::{
    Bank, ProgramError, SystemError, SystemInstruction, TokenInstruction, Transaction,
    TransactionError,
};
use tipy_store::{Account, AccountStore};
use tipy_token::{Mint, TokenAccount, TokenError};
use tipy_types::{Address, KeyPair, Rent, TIPY_PROGRAM_ID, TOKEN_PROGRAM_ID};

const NOW: i64 = 1_700_000_000;
const THANKS: &str = "Thank you for your service!";

struct Harness {
    bank: Bank<NullStore>,
    clock: Arc<NullClock>,
}

fn kp(n: u8) -> KeyPair {
    keypair_from_seed(&[n; 32])
}

impl Harness {
    fn new(rent: Rent) -> Self {
        let clock = Arc::new(NullClock::new(NOW));
        let mut bank = Bank::new(NullStore::new(), clock.clone(), rent);
        tipy_program::install(&mut bank);
        Self { bank, clock }
    }

    fn submit(&self, tx: Transaction) -> Result<(), TransactionError> {
        self.bank.process_transaction(&tx)
    }

    fn tip(&self, sender: &KeyPair, accounts: &TipAccounts, amount: u64, message: &str) -> Result<(), TransactionError> {
        let ix = send_tip(accounts, amount, message).unwrap();
        self.submit(Transaction::new_signed(vec![ix], &[sender]).unwrap())
    }

    fn native_tip(&self, sender: &KeyPair, receiver: &Address, amount: u64, message: &str) -> Result<(), TransactionError> {
        let accounts = TipAccounts::native(sender.public, *receiver).unwrap();
        self.tip(sender, &accounts, amount, message)
    }

    fn create_mint(&self, authority: &KeyPair, seed: u8) -> Address {
        let mint = kp(seed);
        let tx = Transaction::new_signed(
            vec![
                SystemInstruction::create_account(authority.public, mint.public, Mint::LEN as u64, TOKEN_PROGRAM_ID),
                TokenInstruction::initialize_mint(mint.public, authority.public, 6),
            ],
            &[authority, &mint],
        )
        .unwrap();
        self.submit(tx).unwrap();
        mint.public
    }

    /// A token account funded by `payer`; left uninitialized when `mint` is `None`.
    fn create_token_account(&self, payer: &KeyPair, seed: u8, mint: Option<&Address>, owner: &Address) -> Address {
        let account = kp(seed);
        let mut instructions = vec![SystemInstruction::create_account(
            payer.public,
            account.public,
            TokenAccount::LEN as u64,
            TOKEN_PROGRAM_ID,
        )];
        if let Some(mint) = mint {
            instructions.push(TokenInstruction::initialize_account(account.public, *mint, *owner));
        }
        self.submit(Transaction::new_signed(instructions, &[payer, &account]).unwrap())
            .unwrap();
        account.public
    }

    fn mint_to(&self, authority: &KeyPair, mint: &Address, destination: &Address, amount: u64) {
        let tx = Transaction::new_signed(
            vec![TokenInstruction::mint_to(*mint, *destination, authority.public, amount)],
            &[authority],
        )
        .unwrap();
        self.submit(tx).unwrap();
    }

    fn token_balance(&self, address: &Address) -> u64 {
        let account = self.bank.get_account(address).unwrap().unwrap();
        TokenAccount::unpack(&account.data).unwrap().amount
    }

    fn entry(&self, sender: &Address, receiver: &Address) -> Option<LedgerEntry> {
        let address = entry_address(sender, receiver).unwrap();
        self.bank
            .get_account(&address)
            .unwrap()
            .map(|account| LedgerEntry::decode(&account.data).unwrap())
    }

    fn snapshot(&self) -> Vec<(Address, Account)> {
        self.bank.store().iter_accounts().unwrap()
    }
}

/// Alice holds `funded` tokens of a fresh mint; Bob has an empty account of it.
struct TokenSetup {
    alice: KeyPair,
    bob: KeyPair,
    mint: Address,
    alice_tokens: Address,
    bob_tokens: Address,
}

fn token_setup(h: &Harness, funded: u64) -> TokenSetup {
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 1_000_000_000).unwrap();
    let mint = h.create_mint(&alice, 50);
    let alice_tokens = h.create_token_account(&alice, 51, Some(&mint), &alice.public);
    let bob_tokens = h.create_token_account(&alice, 52, Some(&mint), &bob.public);
    h.mint_to(&alice, &mint, &alice_tokens, funded);
    TokenSetup {
        alice,
        bob,
        mint,
        alice_tokens,
        bob_tokens,
    }
}

impl TokenSetup {
    fn accounts(&self) -> TipAccounts {
        TipAccounts::token(self.alice.public, self.bob.public, self.mint, self.alice_tokens, self.bob_tokens)
            .unwrap()
    }
}

fn code(result: Result<(), TransactionError>) -> Option<u32> {
    result.err().and_then(|e| e.custom_code())
}

#[test]
fn native_tip_moves_value_and_records_entry() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();

    h.native_tip(&alice, &bob.public, 1, THANKS).unwrap();

    assert_eq!(h.bank.balance(&alice.public).unwrap(), 9);
    assert_eq!(h.bank.balance(&bob.public).unwrap(), 1);
    let entry = h.entry(&alice.public, &bob.public).unwrap();
    assert_eq!(
        entry,
        LedgerEntry {
            sender: alice.public,
            receiver: bob.public,
            amount: 1,
            message: THANKS.into(),
            timestamp: NOW,
            is_native: true,
        }
    );
}

#[test]
fn token_tip_moves_tokens_and_records_entry() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000_000);

    h.tip(&s.alice, &s.accounts(), 1_000, THANKS).unwrap();

    assert_eq!(h.token_balance(&s.alice_tokens), 999_000);
    assert_eq!(h.token_balance(&s.bob_tokens), 1_000);
    let entry = h.entry(&s.alice.public, &s.bob.public).unwrap();
    assert!(!entry.is_native);
    assert_eq!(entry.amount, 1_000);
    assert_eq!(entry.message, THANKS);
}

#[test]
fn entry_account_is_owned_by_the_program() {
    let h = Harness::new(Rent::default());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 1_000_000_000).unwrap();
    h.native_tip(&alice, &bob.public, 1_000, "").unwrap();

    let address = entry_address(&alice.public, &bob.public).unwrap();
    let account = h.bank.get_account(&address).unwrap().unwrap();
    assert_eq!(account.owner, TIPY_PROGRAM_ID);
    assert_eq!(account.data.len(), LedgerEntry::SPACE);
    assert_eq!(account.lamports, h.bank.rent().minimum_balance(LedgerEntry::SPACE));
    assert_eq!(h.bank.accounts_owned_by(&TIPY_PROGRAM_ID).unwrap().len(), 1);
}

#[test]
fn sender_pays_entry_rent_and_keeps_minimum() {
    let rent = Rent::default();
    let h = Harness::new(rent);
    let (alice, bob) = (kp(1), kp(2));
    let floor = rent.minimum_balance(0);
    let entry_rent = rent.minimum_balance(LedgerEntry::SPACE);
    h.bank.airdrop(&alice.public, floor + entry_rent + 5_000).unwrap();

    h.native_tip(&alice, &bob.public, 5_000, "gm").unwrap();

    assert_eq!(h.bank.balance(&alice.public).unwrap(), floor);
    assert_eq!(h.bank.balance(&bob.public).unwrap(), 5_000);
}

#[test]
fn message_over_limit_fails_for_both_kinds() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000_000);
    let long = "x".repeat(101);
    let before = h.snapshot();

    assert_eq!(code(h.native_tip(&s.alice, &s.bob.public, 1, &long)), Some(6000));
    assert_eq!(code(h.tip(&s.alice, &s.accounts(), 1, &long)), Some(6000));
    assert_eq!(h.snapshot(), before);
}

#[test]
fn message_limit_counts_bytes() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();

    // 51 two-byte characters: 102 bytes.
    let accented = "é".repeat(51);
    assert_eq!(code(h.native_tip(&alice, &bob.public, 1, &accented)), Some(6000));
    h.native_tip(&alice, &bob.public, 1, &"é".repeat(50)).unwrap();
}

#[test]
fn native_shortfall_is_insufficient_funds() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();
    let before = h.snapshot();

    let result = h.native_tip(&alice, &bob.public, 11, THANKS);
    assert_eq!(code(result), Some(TipError::InsufficientFunds.code()));
    assert_eq!(h.snapshot(), before);
    assert!(h.entry(&alice.public, &bob.public).is_none());
}

#[test]
fn native_shortfall_counts_retained_minimum() {
    let rent = Rent::default();
    let h = Harness::new(rent);
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, rent.minimum_balance(0) + 99).unwrap();

    assert_eq!(code(h.native_tip(&alice, &bob.public, 100, "")), Some(6001));
}

#[test]
fn token_shortfall_keeps_token_error() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 500);

    let err = h.tip(&s.alice, &s.accounts(), 501, THANKS).unwrap_err();
    assert_eq!(
        err.instruction_error(),
        Some(&ProgramError::Token(TokenError::InsufficientFunds {
            needed: 501,
            available: 500
        }))
    );
    assert_eq!(h.token_balance(&s.alice_tokens), 500);
}

#[test]
fn sender_account_under_other_mint_is_invalid() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let other_mint = h.create_mint(&s.alice, 60);
    let stray = h.create_token_account(&s.alice, 61, Some(&other_mint), &s.alice.public);
    h.mint_to(&s.alice, &other_mint, &stray, 1_000);

    let mut accounts = s.accounts();
    accounts.sender_balance = stray;
    assert_eq!(code(h.tip(&s.alice, &accounts, 10, THANKS)), Some(6002));
}

#[test]
fn receiver_account_under_other_mint_is_invalid() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let other_mint = h.create_mint(&s.alice, 60);
    let stray = h.create_token_account(&s.alice, 61, Some(&other_mint), &s.bob.public);

    let mut accounts = s.accounts();
    accounts.receiver_balance = stray;
    assert_eq!(code(h.tip(&s.alice, &accounts, 10, THANKS)), Some(6002));
    assert_eq!(h.token_balance(&s.alice_tokens), 1_000);
}

#[test]
fn sender_account_owned_by_someone_else_is_invalid() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let mut accounts = s.accounts();
    accounts.sender_balance = s.bob_tokens;
    accounts.receiver_balance = s.alice_tokens;
    assert_eq!(code(h.tip(&s.alice, &accounts, 10, THANKS)), Some(6002));
}

#[test]
fn missing_receiver_account_is_uninitialized() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let mut accounts = s.accounts();
    accounts.receiver_balance = kp(77).public;
    assert_eq!(code(h.tip(&s.alice, &accounts, 10, THANKS)), Some(6003));
}

#[test]
fn allocated_but_uninitialized_receiver_account() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let blank = h.create_token_account(&s.alice, 78, None, &s.bob.public);
    let mut accounts = s.accounts();
    accounts.receiver_balance = blank;
    assert_eq!(code(h.tip(&s.alice, &accounts, 10, THANKS)), Some(6003));
}

#[test]
fn unreadable_clock_fails_without_effects() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();
    let before = h.snapshot();

    h.clock.make_unavailable();
    assert_eq!(code(h.native_tip(&alice, &bob.public, 1, THANKS)), Some(6004));
    assert_eq!(h.snapshot(), before);

    h.clock.restore();
    h.native_tip(&alice, &bob.public, 1, THANKS).unwrap();
}

#[test]
fn repeated_invalid_tip_fails_identically() {
    let h = Harness::new(Rent::free());
    let s = token_setup(&h, 1_000);
    let mut accounts = s.accounts();
    accounts.receiver_balance = kp(77).public;
    let before = h.snapshot();

    let first = code(h.tip(&s.alice, &accounts, 10, THANKS));
    let second = code(h.tip(&s.alice, &accounts, 10, THANKS));
    assert_eq!(first, Some(6003));
    assert_eq!(first, second);
    assert_eq!(h.snapshot(), before);
}

#[test]
fn repeat_tip_to_same_receiver_collides() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();
    h.native_tip(&alice, &bob.public, 1, "first").unwrap();
    let before = h.snapshot();

    let err = h.native_tip(&alice, &bob.public, 1, "second").unwrap_err();
    let slot = entry_address(&alice.public, &bob.public).unwrap();
    assert_eq!(
        err.instruction_error(),
        Some(&ProgramError::System(SystemError::AccountAlreadyInUse(slot)))
    );
    assert_eq!(err.custom_code(), None);
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.entry(&alice.public, &bob.public).unwrap().message, "first");

    // The reverse direction is a different slot.
    h.bank.airdrop(&bob.public, 5).unwrap();
    h.native_tip(&bob, &alice.public, 1, "back").unwrap();
}

#[test]
fn record_failure_rolls_back_transfer() {
    let rent = Rent::default();
    let h = Harness::new(rent);
    let (alice, bob) = (kp(1), kp(2));
    let funds = rent.minimum_balance(0) + rent.minimum_balance(LedgerEntry::SPACE) + 999;
    h.bank.airdrop(&alice.public, funds).unwrap();

    // Enough for the transfer, one lamport short of funding the entry.
    let err = h.native_tip(&alice, &bob.public, 1_000, "").unwrap_err();
    assert!(matches!(
        err.instruction_error(),
        Some(ProgramError::System(SystemError::InsufficientFunds { .. }))
    ));
    assert_eq!(h.bank.balance(&alice.public).unwrap(), funds);
    assert_eq!(h.bank.balance(&bob.public).unwrap(), 0);
    assert!(h.entry(&alice.public, &bob.public).is_none());
}

#[test]
fn one_failing_tip_discards_the_whole_transaction() {
    let h = Harness::new(Rent::free());
    let (alice, bob, carol) = (kp(1), kp(2), kp(3));
    h.bank.airdrop(&alice.public, 10).unwrap();
    let before = h.snapshot();

    let good = send_tip(&TipAccounts::native(alice.public, bob.public).unwrap(), 1, "ok").unwrap();
    let bad = send_tip(&TipAccounts::native(alice.public, carol.public).unwrap(), 1, &"x".repeat(200)).unwrap();
    let err = h
        .submit(Transaction::new_signed(vec![good, bad], &[&alice]).unwrap())
        .unwrap_err();

    assert!(matches!(err, TransactionError::InstructionError { index: 1, .. }));
    assert_eq!(err.custom_code(), Some(6000));
    assert_eq!(h.snapshot(), before);
}

#[test]
fn tip_without_sender_signature_is_rejected() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();
    let ix = send_tip(&TipAccounts::native(alice.public, bob.public).unwrap(), 1, "").unwrap();

    let forged = Transaction::new_signed(vec![ix.clone()], &[&bob]).unwrap();
    assert!(matches!(
        h.submit(forged),
        Err(TransactionError::MissingSignature(a)) if a == alice.public
    ));

    let mut unflagged = ix;
    unflagged.accounts[2].is_signer = false;
    let err = h
        .submit(Transaction::new_signed(vec![unflagged], &[&bob]).unwrap())
        .unwrap_err();
    assert_eq!(
        err.instruction_error(),
        Some(&ProgramError::MissingRequiredSignature(alice.public))
    );
    assert_eq!(h.bank.balance(&alice.public).unwrap(), 10);
}

#[test]
fn ledger_slot_must_match_the_pair() {
    let h = Harness::new(Rent::free());
    let (alice, bob, carol) = (kp(1), kp(2), kp(3));
    h.bank.airdrop(&alice.public, 10).unwrap();
    let mut accounts = TipAccounts::native(alice.public, bob.public).unwrap();
    accounts.ledger_entry = entry_address(&alice.public, &carol.public).unwrap();

    let err = h.tip(&alice, &accounts, 1, "").unwrap_err();
    assert_eq!(
        err.instruction_error(),
        Some(&ProgramError::InvalidSeeds(accounts.ledger_entry))
    );
}

#[test]
fn zero_amount_tip_is_recorded() {
    let h = Harness::new(Rent::free());
    let (alice, bob) = (kp(1), kp(2));
    h.bank.airdrop(&alice.public, 10).unwrap();
    h.native_tip(&alice, &bob.public, 0, "just saying hi").unwrap();
    assert_eq!(h.entry(&alice.public, &bob.public).unwrap().amount, 0);
    assert_eq!(h.bank.balance(&alice.public).unwrap(), 10);
}

#[test]
fn disjoint_tips_run_concurrently() {
    let h = Arc::new(Harness::new(Rent::free()));
    for i in 0..8u8 {
        h.bank.airdrop(&kp(100 + i).public, 50).unwrap();
    }

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                let sender = kp(100 + i);
                h.native_tip(&sender, &kp(150 + i).public, 7, "parallel")
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    for i in 0..8u8 {
        assert_eq!(h.bank.balance(&kp(100 + i).public).unwrap(), 43);
        assert_eq!(h.bank.balance(&kp(150 + i).public).unwrap(), 7);
    }
    assert_eq!(h.bank.accounts_owned_by(&TIPY_PROGRAM_ID).unwrap().len(), 8);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_message_over_limit_is_rejected(len in 101usize..400) {
        let h = Harness::new(Rent::free());
        let (alice, bob) = (kp(1), kp(2));
        h.bank.airdrop(&alice.public, 10).unwrap();
        let before = h.snapshot();

        let result = h.native_tip(&alice, &bob.public, 1, &"m".repeat(len));
        prop_assert_eq!(code(result), Some(6000));
        prop_assert_eq!(h.snapshot(), before);
    }

    #[test]
    fn accepted_tip_records_its_arguments(amount in 0u64..=1_000, message in "[a-zA-Z0-9 !?]{0,100}") {
        let h = Harness::new(Rent::free());
        let (alice, bob) = (kp(1), kp(2));
        h.bank.airdrop(&alice.public, 1_000).unwrap();

        h.native_tip(&alice, &bob.public, amount, &message).unwrap();
        let entry = h.entry(&alice.public, &bob.public).unwrap();
        prop_assert_eq!(entry.amount, amount);
        prop_assert_eq!(entry.message, message);
        prop_assert_eq!(entry.timestamp, NOW);
        prop_assert_eq!(h.bank.balance(&alice.public).unwrap(), 1_000 - amount);
    }
}
