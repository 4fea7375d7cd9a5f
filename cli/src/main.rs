//! `tipy`: send and inspect tips against a local ledger.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tipy_cli::{read_keypair, write_keypair, TipyConfig};
use tipy_client::{HistoryItem, TipClient, TokenRoute};
use tipy_crypto::generate_keypair;
use tipy_program::LedgerEntry;
use tipy_runtime::Bank;
use tipy_store_lmdb::LmdbEnvironment;
use tipy_types::{Address, SystemClock};
use tipy_utils::{format_address, format_amount, init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "tipy", about = "Send tips and read their receipts")]
struct Cli {
    /// Path to a TOML configuration file. Flags and env vars override it.
    #[arg(long, env = "TIPY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the account store.
    #[arg(long, env = "TIPY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TIPY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "TIPY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a keypair file.
    Keygen {
        #[arg(long)]
        out: PathBuf,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the address of a keypair file.
    Address {
        #[arg(long)]
        keypair: PathBuf,
    },
    /// Credit native balance out of thin air (local ledgers only).
    Airdrop {
        #[arg(long)]
        to: Address,
        #[arg(long)]
        lamports: u64,
    },
    /// Show a native balance, or a token balance with --token.
    Balance {
        address: Address,
        #[arg(long)]
        token: bool,
    },
    /// Create a mint with the keypair as issuer.
    CreateMint {
        #[arg(long)]
        authority: PathBuf,
        #[arg(long, default_value_t = 0)]
        decimals: u8,
    },
    /// Create a token account of a mint for an owner.
    CreateTokenAccount {
        #[arg(long)]
        payer: PathBuf,
        #[arg(long)]
        mint: Address,
        #[arg(long)]
        owner: Address,
    },
    /// Issue tokens into a token account.
    MintTo {
        #[arg(long)]
        authority: PathBuf,
        #[arg(long)]
        mint: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Tip native currency, or tokens when --mint is given.
    SendTip {
        /// Sender keypair file.
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u64,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long)]
        mint: Option<Address>,
        #[arg(long)]
        from_tokens: Option<Address>,
        #[arg(long)]
        to_tokens: Option<Address>,
    },
    /// Show the entry for a sender and receiver.
    ShowTip {
        #[arg(long)]
        sender: Address,
        #[arg(long)]
        receiver: Address,
        #[arg(long)]
        json: bool,
    },
    /// List every tip a wallet sent or received, newest first.
    History {
        wallet: Address,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TipyConfig::from_toml_file(path)?,
        None => TipyConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Keygen { out, force } => {
            let keypair = generate_keypair();
            write_keypair(&out, &keypair, force)?;
            println!("{}", keypair.public);
            Ok(())
        }
        Command::Address { keypair } => {
            println!("{}", read_keypair(&keypair)?.public);
            Ok(())
        }
        command => run(&open_ledger(&config)?, command),
    }
}

fn open_ledger(config: &TipyConfig) -> anyhow::Result<TipClient<LmdbEnvironment>> {
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening ledger at {}", config.data_dir.display()))?;
    let mut bank = Bank::new(env, Arc::new(SystemClock), config.rent.into());
    tipy_program::install(&mut bank);
    tracing::debug!(data_dir = %config.data_dir.display(), "ledger opened");
    Ok(TipClient::new(Arc::new(bank)))
}

/// Commands that need the ledger.
fn run(client: &TipClient<LmdbEnvironment>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Airdrop { to, lamports } => {
            client.bank().airdrop(&to, lamports)?;
            println!("{}", format_amount(client.balance(&to)?, true));
        }
        Command::Balance { address, token } => {
            if token {
                println!("{}", format_amount(client.token_balance(&address)?, false));
            } else {
                println!("{}", format_amount(client.balance(&address)?, true));
            }
        }
        Command::CreateMint {
            authority,
            decimals,
        } => {
            let authority = read_keypair(&authority)?;
            println!("{}", client.create_mint(&authority, decimals)?);
        }
        Command::CreateTokenAccount { payer, mint, owner } => {
            let payer = read_keypair(&payer)?;
            println!("{}", client.create_token_account(&payer, &mint, &owner)?);
        }
        Command::MintTo {
            authority,
            mint,
            to,
            amount,
        } => {
            let authority = read_keypair(&authority)?;
            client.mint_to(&authority, &mint, &to, amount)?;
            println!("{}", format_amount(client.token_balance(&to)?, false));
        }
        Command::SendTip {
            from,
            to,
            amount,
            message,
            mint,
            from_tokens,
            to_tokens,
        } => {
            let sender = read_keypair(&from)?;
            let entry = match (mint, from_tokens, to_tokens) {
                (None, _, _) => client.send_native_tip(&sender, &to, amount, &message),
                (Some(mint), Some(sender_tokens), Some(receiver_tokens)) => {
                    let route = TokenRoute {
                        mint,
                        sender_tokens,
                        receiver_tokens,
                    };
                    client.send_token_tip(&sender, &to, &route, amount, &message)
                }
                _ => bail!("--mint needs --from-tokens and --to-tokens"),
            };
            match entry {
                Ok(address) => println!("{address}"),
                Err(e) => match e.tip_error() {
                    Some(code) => bail!("tip rejected ({}): {code}", code.code()),
                    None => return Err(e.into()),
                },
            }
        }
        Command::ShowTip {
            sender,
            receiver,
            json,
        } => match client.entry(&sender, &receiver)? {
            Some(entry) if json => println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?),
            Some(entry) => print_entry(&entry),
            None => bail!("no tip from {sender} to {receiver}"),
        },
        Command::History { wallet, json } => {
            let items = client.history(&wallet)?;
            if json {
                let rows: Vec<_> = items.iter().map(history_json).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for item in &items {
                    print_history_item(item);
                }
            }
        }
        Command::Keygen { .. } | Command::Address { .. } => {
            bail!("this command does not use the ledger")
        }
    }
    Ok(())
}

fn entry_json(entry: &LedgerEntry) -> serde_json::Value {
    json!({
        "sender": entry.sender.to_string(),
        "receiver": entry.receiver.to_string(),
        "amount": entry.amount,
        "message": entry.message,
        "timestamp": entry.timestamp,
        "is_native": entry.is_native,
    })
}

fn history_json(item: &HistoryItem) -> serde_json::Value {
    json!({
        "address": item.address.to_string(),
        "direction": item.direction,
        "counterparty": item.counterparty().to_string(),
        "entry": entry_json(&item.entry),
    })
}

fn print_entry(entry: &LedgerEntry) {
    println!("sender:    {}", entry.sender);
    println!("receiver:  {}", entry.receiver);
    println!("amount:    {}", format_amount(entry.amount, entry.is_native));
    println!("timestamp: {}", entry.timestamp);
    if !entry.message.is_empty() {
        println!("message:   {}", entry.message);
    }
}

fn print_history_item(item: &HistoryItem) {
    let arrow = match item.direction {
        tipy_client::Direction::Sent => "->",
        tipy_client::Direction::Received => "<-",
    };
    println!(
        "{} {arrow} {}  {}  {}",
        item.entry.timestamp,
        format_address(&item.counterparty()),
        format_amount(item.entry.amount, item.entry.is_native),
        item.entry.message,
    );
}
