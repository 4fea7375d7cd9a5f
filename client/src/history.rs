//! A wallet's tips, sent and received.

use serde::Serialize;
use tipy_program::LedgerEntry;
use tipy_types::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    /// Where the entry is stored.
    pub address: Address,
    pub direction: Direction,
    pub entry: LedgerEntry,
}

impl HistoryItem {
    /// The other party. A tip to oneself is its own counterparty.
    pub fn counterparty(&self) -> Address {
        match self.direction {
            Direction::Sent => self.entry.receiver,
            Direction::Received => self.entry.sender,
        }
    }
}

/// Keep the entries `wallet` took part in, newest first.
pub fn collect(wallet: &Address, entries: impl IntoIterator<Item = (Address, LedgerEntry)>) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = entries
        .into_iter()
        .filter_map(|(address, entry)| {
            let direction = if entry.sender == *wallet {
                Direction::Sent
            } else if entry.receiver == *wallet {
                Direction::Received
            } else {
                return None;
            };
            Some(HistoryItem {
                address,
                direction,
                entry,
            })
        })
        .collect();
    items.sort_by(|a, b| {
        b.entry
            .timestamp
            .cmp(&a.entry.timestamp)
            .then_with(|| a.address.cmp(&b.address))
    });
    items
}
