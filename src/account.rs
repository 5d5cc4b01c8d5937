use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Discriminates record kinds sharing the world-state key space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Account,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BalanceEventKind {
    Credited,
    Debited,
}

#[derive(Debug)]
pub struct BalanceEvent {
    amount: Decimal,
    kind: BalanceEventKind,
    balance_after: Decimal,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("requested {amount}, available {balance}")]
    InsufficientBalance { balance: Decimal, amount: Decimal },
    #[error("applying {amount} to {balance} cannot be represented exactly")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
}

/// Account record as persisted in the world state.
///
/// The key addressing the record is not part of the payload. Fields the ledger
/// does not know about are carried in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    pub bank: String,
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    // exact JSON number on write; numbers and numeric strings on read
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub owner: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    pub fn new(bank: impl Into<String>, balance: Decimal, owner: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            doc_type: DocType::Account,
            balance,
            owner: owner.into(),
            extra: Map::new(),
        }
    }

    pub fn apply(&mut self, event: &BalanceEvent) {
        debug!(
            kind = ?event.kind,
            amount = %event.amount,
            balance = %event.balance_after,
            "Applying balance event"
        );
        self.balance = event.balance_after;
    }

    pub fn handle_credit(&self, amount: Decimal) -> Result<BalanceEvent, AccountError> {
        let balance_after =
            exact_add(self.balance, amount).ok_or(AccountError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(BalanceEvent {
            amount,
            kind: BalanceEventKind::Credited,
            balance_after,
        })
    }

    pub fn handle_debit(&self, amount: Decimal) -> Result<BalanceEvent, AccountError> {
        if self.balance < amount {
            return Err(AccountError::InsufficientBalance {
                balance: self.balance,
                amount,
            });
        }
        let balance_after =
            exact_sub(self.balance, amount).ok_or(AccountError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(BalanceEvent {
            amount,
            kind: BalanceEventKind::Debited,
            balance_after,
        })
    }
}

// Decimal arithmetic rounds once the result outgrows 96 bits of mantissa, so a
// result only counts when it can be undone exactly.
fn exact_add(balance: Decimal, amount: Decimal) -> Option<Decimal> {
    let sum = balance.checked_add(amount)?;
    (sum.checked_sub(amount)? == balance && sum.checked_sub(balance)? == amount).then_some(sum)
}

fn exact_sub(balance: Decimal, amount: Decimal) -> Option<Decimal> {
    let diff = balance.checked_sub(amount)?;
    (diff.checked_add(amount)? == balance && balance.checked_sub(diff)? == amount).then_some(diff)
}
