use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    account::{AccountError, AccountRecord},
    command::{AmountError, CommandError, LedgerCommand, parse_amount},
    world_state::{WorldState, WorldStateError},
};

/// Records written by [`AccountLedger::initialize_ledger`], as `(bank, balance, owner)`.
const SEED_ACCOUNTS: [(&str, i64, &str); 2] = [("RBC", 1234, "John"), ("CIBC", 5678, "Max")];

const SEED_KEY_PREFIX: &str = "ACCOUNT";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{account} does not exist")]
    NotFound { account: String },
    #[error("Insufficient balance in {account}: {source}")]
    InsufficientBalance {
        account: String,
        #[source]
        source: AccountError,
    },
    #[error("Balance of {account} out of range: {source}")]
    BalanceOverflow {
        account: String,
        #[source]
        source: AccountError,
    },
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error("Record stored at {account} is not a valid account: {source}")]
    MalformedRecord {
        account: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize {account}: {source}")]
    Serialization {
        account: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode query results: {0}")]
    EncodeResults(#[source] serde_json::Error),
    #[error(transparent)]
    State(#[from] WorldStateError),
}

/// Any failure of a single ledger invocation.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
}

/// Payload of one enumerated record: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Parsed(serde_json::Value),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: RecordValue,
}

/// Account business logic bound to the world state of one invocation.
///
/// The ledger performs plain reads followed by plain writes, with no versioning
/// or compare-and-swap. Isolation between concurrent invocations and atomic
/// commit of the writes issued here are the responsibility of the [`WorldState`]
/// implementor.
pub struct AccountLedger<'s, S: ?Sized> {
    state: &'s mut S,
}

impl<'s, S> AccountLedger<'s, S>
where
    S: WorldState + ?Sized,
{
    pub fn new(state: &'s mut S) -> Self {
        Self { state }
    }

    /// Executes a parsed invocation. Queries return their serialized payload.
    pub fn invoke(&mut self, command: LedgerCommand) -> Result<Option<String>, LedgerError> {
        match command {
            LedgerCommand::InitLedger => self.initialize_ledger().map(|_| None),
            LedgerCommand::QueryAccount { account } => self.query_account(&account).map(Some),
            LedgerCommand::CreateAccount {
                account,
                bank,
                balance,
                owner,
            } => self
                .create_account(&account, &bank, &balance, &owner)
                .map(|_| None),
            LedgerCommand::QueryAllAccounts => {
                let results = self.query_all_accounts()?;
                let payload =
                    serde_json::to_string(&results).map_err(LedgerError::EncodeResults)?;
                Ok(Some(payload))
            }
            LedgerCommand::Deposit { account, amount } => {
                self.deposit(&account, &amount).map(|_| None)
            }
            LedgerCommand::Withdraw { account, amount } => {
                self.withdraw(&account, &amount).map(|_| None)
            }
            LedgerCommand::Transfer { from, to, amount } => {
                self.transfer(&from, &to, &amount).map(|_| None)
            }
        }
    }

    /// Writes the seed accounts `ACCOUNT0` and `ACCOUNT1`, overwriting any
    /// previous records at those keys.
    #[instrument(skip(self))]
    pub fn initialize_ledger(&mut self) -> Result<(), LedgerError> {
        info!("Initializing ledger");
        for (i, (bank, balance, owner)) in SEED_ACCOUNTS.into_iter().enumerate() {
            let key = format!("{SEED_KEY_PREFIX}{i}");
            let record = AccountRecord::new(bank, Decimal::new(balance, 0), owner);
            self.put_record(&key, &record)?;
            info!(account = %key, bank, owner, "Added seed account");
        }
        info!("Ledger initialized");
        Ok(())
    }

    /// Returns the stored payload of `account` as-is.
    #[instrument(skip(self))]
    pub fn query_account(&self, account: &str) -> Result<String, LedgerError> {
        let bytes = self.read_payload(account)?;
        let payload = String::from_utf8_lossy(&bytes).into_owned();
        debug!(account, %payload, "Queried account");
        Ok(payload)
    }

    /// Writes a new account record, replacing whatever is stored at `account`.
    #[instrument(skip(self))]
    pub fn create_account(
        &mut self,
        account: &str,
        bank: &str,
        balance: &str,
        owner: &str,
    ) -> Result<(), LedgerError> {
        let balance = parse_amount(balance)?;
        info!(account, %balance, "Creating account");
        // no existence check: an existing record at `account` is overwritten
        self.put_record(account, &AccountRecord::new(bank, balance, owner))?;
        info!(account, "Account created");
        Ok(())
    }

    /// Enumerates every record in key order. Payloads that are not valid JSON
    /// are returned as raw text instead of failing the query.
    #[instrument(skip(self))]
    pub fn query_all_accounts(&self) -> Result<Vec<QueryResult>, LedgerError> {
        let mut results = Vec::new();
        for entry in self.state.state_by_range("", "")? {
            let entry = entry?;
            let text = String::from_utf8_lossy(&entry.value);
            let record = match serde_json::from_str(&text) {
                Ok(value) => RecordValue::Parsed(value),
                Err(err) => {
                    warn!(key = %entry.key, %err, "Record is not valid JSON, returning raw payload");
                    RecordValue::Raw(text.into_owned())
                }
            };
            results.push(QueryResult {
                key: entry.key,
                record,
            });
        }
        debug!(count = results.len(), "Queried all accounts");
        Ok(results)
    }

    #[instrument(skip(self))]
    pub fn deposit(&mut self, account: &str, amount: &str) -> Result<(), LedgerError> {
        let amount = parse_amount(amount)?;
        info!(account, %amount, "Depositing");
        let mut record = self.read_record(account)?;
        let evt = record
            .handle_credit(amount)
            .map_err(|source| account_error(account, source))?;
        record.apply(&evt);
        self.put_record(account, &record)?;
        info!(account, balance = %record.balance, "Deposit complete");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn withdraw(&mut self, account: &str, amount: &str) -> Result<(), LedgerError> {
        let amount = parse_amount(amount)?;
        info!(account, %amount, "Withdrawing");
        let mut record = self.read_record(account)?;
        let evt = record
            .handle_debit(amount)
            .map_err(|source| account_error(account, source))?;
        record.apply(&evt);
        self.put_record(account, &record)?;
        info!(account, balance = %record.balance, "Withdrawal complete");
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// Both records are read and both balance changes validated before
    /// anything is written; the source record is then written first, followed
    /// by the destination. A transfer onto the same key leaves the balance
    /// unchanged.
    #[instrument(skip(self))]
    pub fn transfer(&mut self, from: &str, to: &str, amount: &str) -> Result<(), LedgerError> {
        let amount = parse_amount(amount)?;
        info!(from, to, %amount, "Transferring");
        let mut source = self.read_record(from)?;
        let mut destination = self.read_record(to)?;

        let debit = source
            .handle_debit(amount)
            .map_err(|err| account_error(from, err))?;
        source.apply(&debit);

        if from == to {
            let credit = source
                .handle_credit(amount)
                .map_err(|err| account_error(to, err))?;
            source.apply(&credit);
            destination = source.clone();
        } else {
            let credit = destination
                .handle_credit(amount)
                .map_err(|err| account_error(to, err))?;
            destination.apply(&credit);
        }

        self.put_record(from, &source)?;
        self.put_record(to, &destination)?;
        info!(
            from,
            to,
            from_balance = %source.balance,
            to_balance = %destination.balance,
            "Transfer complete"
        );
        Ok(())
    }

    /// Reads and decodes the account stored at `account`.
    pub fn read_record(&self, account: &str) -> Result<AccountRecord, LedgerError> {
        let bytes = self.read_payload(account)?;
        serde_json::from_slice(&bytes).map_err(|source| LedgerError::MalformedRecord {
            account: account.to_owned(),
            source,
        })
    }

    fn read_payload(&self, account: &str) -> Result<Vec<u8>, LedgerError> {
        match self.state.get_state(account)? {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(LedgerError::NotFound {
                account: account.to_owned(),
            }),
        }
    }

    fn put_record(&mut self, account: &str, record: &AccountRecord) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec(record).map_err(|source| LedgerError::Serialization {
            account: account.to_owned(),
            source,
        })?;
        self.state.put_state(account, bytes)?;
        Ok(())
    }
}

fn account_error(account: &str, source: AccountError) -> LedgerError {
    let account = account.to_owned();
    match source {
        AccountError::InsufficientBalance { .. } => {
            LedgerError::InsufficientBalance { account, source }
        }
        AccountError::BalanceOverflow { .. } => LedgerError::BalanceOverflow { account, source },
    }
}
