use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount `{value}` is not a number")]
    NotANumber { value: String },
    #[error("Amount `{value}` must not be negative")]
    NegativeAmount { value: String },
}

/// Coerces a caller-supplied amount into the ledger's decimal domain.
///
/// Plain decimals and scientific notation (`1e3`, `2.5E-2`) are accepted.
pub fn parse_amount(value: &str) -> Result<Decimal, AmountError> {
    let trimmed = value.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmountError::NotANumber {
            value: value.to_owned(),
        })?;
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if amount.is_sign_negative() {
        return Err(AmountError::NegativeAmount {
            value: value.to_owned(),
        });
    }
    Ok(amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerFunction {
    InitLedger,
    QueryAccount,
    CreateAccount,
    QueryAllAccounts,
    Deposit,
    Withdraw,
    Transfer,
}

impl LedgerFunction {
    fn arity(self) -> usize {
        match self {
            Self::InitLedger | Self::QueryAllAccounts => 0,
            Self::QueryAccount => 1,
            Self::Deposit | Self::Withdraw => 2,
            Self::Transfer => 3,
            Self::CreateAccount => 4,
        }
    }

    /// Positions of arguments that address a record.
    fn key_args(self) -> &'static [usize] {
        match self {
            Self::InitLedger | Self::QueryAllAccounts => &[],
            Self::QueryAccount | Self::CreateAccount | Self::Deposit | Self::Withdraw => &[0],
            Self::Transfer => &[0, 1],
        }
    }
}

impl FromStr for LedgerFunction {
    type Err = CommandError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "initLedger" | "initializeLedger" => Ok(Self::InitLedger),
            "queryAccount" => Ok(Self::QueryAccount),
            "createAccount" => Ok(Self::CreateAccount),
            "queryAllAccounts" => Ok(Self::QueryAllAccounts),
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "transfer" => Ok(Self::Transfer),
            _ => Err(CommandError::UnknownFunction {
                name: name.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("{function:?} expects {expected} argument(s), got {actual}")]
    WrongArgumentCount {
        function: LedgerFunction,
        expected: usize,
        actual: usize,
    },
    #[error("Argument {position} of {function:?} must be a non-empty account key")]
    EmptyArgument {
        function: LedgerFunction,
        position: usize,
    },
}

/// A single invocation of the ledger, with its arguments still in the caller's
/// string form. Amounts are coerced by the ledger itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    InitLedger,
    QueryAccount {
        account: String,
    },
    CreateAccount {
        account: String,
        bank: String,
        balance: String,
        owner: String,
    },
    QueryAllAccounts,
    Deposit {
        account: String,
        amount: String,
    },
    Withdraw {
        account: String,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
}

impl LedgerCommand {
    pub fn parse<S>(function: &str, args: &[S]) -> Result<Self, CommandError>
    where
        S: AsRef<str>,
    {
        let function: LedgerFunction = function.parse()?;
        if args.len() != function.arity() {
            return Err(CommandError::WrongArgumentCount {
                function,
                expected: function.arity(),
                actual: args.len(),
            });
        }
        if let Some(&position) = function
            .key_args()
            .iter()
            .find(|&&pos| args[pos].as_ref().is_empty())
        {
            return Err(CommandError::EmptyArgument { function, position });
        }

        let arg = |pos: usize| args[pos].as_ref().to_owned();
        let cmd = match function {
            LedgerFunction::InitLedger => Self::InitLedger,
            LedgerFunction::QueryAccount => Self::QueryAccount { account: arg(0) },
            LedgerFunction::CreateAccount => Self::CreateAccount {
                account: arg(0),
                bank: arg(1),
                balance: arg(2),
                owner: arg(3),
            },
            LedgerFunction::QueryAllAccounts => Self::QueryAllAccounts,
            LedgerFunction::Deposit => Self::Deposit {
                account: arg(0),
                amount: arg(1),
            },
            LedgerFunction::Withdraw => Self::Withdraw {
                account: arg(0),
                amount: arg(1),
            },
            LedgerFunction::Transfer => Self::Transfer {
                from: arg(0),
                to: arg(1),
                amount: arg(2),
            },
        };
        Ok(cmd)
    }
}
