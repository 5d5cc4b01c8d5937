//! Drives [`AccountLedger`] from a CSV list of invocations against an in-memory
//! world state. Kept inside the library so integration tests can run it.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use csv_parser::CsvInvocationParser;
use csv_printer::print_accounts;
use tracing::info;

use crate::{
    command::LedgerCommand,
    ledger::{AccountLedger, ContractError},
    world_state::in_memory_state::InMemoryWorldState,
};
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, ContractError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvInvocationParser::new(self.input);

        let mut state = InMemoryWorldState::default();

        for (line, row) in parser {
            let invocation = row.with_context(|| format!("Malformed CSV row at line {line}"))?;
            let outcome = LedgerCommand::parse(&invocation.function, invocation.args.as_slice())
                .map_err(ContractError::from)
                .and_then(|cmd| {
                    AccountLedger::new(&mut state)
                        .invoke(cmd)
                        .map_err(ContractError::from)
                });
            match outcome {
                Ok(Some(payload)) => {
                    info!(line, function = %invocation.function, %payload, "Query result")
                }
                Ok(None) => {}
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let results = AccountLedger::new(&mut state).query_all_accounts()?;
        print_accounts(self.output, &results)
    }
}
