use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::warn;

use crate::{
    account::AccountRecord,
    ledger::{QueryResult, RecordValue},
};

const HEADER: [&str; 4] = ["key", "bank", "owner", "balance"];

#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    key: &'a str,
    bank: &'a str,
    owner: &'a str,
    balance: String,
}

/// Writes every account among `results` as a CSV row, in the order given.
/// Entries that do not hold an account record are skipped.
pub fn print_accounts<W>(output: &mut W, results: &[QueryResult]) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    if let Err(err) = writer.write_record(HEADER) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    for result in results {
        let RecordValue::Parsed(value) = &result.record else {
            warn!(key = %result.key, "Skipping raw payload");
            continue;
        };
        // decoded from text: integer balances beyond u64 do not decode from a `Value`
        let acc = match serde_json::from_str::<AccountRecord>(&value.to_string()) {
            Ok(acc) => acc,
            Err(err) => {
                warn!(key = %result.key, %err, "Skipping non-account record");
                continue;
            }
        };
        let row = AccountRow {
            key: &result.key,
            bank: &acc.bank,
            owner: &acc.owner,
            balance: acc.balance.normalize().to_string(),
        };
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(key: &str, payload: &str) -> QueryResult {
        QueryResult {
            key: key.to_owned(),
            record: RecordValue::Parsed(serde_json::from_str(payload).unwrap()),
        }
    }

    #[test]
    fn prints_large_and_fractional_balances() {
        let results = [
            parsed(
                "BIG",
                r#"{"bank":"RBC","docType":"account","balance":10000000000000000000000000000,"owner":"Al"}"#,
            ),
            parsed(
                "FINE",
                r#"{"bank":"TD","docType":"account","balance":0.12345678901234567,"owner":"Bo"}"#,
            ),
            parsed("CAR", r#"{"docType":"car","make":"Toyota"}"#),
            QueryResult {
                key: "RAW".to_owned(),
                record: RecordValue::Raw("text".to_owned()),
            },
        ];
        let mut output = Vec::new();
        print_accounts(&mut output, &results).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "key,bank,owner,balance\n\
             BIG,RBC,Al,10000000000000000000000000000\n\
             FINE,TD,Bo,0.12345678901234567\n"
        );
    }
}
