use std::io::Read;

use csv::{Position, StringRecord, StringRecordsIntoIter, Trim};

/// One ledger invocation as written in the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
}

impl From<StringRecord> for Invocation {
    fn from(record: StringRecord) -> Self {
        let mut fields: Vec<String> = record.iter().map(ToOwned::to_owned).collect();
        // rows are padded to the header width, so trailing blanks are not arguments
        while fields.last().is_some_and(String::is_empty) {
            fields.pop();
        }
        let mut fields = fields.into_iter();
        Self {
            function: fields.next().unwrap_or_default(),
            args: fields.collect(),
        }
    }
}

/// Parses invocation list in CSV format, one `function,arg1,arg2,...` per row
pub struct CsvInvocationParser<R> {
    iter: StringRecordsIntoIter<R>,
}

impl<R> CsvInvocationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_records(),
        }
    }
}

impl<R> Iterator for CsvInvocationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Invocation, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.iter.next()?;
        let line = match &row {
            Ok(record) => record.position(),
            Err(err) => err.position(),
        }
        .map(Position::line)
        .unwrap_or_default();
        Some((line, row.map(Invocation::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows() {
        let input = "function,arg1,arg2,arg3,arg4\n\
                     initLedger,,,,\n\
                     transfer, ACCT1 ,ACCT2,150\n\
                     queryAllAccounts\n";
        let (lines, rows): (Vec<_>, Vec<_>) = CsvInvocationParser::new(input.as_bytes())
            .map(|(line, row)| (line, row.unwrap()))
            .unzip();
        assert_eq!(lines, [2, 3, 4]);
        assert_eq!(
            rows,
            [
                Invocation {
                    function: "initLedger".to_owned(),
                    args: vec![],
                },
                Invocation {
                    function: "transfer".to_owned(),
                    args: vec!["ACCT1".to_owned(), "ACCT2".to_owned(), "150".to_owned()],
                },
                Invocation {
                    function: "queryAllAccounts".to_owned(),
                    args: vec![],
                },
            ]
        );
    }
}
