use std::{cell::RefCell, rc::Rc, str::from_utf8};

use account_ledger::{bin_utils::Service, ledger::ContractError};

const TEST_FILE: &str = include_str!("invocations.csv");

#[test]
fn replay_invocations() {
    let mut output = Vec::new();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let recorded = Rc::clone(&errors);
    let service = Service {
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        error_printer: Box::new(move |line, err| {
            let kind = match err {
                ContractError::CommandErr(_) => "command",
                ContractError::LedgerErr(_) => "ledger",
            };
            recorded.borrow_mut().push((line, kind, err.to_string()));
        }),
    };
    service.run().unwrap();

    // world state is ordered, so accounts come out sorted by key
    let lines: Vec<&str> = from_utf8(&output).unwrap().lines().collect();
    assert_eq!(
        lines,
        [
            "key,bank,owner,balance",
            "ACCOUNT0,RBC,John,999.5",
            "ACCOUNT1,CIBC,Max,5678",
            "ACCT1,RBC,Alice,0",
            "ACCT2,TD,Bob,150",
        ]
    );

    let errors = errors.borrow();
    assert_eq!(
        *errors,
        [
            (
                6,
                "ledger",
                "Insufficient balance in ACCT1: requested 200, available 150".to_owned()
            ),
            (8, "ledger", "MISSING does not exist".to_owned()),
            (11, "command", "Unknown function `burn`".to_owned()),
            (12, "ledger", "Amount `abc` is not a number".to_owned()),
        ]
    );
}

#[test]
fn empty_input_prints_header_only() {
    let mut output = Vec::new();
    let service = Service {
        input: "function,arg1\n".as_bytes(),
        output: &mut output,
        error_printer: Box::new(|line, err| panic!("unexpected error at line {line}: {err}")),
    };
    service.run().unwrap();
    assert_eq!(from_utf8(&output).unwrap(), "key,bank,owner,balance\n");
}
