// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::commands::importer::{ImportSummary, import_transactions};
use nestegg::config::Scope;
use nestegg::db;
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO accounts(owner, name, type) VALUES ('default', 'Chase Checking', 'checking')",
        [],
    )
    .unwrap();
    conn
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn reimporting_the_same_export_inserts_once() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount,account,category,external_id,tags\n\
         2025-03-01,NETFLIX.COM,15.49,Chase Checking,Subscription,tx-1,\n\
         2025-03-02,WHOLE FOODS MARKET,82.10,Chase Checking,,tx-2,\n\
         2025-03-03,Refund,-20,Chase Checking,,tx-3,Work\n",
    );

    let first = import_transactions(&mut conn, &Scope::default(), file.path()).unwrap();
    assert_eq!(first, ImportSummary { inserted: 3, skipped: 0 });
    let second = import_transactions(&mut conn, &Scope::default(), file.path()).unwrap();
    assert_eq!(second, ImportSummary { inserted: 0, skipped: 3 });

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);

    let (cat, tags): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT category, tags FROM transactions WHERE external_id='tx-3'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(cat, None);
    assert_eq!(tags.as_deref(), Some("Work"));
}

#[test]
fn rows_without_external_id_are_always_inserted() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount,account\n\
         2025-03-01,Cash withdrawal,40,Chase Checking\n",
    );
    import_transactions(&mut conn, &Scope::default(), file.path()).unwrap();
    import_transactions(&mut conn, &Scope::default(), file.path()).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn bad_row_rolls_back_whole_file() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount,account,category,external_id\n\
         2025-03-01,Good,10,Chase Checking,,a\n\
         2025-13-45,Bad,10,Chase Checking,,b\n",
    );
    let err = import_transactions(&mut conn, &Scope::default(), file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid transaction date"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn unknown_account_is_an_error() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount,account\n\
         2025-03-01,Coffee,4,Amex Gold\n",
    );
    let err = import_transactions(&mut conn, &Scope::default(), file.path()).unwrap_err();
    assert!(err.to_string().contains("Account 'Amex Gold' not found"));
}
