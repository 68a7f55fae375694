// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::config::Scope;
use nestegg::{cli, commands::transactions, db};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO accounts(id, owner, name, type) VALUES (1, 'default', 'A1', 'checking')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, owner, name, type, is_hidden) VALUES (2, 'default', 'Biz', 'credit_card', 1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, owner, name, type) VALUES (3, 'partner', 'P1', 'checking')",
        [],
    )
    .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(date, account_id, amount, description, category) VALUES (?1, 1, '10', 'P', 'Cat1')",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(date, account_id, amount, description) VALUES ('2025-01-05', 1, '4.50', 'Coffee')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date, account_id, amount, description) VALUES ('2025-01-06', 2, '99', 'Hidden')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date, account_id, amount, description) VALUES ('2025-01-07', 3, '7', 'Partner')",
        [],
    )
    .unwrap();
    conn
}

fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["nestegg", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => tx_m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let tx_m = tx_matches(&["list", "--limit", "2"]);
    if let Some(("list", list_m)) = tx_m.subcommand() {
        let rows = transactions::query_rows(&conn, &Scope::default(), list_m).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2025-01-05");
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn list_skips_hidden_and_foreign_accounts() {
    let conn = setup();
    let tx_m = tx_matches(&["list"]);
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, &Scope::default(), list_m).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.account == "A1"));

    let rows = transactions::query_rows(&conn, &Scope::new("partner"), list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Partner");
}

#[test]
fn list_uncategorized_filter() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date, account_id, amount, description, category) VALUES ('2025-01-08', 1, '1', 'Sentinel', 'Uncategorized')",
        [],
    )
    .unwrap();
    let tx_m = tx_matches(&["list", "--uncategorized"]);
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, &Scope::default(), list_m).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(names, vec!["Sentinel", "Coffee"]);
    assert!(rows.iter().all(|r| r.category == "Uncategorized"));
}

#[test]
fn add_is_idempotent_on_external_id() {
    let conn = setup();
    let args = [
        "add", "--date", "2025-02-01", "--account", "A1", "--amount", "-12.00",
        "--description", "Refund", "--external-id", "ext-1",
    ];
    for _ in 0..2 {
        let tx_m = tx_matches(&args);
        transactions::handle(&conn, &Scope::default(), &tx_m).unwrap();
    }
    let (count, amount): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(amount) FROM transactions WHERE external_id='ext-1'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(amount, "-12.00");
}

#[test]
fn add_rejects_account_of_other_owner() {
    let conn = setup();
    let tx_m = tx_matches(&[
        "add", "--date", "2025-02-01", "--account", "P1", "--amount", "5", "--description", "X",
    ]);
    let err = transactions::handle(&conn, &Scope::default(), &tx_m).unwrap_err();
    assert!(err.to_string().contains("Account 'P1' not found"));
}

#[test]
fn edit_updates_fields_and_checks_owner() {
    let conn = setup();
    let tx_m = tx_matches(&[
        "edit", "--id", " 4 ", "--category", "Coffee Shops", "--tags", "Work", "--fixed", "true",
        "--tax-deductible", "yes",
    ]);
    transactions::handle(&conn, &Scope::default(), &tx_m).unwrap();
    let (cat, tags, fixed, deductible): (String, String, bool, bool) = conn
        .query_row(
            "SELECT category, tags, is_fixed, is_tax_deductible FROM transactions WHERE id=4",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(cat, "Coffee Shops");
    assert_eq!(tags, "Work");
    assert!(fixed);
    assert!(deductible);

    let tx_m = tx_matches(&["edit", "--id", "6", "--category", "Mine"]);
    let err = transactions::handle(&conn, &Scope::default(), &tx_m).unwrap_err();
    assert!(err.to_string().contains("Transaction 6 not found"));
}

#[test]
fn load_visible_transactions_orders_oldest_first() {
    let conn = setup();
    let txs = transactions::load_visible_transactions(&conn, &Scope::default()).unwrap();
    assert_eq!(txs.len(), 4);
    assert_eq!(txs[0].date.to_string(), "2025-01-01");
    assert_eq!(txs[3].description, "Coffee");
    assert_eq!(txs[3].category, None);
}
