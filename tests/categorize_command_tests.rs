// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::categorize::RuleSet;
use nestegg::commands::categorize;
use nestegg::config::Scope;
use nestegg::{cli, db};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id, owner, name, type) VALUES (1, 'default', 'Checking', 'checking');
        INSERT INTO accounts(id, owner, name, type, is_hidden) VALUES (2, 'default', 'Old Card', 'credit_card', 1);
        INSERT INTO accounts(id, owner, name, type) VALUES (3, 'partner', 'Joint', 'checking');
        "#,
    )
    .unwrap();
    let rows: [(i64, &str, &str, Option<&str>, bool); 7] = [
        (1, "2025-01-01", "NETFLIX.COM", Some("Subscription"), true),
        (1, "2025-02-01", "NETFLIX.COM MONTHLY", None, false),
        (1, "2025-02-02", "PAYMENT TO CHASE CARD ENDING 1234", None, false),
        (1, "2025-02-03", "AMAZON.COM*AB123", Some("Uncategorized"), false),
        // Hidden account: neither learned from nor categorized.
        (2, "2025-01-01", "AMAZON.COM*AB123", Some("Shopping"), false),
        (2, "2025-02-04", "Lyft ride", None, false),
        // Another owner's history must not leak in.
        (3, "2025-01-01", "PETCO 0042", Some("Pets"), false),
    ];
    for (acct, date, desc, cat, fixed) in rows {
        conn.execute(
            "INSERT INTO transactions(account_id, date, amount, description, category, is_fixed) VALUES (?1, ?2, '10', ?3, ?4, ?5)",
            params![acct, date, desc, cat, fixed],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(account_id, date, amount, description) VALUES (1, '2025-02-05', '10', 'PETCO 0042')",
        [],
    )
    .unwrap();
    conn
}

fn category_of(conn: &Connection, desc: &str, account_id: i64) -> Option<String> {
    conn.query_row(
        "SELECT category FROM transactions WHERE description=?1 AND account_id=?2",
        params![desc, account_id],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn run_persists_changes_for_visible_accounts() {
    let mut conn = setup();
    let report = categorize::run(&mut conn, &Scope::default(), &RuleSet::default(), false).unwrap();

    assert_eq!(report.knowledge_base_size, 1);
    assert_eq!(report.processed_count, 5);
    assert_eq!(report.updated_count, 2);

    assert_eq!(
        category_of(&conn, "NETFLIX.COM MONTHLY", 1).as_deref(),
        Some("Subscription")
    );
    assert_eq!(
        category_of(&conn, "PAYMENT TO CHASE CARD ENDING 1234", 1).as_deref(),
        Some("Credit Card Payment")
    );
    assert_eq!(
        category_of(&conn, "AMAZON.COM*AB123", 1).as_deref(),
        Some("Uncategorized")
    );
    assert_eq!(category_of(&conn, "PETCO 0042", 1), None);
    assert_eq!(category_of(&conn, "Lyft ride", 2), None);

    let fixed: bool = conn
        .query_row(
            "SELECT is_fixed FROM transactions WHERE description='NETFLIX.COM MONTHLY'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert!(fixed);

    let again = categorize::run(&mut conn, &Scope::default(), &RuleSet::default(), false).unwrap();
    assert_eq!(again.updated_count, 0);
}

#[test]
fn dry_run_saves_nothing() {
    let mut conn = setup();
    let report = categorize::run(&mut conn, &Scope::default(), &RuleSet::default(), true).unwrap();
    assert_eq!(report.updated_count, 2);
    assert_eq!(category_of(&conn, "NETFLIX.COM MONTHLY", 1), None);
}

#[test]
fn handle_parses_flags() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from(["nestegg", "categorize", "--dry-run", "--json"]);
    if let Some(("categorize", m)) = matches.subcommand() {
        categorize::handle(&mut conn, &Scope::default(), &RuleSet::default(), m).unwrap();
    } else {
        panic!("categorize command not parsed");
    }
    assert_eq!(category_of(&conn, "NETFLIX.COM MONTHLY", 1), None);
}
