// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{default_term_months, set_setting};
use crate::utils::{parse_term, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![vec![
                "default_term_months".to_string(),
                default_term_months(conn)?.to_string(),
            ]];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-term", sub)) => {
            let months = parse_term(sub.get_one::<String>("months").unwrap())?;
            set_setting(conn, "default_term_months", &months.to_string())?;
            println!("Default loan term set to {} months", months);
        }
        _ => {}
    }
    Ok(())
}
