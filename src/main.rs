// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use nestegg::{cli, commands, config::Config, db, logging};

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::resolve(
        matches.get_one::<String>("owner").map(String::as_str),
        matches.get_one::<String>("rules").map(String::as_str),
    )?;
    let scope = &config.scope;
    let mut conn = db::open_or_init(&config.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, scope, sub)?,
        Some(("asset", sub)) => commands::assets::handle(&conn, scope, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, scope, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, scope, sub)?,
        Some(("categorize", sub)) => {
            let rules = config.load_rules()?;
            commands::categorize::handle(&mut conn, scope, &rules, sub)?
        }
        Some(("rules", sub)) => commands::rules::handle(&config, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("report", sub)) => {
            let rules = config.load_rules()?;
            commands::reports::handle(&conn, scope, &rules, sub)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
