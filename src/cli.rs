// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

/// Optional asset fields shared by `asset add` and `asset update`.
fn asset_field_args() -> Vec<Arg> {
    vec![
        opt("ownership").help("Ownership percentage, 0-100"),
        opt("link-account").help("Name of the mortgage/loan account backing this asset"),
        opt("manual-balance").help("Manually tracked outstanding balance"),
        opt("principal").help("Original loan principal"),
        opt("rate").help("Annual interest rate in percent"),
        opt("term").help("Loan term in months"),
        opt("start").help("Amortization start date YYYY-MM-DD"),
        opt("monthly-payment").help("Scheduled monthly payment"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("nestegg")
        .about("Household net worth, asset equity, and transaction categorization")
        .version(clap::crate_version!())
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .env("NESTEGG_OWNER")
                .help("Owner whose accounts and assets are used"),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .global(true)
                .env("NESTEGG_RULES")
                .help("Path to a categorization rule set (JSON)"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("type").help(
                            "checking, savings, credit_card, investment, mortgage or loan",
                        ))
                        .arg(
                            opt("balance")
                                .default_value("0")
                                .allow_negative_numbers(true),
                        )
                        .arg(opt("institution")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include hidden accounts"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one account and the assets linked to it")
                        .arg(req("name"))
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("set-balance")
                        .arg(req("name"))
                        .arg(req("balance").allow_negative_numbers(true)),
                )
                .subcommand(
                    Command::new("hide")
                        .about("Toggle whether an account is hidden")
                        .arg(req("name")),
                )
                .subcommand(Command::new("rm").arg(req("name"))),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage assets and their liabilities")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("type").help("real_estate, investment, vehicle or other"))
                        .arg(req("value"))
                        .args(asset_field_args()),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("update")
                        .arg(req("name"))
                        .arg(opt("value"))
                        .args(asset_field_args())
                        .arg(
                            Arg::new("unlink")
                                .long("unlink")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("link-account"),
                        ),
                )
                .subcommand(Command::new("rm").arg(req("name"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("date"))
                        .arg(req("account"))
                        .arg(req("amount").allow_negative_numbers(true))
                        .arg(req("description"))
                        .arg(opt("category"))
                        .arg(opt("tags"))
                        .arg(Arg::new("fixed").long("fixed").action(ArgAction::SetTrue))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(opt("external-id")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("month"))
                        .arg(opt("account"))
                        .arg(opt("category"))
                        .arg(
                            Arg::new("uncategorized")
                                .long("uncategorized")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category"),
                        )
                        .arg(opt("limit").value_parser(value_parser!(usize)))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(opt("category"))
                        .arg(opt("tags"))
                        .arg(opt("fixed"))
                        .arg(opt("tax-deductible")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(Command::new("transactions").arg(req("path"))),
        )
        .subcommand(
            Command::new("categorize")
                .about("Auto-categorize transactions from history and keyword rules")
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report what would change without saving"),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("rules")
                .about("Inspect the categorization rule set")
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("init")
                        .about("Write the built-in rule set to the rules path")
                        .arg(Arg::new("force").long("force").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Persistent settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-term")
                        .about("Default loan term (months) for assets without one")
                        .arg(req("months")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(
                    Command::new("networth")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("spending")
                        .arg(opt("month"))
                        .arg(
                            opt("range")
                                .value_parser(["30d", "ytd", "365d"])
                                .default_value("365d")
                                .conflicts_with("month"),
                        )
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                ),
        )
}
