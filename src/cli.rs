// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn amount_arg(name: &'static str, required: bool) -> Arg {
    Arg::new(name)
        .long(name)
        .required(required)
        .allow_hyphen_values(true)
}

fn goal_plan_args(cmd: Command, required: bool) -> Command {
    cmd.arg(amount_arg("monthly", required).help("Monthly deposit"))
        .arg(
            Arg::new("years")
                .long("years")
                .required(required)
                .help("Term in years, fractions allowed (e.g. 2.5)"),
        )
        .arg(
            Arg::new("rate")
                .long("rate")
                .required(required)
                .allow_hyphen_values(true)
                .help("Annual profit rate in percent"),
        )
}

pub fn build_cli() -> Command {
    command!()
        .name("dpsbook")
        .about("Savings goals, deposit ledger replay, and mirrored transactions")
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    goal_plan_args(Command::new("add"), true)
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("start").long("start").help("Start date YYYY-MM-DD (default today)"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    goal_plan_args(Command::new("edit"), false)
                        .arg(Arg::new("goal").long("goal").required(true).help("Goal name or id"))
                        .arg(Arg::new("name").long("name").help("New name"))
                        .arg(Arg::new("start").long("start"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a goal with its deposits and mirrored transactions")
                        .arg(Arg::new("goal").long("goal").required(true)),
                )
                .subcommand(
                    json_flags(goal_plan_args(Command::new("project"), true))
                        .about("Preview target and maturity without saving")
                        .arg(
                            Arg::new("schedule")
                                .long("schedule")
                                .action(ArgAction::SetTrue)
                                .help("Show the month-by-month schedule"),
                        ),
                ),
        )
        .subcommand(
            Command::new("deposit")
                .about("Deposit records")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("goal").long("goal").required(true))
                        .arg(amount_arg("amount", true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true).help("Record id or unique prefix"))
                        .arg(Arg::new("goal").long("goal"))
                        .arg(amount_arg("amount", false))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(
                    json_flags(Command::new("list"))
                        .about("Replayed history, newest first")
                        .arg(Arg::new("goal").long("goal"))
                        .arg(Arg::new("limit").long("limit").value_parser(value_parser!(usize))),
                ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("deposits")
                    .about("Bulk-add deposits from tab or double-space separated lines")
                    .arg(Arg::new("goal").long("goal").required(true))
                    .arg(Arg::new("path").long("path").required(true).help("File path, or - for stdin"))
                    .arg(Arg::new("dry_run").long("dry-run").action(ArgAction::SetTrue)),
            ),
        )
        .subcommand(
            Command::new("tx")
                .about("General income/expense ledger")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").required(true).help("income|expense"))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(amount_arg("amount", true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("limit").long("limit").value_parser(value_parser!(usize))),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(amount_arg("amount", false))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("report")
                .subcommand(json_flags(Command::new("summary")).about("Savings portfolio totals"))
                .subcommand(
                    json_flags(Command::new("monthly"))
                        .about("Income and expense per month")
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .default_value("12"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .subcommand(
                    Command::new("savings")
                        .about("Replayed deposit history")
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Snapshot sync with the configured backend")
                .subcommand(Command::new("push"))
                .subcommand(Command::new("pull")),
        )
        .subcommand(
            Command::new("config")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check totals, orphans and mirrored transactions"))
}
