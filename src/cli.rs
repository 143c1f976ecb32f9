// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn input_arg() -> Arg {
    Arg::new("input")
        .long("input")
        .short('i')
        .required(true)
        .help("Broker transactions CSV export")
}

pub fn build_cli() -> Command {
    Command::new("tradeport")
        .version(crate_version!())
        .about("Convert broker transaction exports into TradingView or Wealthfolio imports")
        .subcommand(
            Command::new("convert")
                .about("Convert a transactions export")
                .arg(input_arg())
                .arg(
                    Arg::new("symbols")
                        .long("symbols")
                        .short('s')
                        .help("JSON map of ISIN -> resolved symbol (or null)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("tradingview | wealthfolio (default from settings)"),
                )
                .arg(
                    Arg::new("aggregate")
                        .long("aggregate")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("no_aggregate")
                        .help("Merge consecutive same-symbol trades"),
                )
                .arg(
                    Arg::new("no_aggregate")
                        .long("no-aggregate")
                        .action(ArgAction::SetTrue)
                        .help("Keep every trade even if settings enable aggregation"),
                )
                .arg(Arg::new("out").long("out").short('o').help("Output CSV path (default stdout)"))
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Write skipped rows and errors as JSON to this path"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .requires("out")
                        .help("Print diagnostics as JSON instead of tables"),
                ),
        )
        .subcommand(
            Command::new("isins")
                .about("List the ISINs an export needs resolved")
                .arg(input_arg())
                .arg(
                    Arg::new("template")
                        .long("template")
                        .action(ArgAction::SetTrue)
                        .help("Emit a JSON symbol map template with every ISIN set to null"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("path"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("format").long("format"))
                        .arg(Arg::new("aggregate").long("aggregate").help("true | false"))
                        .arg(Arg::new("currency").long("currency")),
                ),
        )
}
