use crate::cli::commands::validator_method;
use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("verify")
        .about("Check a presigned URL against the configured credentials")
        .arg(
            Arg::new("host")
                .help("Host entry the URL was signed with")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("url")
                .help("Presigned URL")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("method")
                .help("HTTP method the URL should authorize")
                .long("method")
                .short('m')
                .default_value("GET")
                .num_args(1)
                .value_parser(validator_method()),
        )
}
