use crate::cli::commands::{validator_expires, validator_method};
use crate::store::signature::DEFAULT_EXPIRES;
use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("sign")
        .about("Print a presigned URL for an object")
        .arg(
            Arg::new("arguments")
                .help("<host>/<key>")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("method")
                .help("HTTP method the URL authorizes: GET, PUT or DELETE")
                .long("method")
                .short('m')
                .default_value("PUT")
                .num_args(1)
                .value_parser(validator_method()),
        )
        .arg(
            Arg::new("expires")
                .help("Time period in seconds, max value 604800 (seven days)")
                .long("expires")
                .short('e')
                .default_value(DEFAULT_EXPIRES.to_string())
                .num_args(1)
                .value_parser(validator_expires()),
        )
        .arg(
            Arg::new("json")
                .help("Print {\"url\", \"expiresAt\"} as JSON")
                .long("json")
                .action(clap::ArgAction::SetTrue),
        )
}
