pub mod cmd_serve;
pub mod cmd_show;
pub mod cmd_sign;
pub mod cmd_verify;

use crate::config::DEFAULT_HOST;
use crate::store::signature::MAX_EXPIRES;
use clap::{
    Arg, ColorChoice, Command,
    builder::ValueParser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

pub fn validator_expires() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<u64, String> {
        match s.parse::<u64>() {
            Ok(n) if (1..=MAX_EXPIRES).contains(&n) => Ok(n),
            _ => Err(format!("Not a valid number of seconds (1-{MAX_EXPIRES})")),
        }
    })
}

pub fn validator_method() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<String, String> {
        s.parse::<crate::store::Method>()
            .map(|m| m.to_string())
            .map_err(|e| e.to_string())
    })
}

pub fn validator_socket_addr() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<SocketAddr, String> {
        s.parse::<SocketAddr>()
            .map_err(|_| format!("Invalid listen address: '{s}'"))
    })
}

pub fn host_arg() -> Arg {
    Arg::new("host")
        .help("Host entry in the config file")
        .long("host")
        .short('H')
        .default_value(DEFAULT_HOST)
        .num_args(1)
}

pub fn new(config_path: &Path) -> Command {
    // get config file path (default: ~/.config/pastesign/config.yml)
    let config_file_path = config_path.join("config.yml");

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("pastesign")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Presigned S3/R2 URLs without handing out credentials")
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
            .default_value(config_file_path.into_os_string())
            .help("Configuration file, optional when using PASTESIGN_* environment variables")
            .long("config")
            .short('c')
            .global(true)
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("config.yml")
        )
        .arg(
            Arg::new("verbose")
            .help("Verbosity level")
            .short('v')
            .long("verbose")
            .global(true)
            .action(clap::ArgAction::Count)
        )
        .subcommand(cmd_sign::command())
        .subcommand(cmd_verify::command())
        .subcommand(cmd_serve::command())
        .subcommand(cmd_show::command())
}
