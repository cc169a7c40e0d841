use crate::cli::commands::{host_arg, validator_socket_addr};
use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("serve")
        .about("Run the HTTP signing endpoint")
        .arg(
            Arg::new("listen")
                .help("Address to listen on")
                .long("listen")
                .short('l')
                .env("PASTESIGN_LISTEN")
                .default_value("127.0.0.1:8787")
                .num_args(1)
                .value_parser(validator_socket_addr()),
        )
        .arg(host_arg())
}
