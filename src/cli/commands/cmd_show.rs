use clap::Command;

pub fn command() -> Command {
    Command::new("show").about("List configured hosts, secrets are never printed")
}
