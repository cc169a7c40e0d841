use crate::{
    cli::{actions::Action, commands, dispatch},
    config::Config,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn get_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().map_or_else(|| PathBuf::from("/tmp"), |h| h);

    let config_path = Path::new(&home_dir).join(".config").join("pastesign");
    fs::create_dir_all(&config_path)
        .context(format!("unable to create: {}", &config_path.display()))?;

    Ok(config_path)
}

/// # Errors
///
/// Will return an error if the config file can not be parsed or the
/// arguments do not resolve to an action
pub fn start() -> Result<Action> {
    let config_path = get_config_path()?;

    // start the command line interface
    let cmd = commands::new(&config_path);

    // get the matches
    let matches = cmd.get_matches();

    // serve logs requests unless told otherwise
    let serving = matches.subcommand_matches("serve").is_some();

    let verbosity_level = match matches.get_count("verbose") {
        0 if serving => log::LevelFilter::Info,
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(verbosity_level)
        .init();

    log::info!("config path: {}", config_path.display());

    let config_file = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| config_path.join("config.yml"));

    // a missing file is fine, hosts may come from the environment
    let config = Config::load(&config_file)?;

    log::debug!("hosts: {:?}", config.hosts.keys().collect::<Vec<_>>());

    let action = dispatch::dispatch(config, &matches)?;

    log::debug!("action: {action:?}");

    Ok(action)
}
