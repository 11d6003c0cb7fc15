//! Config management: print the path, write a starter file.

use std::fs;
use std::io::ErrorKind;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(bundlewatch_config::default_config_path);

    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Io(std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!("{} already exists (use --force to overwrite)", path.display()),
                )));
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bundlewatch_config::template()?)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
