//! Command-line plumbing shared by the binaries.

use crate::config::ClientConfig;
use crate::{Error, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Flags every binary accepts.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// YAML file with endpoint and sampling settings
    #[arg(short, long, env = "LUMIMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Initialize logging with the given verbosity level.
///
/// Stdout carries the description itself, so logs are written to stderr
/// and stay quiet by default.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lumimate_client={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The image must be an existing regular file before any request is made.
pub fn check_image_path(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::ImageNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Lines printed when the image path is unusable.
pub fn missing_image_message(path: &Path) -> String {
    format!(
        "Error: Image file '{}' does not exist.\n\
         Please ensure the file exists or specify a different path using the --image_path argument",
        path.display()
    )
}

pub fn load_config(args: &CommonArgs) -> Result<ClientConfig> {
    ClientConfig::load(args.config.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_and_missing_files_are_rejected() {
        let missing = std::env::temp_dir().join(format!("lumimate-{}.jpg", uuid::Uuid::new_v4()));
        assert!(matches!(check_image_path(&missing), Err(Error::ImageNotFound { .. })));
        assert!(check_image_path(&std::env::temp_dir()).is_err());
    }

    #[test]
    fn missing_message_names_path_and_flag() {
        let msg = missing_image_message(Path::new("/nope/photo.jpg"));
        assert!(msg.starts_with("Error: Image file '/nope/photo.jpg' does not exist."));
        assert!(msg.contains("--image_path"));
    }
}
