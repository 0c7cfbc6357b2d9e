//! Scene Description Client for LumiMate
//!
//! Sends a point-of-view photo to the vision model and streams back a short
//! description of the surroundings.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use clap::Parser;
use lumimate_client::cli::{self, CommonArgs};
use lumimate_client::{workflow, ChatClient};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_IMAGE_PATH: &str = "test_image.jpg";

/// Scene Description Client for LumiMate
#[derive(Parser)]
#[command(name = "scene-description")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the image file to be processed
    #[arg(short = 'i', long = "image_path", default_value = DEFAULT_IMAGE_PATH)]
    image_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.common.verbose);

    if cli::check_image_path(&args.image_path).is_err() {
        println!("{}", cli::missing_image_message(&args.image_path));
        return ExitCode::from(1);
    }
    println!("Using image: {}", args.image_path.display());

    let chat = match cli::load_config(&args.common).and_then(|cfg| ChatClient::new(&cfg)) {
        Ok(chat) => chat,
        Err(e) => {
            println!("Unexpected error: {e}");
            return ExitCode::SUCCESS;
        }
    };

    let mut out = std::io::stdout();
    workflow::run_scene_description(&chat, &args.image_path, &mut out).await;
    ExitCode::SUCCESS
}
