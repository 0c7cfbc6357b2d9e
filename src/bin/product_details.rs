//! Product Details Client for LumiMate
//!
//! Identifies a product from a photo. Findings (text, labels, web entities)
//! come from the vision backend unless given with `--findings` or replaced
//! by placeholders with `--skip_vision`.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use clap::Parser;
use lumimate_client::cli::{self, CommonArgs};
use lumimate_client::workflow::{self, ProductFindings};
use lumimate_client::{ChatClient, VisionClient};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_IMAGE_PATH: &str = "test_product.jpg";

/// Product Details Client for LumiMate
#[derive(Parser)]
#[command(name = "product-details")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the image file to be processed
    #[arg(short = 'i', long = "image_path", default_value = DEFAULT_IMAGE_PATH)]
    image_path: PathBuf,

    /// Provide findings directly instead of calling vision backend
    #[arg(short = 'f', long)]
    findings: Option<String>,

    /// Skip vision backend and use default placeholder findings
    #[arg(short = 's', long = "skip_vision")]
    skip_vision: bool,

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

    let clients = cli::load_config(&args.common)
        .and_then(|cfg| Ok((ChatClient::new(&cfg)?, VisionClient::new(&cfg)?)));
    let (chat, vision) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            println!("Unexpected error: {e}");
            return ExitCode::SUCCESS;
        }
    };

    let mode = ProductFindings::from_flags(args.findings, args.skip_vision);
    let mut out = std::io::stdout();
    workflow::run_product(mode, &vision, &chat, &args.image_path, &mut out).await;
    ExitCode::SUCCESS
}
