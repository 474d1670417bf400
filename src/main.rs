//! Roast CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use roast::cli::{self, Cli};
use roast::config::Settings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs stay on stderr so stdout carries only the generated text.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match Settings::from_env() {
        Ok(settings) => {
            let settings = cli.apply_to(settings);
            cli::run(&cli, &settings).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
