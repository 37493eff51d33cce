use anyhow::Result;
use clap::Parser;
use tracing::error;
use wp_hello::ModuleOutcome;
use wp_hello::cli::Cli;
use wp_hello::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init();

    let cli = Cli::parse();

    let outcome = match cli.module_args() {
        Ok(args) => wp_hello::run(args).await,
        Err(e) => {
            let msg = format!("{e:#}");
            error!(error = %msg, "failed to load module arguments");
            ModuleOutcome::failed(msg)
        }
    };

    println!("{}", serde_json::to_string(&outcome)?);
    std::process::exit(outcome.exit_code());
}
