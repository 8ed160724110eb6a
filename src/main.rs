use anyhow::Result;
use clap::Parser;
use covid_testing_report::{cli, error::PipelineError};
use tracing::error;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        error!("{:#}", err);
        eprintln!("error: {:#}", err);
        let code = err
            .downcast_ref::<PipelineError>()
            .map(PipelineError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
    Ok(())
}
