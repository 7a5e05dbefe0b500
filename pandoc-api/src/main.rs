//! CLI entrypoint for `pandoc-api`.

use std::io::Write as _;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use pandoc_api::cli::{Args, Command, HelpTopic};
use pandoc_api::{PandocApiError, Result, TokioRunner, app, config, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn run() -> Result<()> {
    let args = Args::parse();
    match &args.command {
        Some(Command::Start { .. }) => {
            telemetry::init()?;
            let config = config::load(&args.overrides())?;
            app::start(&config, Arc::new(TokioRunner::new())).await
        }
        Some(Command::Help {
            topic: Some(HelpTopic::Converter),
        }) => {
            let config = config::load(&args.overrides())?;
            let help = app::converter_help(&config, Arc::new(TokioRunner::new())).await?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{help}").map_err(|err| output_error(&err))
        }
        Some(Command::Help { topic: None }) | None => {
            Args::command().print_help().map_err(|err| output_error(&err))
        }
    }
}

fn output_error(err: &std::io::Error) -> PandocApiError {
    PandocApiError::Message(format!("failed to write to standard output: {err}"))
}
