use std::process::ExitCode;

use clap::Parser;
use jira_worklog_export_lib::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    jira_worklog_export_lib::init_logging(cli.verbose);

    match jira_worklog_export_lib::run(&cli).await {
        Ok(count) => {
            println!("Wrote {} worklog entries to {}", count, cli.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
