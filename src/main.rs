use azure_ipconfig_sync::args::Args;
use azure_ipconfig_sync::logging;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = logging::init(&args.log_config) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }
    log::info!("#Start main()");

    match azure_ipconfig_sync::run(&args).await {
        Ok(report) => {
            log::info!(
                "Done. kept={} dropped={} added={} written={}",
                report.plan.kept.len(),
                report.plan.dropped.len(),
                report.plan.added.len(),
                report.written
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{} {e}", "FAILED".on_red());
            ExitCode::from(e.exit_code())
        }
    }
}
