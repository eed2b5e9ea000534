use github_fetch::{cli, FetchError};
use log::error;

#[tokio::main(flavor = "current_thread")] // requests are strictly sequential
async fn main() {
    let matches = cli::build_cli().get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    cli::init_logging(log_level.as_deref());

    if let Err(e) = cli::run(&matches).await {
        let tag = if e.downcast_ref::<FetchError>().is_some() {
            "ghub"
        } else {
            "main"
        };
        error!(target: tag, "{:#}", e);
        error!(target: tag, "Execution terminated with errors.");
        std::process::exit(1);
    }
}
