use explorer::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli: Cli = argh::from_env();

    // Logs go to stderr, stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = explorer::run(&cli).await;
    if let Err(err) = &result {
        tracing::error!("Report aborted: {:?}", err);
        eprintln!("error: {}", err);
    }

    std::process::exit(explorer::exit_code(&result));
}
