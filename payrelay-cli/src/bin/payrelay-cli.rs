use clap::Parser;
use console::{style, Term};
use payrelay::PayRelayClient;
use payrelaycli::cli::{self, Opts};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    cli::init_tracing();

    let opts = Opts::parse();
    info!("payrelay settings: {}", opts.settings);

    // ctrl-c aborts the request that is in flight
    let cancel = CancellationToken::new();
    let client = PayRelayClient::new(opts.settings)?.with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let term = Term::stdout();
    match cli::execute(&client, opts.command, &term).await {
        Err(e) if cli::is_not_found(&e) => {
            term.write_line(&format!("{}", style("Not found").red()))?;
            std::process::exit(1)
        }
        Err(e) if cli::is_cancelled(&e) => {
            term.write_line(&format!("{}", style("Cancelled").yellow()))?;
            std::process::exit(130)
        }
        result => result,
    }
}
