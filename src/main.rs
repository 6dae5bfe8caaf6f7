// src/main.rs

use selfreload::{cli, logging, run_app};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("selfreload error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run_app(args).await
}
