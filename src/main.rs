use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = reportgate::cli::Cli::parse();
    if let Err(e) = reportgate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
