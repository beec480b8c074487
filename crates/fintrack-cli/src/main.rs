//! `fintrack` binary entrypoint.

#[tokio::main]
async fn main() {
    let code = fintrack_cli::run().await;
    if code != 0 {
        std::process::exit(code);
    }
}
