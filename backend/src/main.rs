use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = dashboard::start_server().await {
        error!("{e}");
        std::process::exit(1);
    }
}
