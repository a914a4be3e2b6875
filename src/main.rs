#[tokio::main]
async fn main() {
    if let Err(e) = doktolib::run().await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
