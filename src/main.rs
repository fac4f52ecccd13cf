#[tokio::main]
async fn main() {
    if let Err(err) = qpapergen::run().await {
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}
