#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = uniquiz::run().await {
        eprintln!("uniquiz fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
