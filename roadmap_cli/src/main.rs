#[tokio::main]
async fn main() -> anyhow::Result<()> {
    roadmap_cli::run().await
}
