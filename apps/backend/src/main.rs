#[tokio::main]
async fn main() -> anyhow::Result<()> {
    markdeck_backend::run().await
}
