#[tokio::main]
async fn main() -> anyhow::Result<()> {
    revise_backend::run().await
}
