#[tokio::main]
async fn main() -> anyhow::Result<()> {
    admatch_server::start().await
}
