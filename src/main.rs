#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sau_desktop_lib::run().await
}
