#[tokio::main]
async fn main() -> anyhow::Result<()> {
    videogate_lib::run_app().await
}
