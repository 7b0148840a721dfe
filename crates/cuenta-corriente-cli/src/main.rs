#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cuenta_corriente_cli::run(std::env::args()).await
}
