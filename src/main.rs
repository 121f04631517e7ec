use anyhow::Context;
use appcast_gen::AppcastConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout only carries the result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppcastConfig::from_env();
    let path = appcast_gen::run(&config)
        .await
        .with_context(|| format!("generating appcast for {}", config.repo))?;

    println!("✅ Generated appcast.xml");
    println!("📝 Output: {}", path.display());

    Ok(())
}
