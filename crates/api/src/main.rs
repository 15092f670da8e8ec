use anyhow::Context;

use kindaebay_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kindaebay_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = kindaebay_api::app::build_app(&config).context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        email_domain = %config.registration.email_domain,
        labels = config.label_vocabulary.as_str(),
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
