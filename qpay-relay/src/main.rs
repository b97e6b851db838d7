use qpay_relay::{config::Settings, startup::Application};
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("qpay-relay", "info,qpay_relay=debug", otlp_endpoint.as_deref());
    init_metrics()?;

    settings.log_summary();

    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
