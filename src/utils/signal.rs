use tokio::signal;

/// Resolves on Ctrl+C, axum then drains in-flight requests.
pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received, shutting down.");
}
