use std::path::Path;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Flags for running Chromium inside containers and CI runners.
const CHROME_ARGS: [&str; 3] = ["--no-sandbox", "--disable-gpu", "--disable-dev-shm-usage"];

/// Launch a headless browser and navigate a fresh page to `url`.
pub async fn launch_headless_browser(
    url: &str,
    chrome_executable: Option<&Path>,
) -> Result<(Browser, Page)> {
    info!("launching headless browser");
    debug!(url, ?chrome_executable, "browser target");

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .args(CHROME_ARGS.to_vec());
    if let Some(exe) = chrome_executable {
        builder = builder.chrome_executable(exe);
    }
    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to configure headless browser: {e}"))?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .context("failed to launch headless browser")?;
    debug!("headless browser started");

    // Drain CDP events for the lifetime of the browser.
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    // Short pause to let the browser state settle before opening the page.
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = match browser.new_page(url).await {
        Ok(page) => page,
        Err(e) => {
            // No page means no run; don't leave the browser process behind.
            shutdown(&mut browser).await;
            return Err(e).with_context(|| format!("failed to open {url}"));
        }
    };

    info!(url, "browser ready");
    Ok((browser, page))
}

/// Close the browser and reap its process, logging rather than propagating
/// failures so shutdown can run on error paths.
pub async fn shutdown_browser(mut browser: Browser) {
    shutdown(&mut browser).await;
}

async fn shutdown(browser: &mut Browser) {
    if let Err(e) = browser.close().await {
        warn!(error = %e, "browser did not close cleanly");
    }
    if let Err(e) = browser.wait().await {
        warn!(error = %e, "failed to reap browser process");
    }
    debug!("browser shut down");
}
