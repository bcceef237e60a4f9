/// Smoke-test for `ChromiumSession`.
///
/// Launches a headless Chromium, opens <https://example.com>, waits for the
/// `<h1>` to appear, and writes a screenshot to the system temp directory.
///
/// Run with:
///   cargo run --example browser_smoke
use std::time::Duration;

use vigie_client::ChromiumSession;
use vigie_core::traits::{BrowserSession, PageDriver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let session = ChromiumSession::launch().await?;

    let result = run(&session).await;

    // Cleanup runs whether or not the sequence above failed.
    session.close().await?;
    result
}

async fn run(session: &ChromiumSession) -> anyhow::Result<()> {
    let page = session.new_page().await?;

    let url = "https://example.com";
    println!("Navigating to {url} …");
    page.goto(url).await?;
    page.wait_for_selector("h1", Duration::from_secs(10)).await?;

    let shot = std::env::temp_dir().join("vigie_browser_smoke.png");
    page.screenshot(&shot, false).await?;

    let size = std::fs::metadata(&shot)?.len();
    anyhow::ensure!(size > 0, "screenshot file is empty");
    println!("OK — wrote {} bytes to {}", size, shot.display());
    Ok(())
}
