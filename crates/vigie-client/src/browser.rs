use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use vigie_core::error::CheckError;
use vigie_core::traits::{BrowserSession, PageDriver};

/// How often a selector wait re-queries the DOM.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Headless-browser session using Chromium via the Chrome DevTools Protocol.
///
/// One Chromium process backs the session; pages are opened on demand and
/// the whole process is torn down by [`BrowserSession::close`]. Closing is
/// idempotent so a second call is a no-op, but the check runner only ever
/// closes once per run.
#[derive(Clone)]
pub struct ChromiumSession {
    browser: Arc<tokio::sync::Mutex<Option<Browser>>>,
    nav_timeout: Duration,
}

impl ChromiumSession {
    /// Launches a headless Chromium with a **30 s** navigation timeout.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH` (or the
    /// default locations checked by `chromiumoxide`).
    pub async fn launch() -> Result<Self, CheckError> {
        Self::launch_with_timeout(Duration::from_secs(30)).await
    }

    /// Launches a headless Chromium with a custom navigation timeout.
    pub async fn launch_with_timeout(nav_timeout: Duration) -> Result<Self, CheckError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        // Snap-packaged Chromium exposes a wrapper that rejects standard
        // Chrome CLI flags (--headless, --disable-gpu, …).  We try to
        // locate the *real* binary buried inside the snap, falling back
        // to any other Chrome/Chromium the user may have installed.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .build()
            .map_err(|e| CheckError::Browser(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CheckError::Browser(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to
        // work; the stream ends when the browser process goes away.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Arc::new(tokio::sync::Mutex::new(Some(browser))),
            nav_timeout,
        })
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// On systems where Chromium is installed via **snap**, the wrapper at
    /// `/snap/bin/chromium` strips unknown CLI flags, breaking headless mode.
    /// We look for the real binary inside the snap first, then fall back to
    /// well-known system paths.  If nothing is found we return `None` and let
    /// `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            // Snap (Ubuntu default)
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            // Flatpak
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            // Common apt / manual installs
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        // Also honour an explicit override via env var.
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }
}

impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage, CheckError> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| CheckError::Browser("session already closed".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CheckError::Browser(format!("Failed to open page: {e}")))?;

        Ok(ChromiumPage {
            page,
            nav_timeout: self.nav_timeout,
        })
    }

    async fn close(&self) -> Result<(), CheckError> {
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            browser
                .close()
                .await
                .map_err(|e| CheckError::Browser(format!("Failed to close browser: {e}")))?;
            // Reap the Chromium process so nothing is left orphaned.
            let _ = browser.wait().await;
        }
        Ok(())
    }
}

/// One open tab, implementing the blocking operations of a check run.
#[derive(Clone)]
pub struct ChromiumPage {
    page: Page,
    nav_timeout: Duration,
}

impl PageDriver for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), CheckError> {
        let result = tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await;
        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(CheckError::Navigation(format!(
                "Failed to navigate to {url}: {e}"
            ))),
            Err(_) => Err(CheckError::Navigation(format!(
                "timeout navigating to {url} after {} s",
                self.nav_timeout.as_secs()
            ))),
        }
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CheckError> {
        let start = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                tracing::debug!(%selector, elapsed_ms = start.elapsed().as_millis() as u64, "Selector appeared");
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(CheckError::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn wait_for_network_idle(&self) -> Result<(), CheckError> {
        // Resolves once the page has loaded and the network has quiesced;
        // errors here (e.g. no navigation in flight) are not failures.
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn wait(&self, delay: Duration) -> Result<(), CheckError> {
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn title(&self) -> Result<String, CheckError> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| CheckError::Browser(format!("Failed to read title: {e}")))?;
        Ok(title.unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize, CheckError> {
        // A selector matching nothing is a count of zero, not an error.
        Ok(self
            .page
            .find_elements(selector)
            .await
            .map(|elements| elements.len())
            .unwrap_or(0))
    }

    async fn click_text(&self, text: &str) -> Result<(), CheckError> {
        // Click the first element whose own text contains the needle, the
        // way a user would click a tile caption.
        let needle =
            serde_json::to_string(text).map_err(|e| CheckError::Generic(e.to_string()))?;
        let expression = format!(
            r#"(() => {{
                const needle = {needle};
                const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);
                while (walker.nextNode()) {{
                    const node = walker.currentNode;
                    if (node.nodeValue && node.nodeValue.includes(needle) && node.parentElement) {{
                        node.parentElement.click();
                        return true;
                    }}
                }}
                return false;
            }})()"#
        );

        let clicked = self
            .page
            .evaluate(expression)
            .await
            .map_err(|e| CheckError::Browser(format!("Failed to click '{text}': {e}")))?
            .into_value::<bool>()
            .unwrap_or(false);

        if clicked {
            Ok(())
        } else {
            Err(CheckError::ElementNotFound(format!(
                "element with text '{text}'"
            )))
        }
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<(), CheckError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(full_page)
                    .build(),
            )
            .await
            .map_err(|e| CheckError::Screenshot(e.to_string()))?;

        tokio::fs::write(path, &bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Screenshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_binary_probe_only_returns_existing_paths() {
        if let Some(path) = ChromiumSession::find_chrome_binary() {
            assert!(path.exists());
        }
    }
}
