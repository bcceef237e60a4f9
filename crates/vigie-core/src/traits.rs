use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::error::CheckError;

/// A single open page inside a browser session.
///
/// Every blocking point of a check run goes through this trait: navigation,
/// selector waits, fixed delays, the network-idle signal, and screenshots.
pub trait PageDriver: Send + Sync + Clone {
    /// Navigate the page to an absolute URL.
    fn goto(&self, url: &str) -> impl Future<Output = Result<(), CheckError>> + Send;

    /// Block until an element matching `selector` exists, or fail with
    /// [`CheckError::SelectorTimeout`] once `timeout` has elapsed.
    fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), CheckError>> + Send;

    /// Block until the page reports no in-flight network requests.
    fn wait_for_network_idle(&self) -> impl Future<Output = Result<(), CheckError>> + Send;

    /// Block for a fixed delay.
    fn wait(&self, delay: Duration) -> impl Future<Output = Result<(), CheckError>> + Send;

    /// Current document title.
    fn title(&self) -> impl Future<Output = Result<String, CheckError>> + Send;

    /// Number of elements currently matching `selector`.
    fn count(&self, selector: &str) -> impl Future<Output = Result<usize, CheckError>> + Send;

    /// Click the first element whose visible text contains `text`.
    fn click_text(&self, text: &str) -> impl Future<Output = Result<(), CheckError>> + Send;

    /// Capture a PNG screenshot to `path`, creating parent directories.
    fn screenshot(
        &self,
        path: &Path,
        full_page: bool,
    ) -> impl Future<Output = Result<(), CheckError>> + Send;
}

/// A browser process owned by one check run.
///
/// The runner guarantees `close` is called exactly once per run, on both the
/// success and the failure path.
pub trait BrowserSession: Send + Sync + Clone {
    type Page: PageDriver;

    /// Open a fresh page in this session.
    fn new_page(&self) -> impl Future<Output = Result<Self::Page, CheckError>> + Send;

    /// Shut the browser down and release its process.
    fn close(&self) -> impl Future<Output = Result<(), CheckError>> + Send;
}
