//! Test utilities: mock implementations of the session and page traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::CheckError;
use crate::runner::{CheckEvent, CheckReporter};
use crate::traits::{BrowserSession, PageDriver};

// ---------------------------------------------------------------------------
// MockPage
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockPageState {
    calls: Vec<String>,
    fail_at: Option<(String, CheckError)>,
    title: String,
    count: usize,
}

/// Mock page that records every operation and can fail at a chosen one.
#[derive(Clone, Default)]
pub struct MockPage {
    state: Arc<Mutex<MockPageState>>,
}

impl MockPage {
    /// Page where every operation succeeds.
    pub fn ok() -> Self {
        let page = Self::default();
        page.state.lock().unwrap().count = 1;
        page
    }

    /// Fail the first call to `operation` with `error`; later calls succeed.
    pub fn failing_at(self, operation: &str, error: CheckError) -> Self {
        self.state.lock().unwrap().fail_at = Some((operation.to_string(), error));
        self
    }

    pub fn with_title(self, title: &str) -> Self {
        self.state.lock().unwrap().title = title.to_string();
        self
    }

    /// Number of matches every `count` call reports.
    pub fn with_count(self, count: usize) -> Self {
        self.state.lock().unwrap().count = count;
        self
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, operation: &str) -> Result<(), CheckError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.to_string());
        if state
            .fail_at
            .as_ref()
            .is_some_and(|(op, _)| op.as_str() == operation)
        {
            let (_, error) = state.fail_at.take().unwrap();
            return Err(error);
        }
        Ok(())
    }
}

impl PageDriver for MockPage {
    async fn goto(&self, _url: &str) -> Result<(), CheckError> {
        self.record("goto")
    }

    async fn wait_for_selector(
        &self,
        _selector: &str,
        _timeout: Duration,
    ) -> Result<(), CheckError> {
        self.record("wait_for_selector")
    }

    async fn wait_for_network_idle(&self) -> Result<(), CheckError> {
        self.record("wait_for_network_idle")
    }

    async fn wait(&self, _delay: Duration) -> Result<(), CheckError> {
        self.record("wait")
    }

    async fn title(&self) -> Result<String, CheckError> {
        self.record("title")?;
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn count(&self, _selector: &str) -> Result<usize, CheckError> {
        self.record("count")?;
        Ok(self.state.lock().unwrap().count)
    }

    async fn click_text(&self, _text: &str) -> Result<(), CheckError> {
        self.record("click_text")
    }

    async fn screenshot(&self, _path: &Path, _full_page: bool) -> Result<(), CheckError> {
        self.record("screenshot")
    }
}

// ---------------------------------------------------------------------------
// MockSession
// ---------------------------------------------------------------------------

/// Mock session handing out a shared [`MockPage`] and counting `close` calls.
#[derive(Clone)]
pub struct MockSession {
    page: MockPage,
    close_calls: Arc<Mutex<usize>>,
    new_page_error: Arc<Mutex<Option<CheckError>>>,
    close_error: Arc<Mutex<Option<CheckError>>>,
}

impl MockSession {
    pub fn new(page: MockPage) -> Self {
        Self {
            page,
            close_calls: Arc::new(Mutex::new(0)),
            new_page_error: Arc::new(Mutex::new(None)),
            close_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Session whose `new_page` fails once with `error`.
    pub fn with_new_page_error(self, error: CheckError) -> Self {
        *self.new_page_error.lock().unwrap() = Some(error);
        self
    }

    /// Session whose `close` fails once with `error` (still counted).
    pub fn with_close_error(self, error: CheckError) -> Self {
        *self.close_error.lock().unwrap() = Some(error);
        self
    }

    /// How many times `close` has been called.
    pub fn close_calls(&self) -> usize {
        *self.close_calls.lock().unwrap()
    }
}

impl BrowserSession for MockSession {
    type Page = MockPage;

    async fn new_page(&self) -> Result<MockPage, CheckError> {
        if let Some(e) = self.new_page_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.page.clone())
    }

    async fn close(&self) -> Result<(), CheckError> {
        *self.close_calls.lock().unwrap() += 1;
        if let Some(e) = self.close_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockReporter
// ---------------------------------------------------------------------------

/// Mock reporter that records event labels.
#[derive(Default)]
pub struct MockReporter {
    labels: Arc<Mutex<Vec<String>>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl CheckReporter for MockReporter {
    fn report(&self, event: CheckEvent<'_>) {
        let label = match &event {
            CheckEvent::ScenarioStarted { .. } => "ScenarioStarted",
            CheckEvent::Navigating { .. } => "Navigating",
            CheckEvent::SelectorVisible { .. } => "SelectorVisible",
            CheckEvent::NetworkIdle => "NetworkIdle",
            CheckEvent::TitleRead { .. } => "TitleRead",
            CheckEvent::ProbeResult { .. } => "ProbeResult",
            CheckEvent::Clicked { .. } => "Clicked",
            CheckEvent::ScreenshotTaken { .. } => "ScreenshotTaken",
            CheckEvent::Failed { .. } => "Failed",
            CheckEvent::SessionClosed => "SessionClosed",
            CheckEvent::ScenarioFinished { .. } => "ScenarioFinished",
        };
        self.labels.lock().unwrap().push(label.to_string());
    }
}
