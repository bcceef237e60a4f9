use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::CheckError;
use crate::scenario::{Scenario, Step};
use crate::traits::{BrowserSession, PageDriver};

/// Targets of a check run: where the frontend lives and where screenshots go.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: Url,
    pub out_dir: PathBuf,
}

impl RunConfig {
    pub fn new(base_url: Url, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url,
            out_dir: out_dir.into(),
        }
    }

    /// Resolve a scenario path against the base URL.
    pub fn page_url(&self, path: &str) -> Result<Url, CheckError> {
        Ok(self.base_url.join(path)?)
    }

    /// Resolve a screenshot file name against the output directory.
    pub fn screenshot_path(&self, file: &str) -> PathBuf {
        self.out_dir.join(file)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:3000").expect("valid default URL"),
            out_dir: PathBuf::from("verification"),
        }
    }
}

/// Events emitted by the runner for monitoring/logging.
#[derive(Debug, Clone)]
pub enum CheckEvent<'a> {
    ScenarioStarted { name: &'a str },
    Navigating { url: &'a str },
    SelectorVisible { selector: &'a str },
    NetworkIdle,
    TitleRead { title: &'a str },
    ProbeResult { label: &'a str, found: bool },
    Clicked { text: &'a str },
    ScreenshotTaken { path: &'a Path },
    Failed { error: &'a str },
    SessionClosed,
    ScenarioFinished { name: &'a str, passed: bool },
}

/// Trait for receiving check events (decoupled logging).
pub trait CheckReporter: Send + Sync {
    fn report(&self, event: CheckEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl CheckReporter for TracingReporter {
    fn report(&self, event: CheckEvent<'_>) {
        match event {
            CheckEvent::ScenarioStarted { name } => {
                tracing::info!(%name, "Scenario started");
            }
            CheckEvent::Navigating { url } => {
                tracing::info!(%url, "Navigating");
            }
            CheckEvent::SelectorVisible { selector } => {
                tracing::debug!(%selector, "Selector visible");
            }
            CheckEvent::NetworkIdle => {
                tracing::debug!("Network idle");
            }
            CheckEvent::TitleRead { title } => {
                tracing::info!(%title, "Page title");
            }
            CheckEvent::ProbeResult { label, found } => {
                tracing::info!(%label, %found, "Probe result");
            }
            CheckEvent::Clicked { text } => {
                tracing::info!(%text, "Clicked element");
            }
            CheckEvent::ScreenshotTaken { path } => {
                tracing::info!(path = %path.display(), "Screenshot taken");
            }
            CheckEvent::Failed { error } => {
                tracing::warn!(%error, "Scenario step failed");
            }
            CheckEvent::SessionClosed => {
                tracing::debug!("Browser session closed");
            }
            CheckEvent::ScenarioFinished { name, passed } => {
                tracing::info!(%name, %passed, "Scenario finished");
            }
        }
    }
}

/// Reporter that prints the human-readable progress lines of a run.
///
/// This is the console surface of the tool: one line per visible action,
/// `Error: ...` on the first failing step, nothing on waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl CheckReporter for ConsoleReporter {
    fn report(&self, event: CheckEvent<'_>) {
        match event {
            CheckEvent::ScenarioStarted { name } => println!("Running '{name}' checks..."),
            CheckEvent::Navigating { url } => println!("Navigating to {url} ..."),
            CheckEvent::TitleRead { title } => println!("Page title: {title}"),
            CheckEvent::ProbeResult { label, found } => {
                if found {
                    println!("{label} found.");
                } else {
                    println!("{label} NOT found.");
                }
            }
            CheckEvent::Clicked { text } => println!("Clicked '{text}'."),
            CheckEvent::ScreenshotTaken { path } => {
                println!("Screenshot captured: {}", path.display());
            }
            CheckEvent::Failed { error } => println!("Error: {error}"),
            CheckEvent::SelectorVisible { .. }
            | CheckEvent::NetworkIdle
            | CheckEvent::SessionClosed
            | CheckEvent::ScenarioFinished { .. } => {}
        }
    }
}

/// What a run produced. The process exit code does not depend on it; the
/// screenshots and console lines are the verification artifacts.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub scenario: String,
    pub error: Option<String>,
    pub screenshots: Vec<PathBuf>,
}

impl RunOutcome {
    fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            error: None,
            screenshots: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Executes a [`Scenario`] against one browser session.
///
/// The step sequence stops at the first error; the error is reported and
/// swallowed, and the session is closed exactly once in every case.
pub struct CheckRunner<S: BrowserSession> {
    session: S,
    config: RunConfig,
}

impl<S: BrowserSession> CheckRunner<S> {
    pub fn new(session: S, config: RunConfig) -> Self {
        Self { session, config }
    }

    /// Run the scenario to completion or first failure, then close the session.
    pub async fn run<R: CheckReporter>(&self, scenario: &Scenario, reporter: &R) -> RunOutcome {
        reporter.report(CheckEvent::ScenarioStarted {
            name: &scenario.name,
        });

        let mut outcome = RunOutcome::new(&scenario.name);
        if let Err(e) = self.execute(scenario, reporter, &mut outcome).await {
            let message = e.to_string();
            reporter.report(CheckEvent::Failed { error: &message });
            outcome.error = Some(message);
        }

        // Cleanup runs on both paths; a close failure never masks the outcome.
        if let Err(e) = self.session.close().await {
            tracing::warn!(error = %e, "Failed to close browser session");
        }
        reporter.report(CheckEvent::SessionClosed);
        reporter.report(CheckEvent::ScenarioFinished {
            name: &scenario.name,
            passed: outcome.passed(),
        });

        outcome
    }

    async fn execute<R: CheckReporter>(
        &self,
        scenario: &Scenario,
        reporter: &R,
        outcome: &mut RunOutcome,
    ) -> Result<(), CheckError> {
        let page = self.session.new_page().await?;
        for step in &scenario.steps {
            self.apply(&page, step, reporter, outcome).await?;
        }
        Ok(())
    }

    async fn apply<R: CheckReporter>(
        &self,
        page: &S::Page,
        step: &Step,
        reporter: &R,
        outcome: &mut RunOutcome,
    ) -> Result<(), CheckError> {
        match step {
            Step::Goto(path) => {
                let url = self.config.page_url(path)?;
                reporter.report(CheckEvent::Navigating { url: url.as_str() });
                page.goto(url.as_str()).await?;
            }
            Step::WaitForSelector {
                selector,
                timeout_ms,
            } => {
                page.wait_for_selector(selector, Duration::from_millis(*timeout_ms))
                    .await?;
                reporter.report(CheckEvent::SelectorVisible { selector });
            }
            Step::WaitForNetworkIdle => {
                page.wait_for_network_idle().await?;
                reporter.report(CheckEvent::NetworkIdle);
            }
            Step::Pause { ms } => {
                page.wait(Duration::from_millis(*ms)).await?;
            }
            Step::ReadTitle => {
                let title = page.title().await?;
                reporter.report(CheckEvent::TitleRead { title: &title });
            }
            Step::Probe { label, selector } => {
                let found = page.count(selector).await? > 0;
                reporter.report(CheckEvent::ProbeResult { label, found });
            }
            Step::ClickText { text } => {
                page.click_text(text).await?;
                reporter.report(CheckEvent::Clicked { text });
            }
            Step::Screenshot { file, full_page } => {
                let path = self.config.screenshot_path(file);
                page.screenshot(&path, *full_page).await?;
                reporter.report(CheckEvent::ScreenshotTaken { path: &path });
                outcome.screenshots.push(path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;
    use crate::testutil::*;

    fn config() -> RunConfig {
        RunConfig::default()
    }

    #[test]
    fn page_url_joins_paths() {
        let config = config();
        assert_eq!(
            config.page_url("/admin").unwrap().as_str(),
            "http://localhost:3000/admin"
        );
        assert_eq!(
            config.page_url("/non-existent-page").unwrap().as_str(),
            "http://localhost:3000/non-existent-page"
        );
    }

    #[tokio::test]
    async fn successful_run_closes_session_once() {
        let session = MockSession::new(MockPage::ok());
        let runner = CheckRunner::new(session.clone(), config());
        let reporter = MockReporter::new();

        let outcome = runner.run(&scenarios::frontend(), &reporter).await;

        assert!(outcome.passed());
        assert_eq!(session.close_calls(), 1);
        assert_eq!(outcome.screenshots.len(), 2);
        assert!(outcome.screenshots[0].ends_with("verification/home.png"));
        assert!(outcome.screenshots[1].ends_with("verification/admin_login.png"));
    }

    #[tokio::test]
    async fn selector_timeout_reports_error_and_still_closes() {
        // Empty root page: the map container class never appears.
        let page = MockPage::ok().failing_at(
            "wait_for_selector",
            CheckError::SelectorTimeout {
                selector: ".leaflet-container".into(),
                timeout_ms: 10_000,
            },
        );
        let session = MockSession::new(page.clone());
        let runner = CheckRunner::new(session.clone(), config());
        let reporter = MockReporter::new();

        let outcome = runner.run(&scenarios::frontend(), &reporter).await;

        assert!(!outcome.passed());
        assert!(outcome.error.as_deref().unwrap().contains("timeout"));
        assert_eq!(session.close_calls(), 1);

        // Nothing ran past the failing wait: one goto, one wait, no screenshot.
        assert_eq!(page.calls(), vec!["goto", "wait_for_selector"]);
        assert!(outcome.screenshots.is_empty());
        assert!(reporter.labels().contains(&"Failed".to_string()));
    }

    #[tokio::test]
    async fn unreachable_host_is_caught_not_propagated() {
        let page = MockPage::ok().failing_at(
            "goto",
            CheckError::Navigation("net::ERR_CONNECTION_REFUSED".into()),
        );
        let session = MockSession::new(page);
        let runner = CheckRunner::new(session.clone(), config());
        let reporter = MockReporter::new();

        let outcome = runner.run(&scenarios::changes(), &reporter).await;

        assert!(!outcome.passed());
        assert!(
            outcome
                .error
                .as_deref()
                .unwrap()
                .contains("ERR_CONNECTION_REFUSED")
        );
        assert_eq!(session.close_calls(), 1);
    }

    #[tokio::test]
    async fn page_open_failure_still_closes_session() {
        let session = MockSession::new(MockPage::ok())
            .with_new_page_error(CheckError::Browser("no such target".into()));
        let runner = CheckRunner::new(session.clone(), config());

        let outcome = runner.run(&scenarios::tiles(), &MockReporter::new()).await;

        assert!(!outcome.passed());
        assert_eq!(session.close_calls(), 1);
    }

    #[tokio::test]
    async fn close_failure_does_not_fail_a_passing_run() {
        let session = MockSession::new(MockPage::ok())
            .with_close_error(CheckError::Browser("process already gone".into()));
        let runner = CheckRunner::new(session.clone(), config());

        let outcome = runner.run(&scenarios::changes(), &MockReporter::new()).await;

        assert!(outcome.passed());
        assert_eq!(session.close_calls(), 1);
    }

    #[tokio::test]
    async fn tiles_run_produces_the_modal_screenshot_after_the_click() {
        let page = MockPage::ok().with_title("Lumières de Paris");
        let session = MockSession::new(page.clone());
        let runner = CheckRunner::new(session, config());
        let reporter = MockReporter::new();

        let outcome = runner.run(&scenarios::tiles(), &reporter).await;

        assert!(outcome.passed());
        assert!(
            outcome
                .screenshots
                .iter()
                .any(|p| p.ends_with("verification/modal_view.png"))
        );
        assert_eq!(
            page.calls(),
            vec![
                "goto",
                "wait_for_network_idle",
                "title",
                "screenshot",
                "click_text",
                "wait",
                "screenshot",
            ]
        );
        let labels = reporter.labels();
        assert!(labels.contains(&"TitleRead".to_string()));
        assert!(labels.contains(&"Clicked".to_string()));
    }

    #[tokio::test]
    async fn probe_miss_does_not_fail_the_run() {
        let page = MockPage::ok().with_count(0);
        let session = MockSession::new(page);
        let runner = CheckRunner::new(session.clone(), config());
        let reporter = MockReporter::new();

        let outcome = runner.run(&scenarios::changes(), &reporter).await;

        assert!(outcome.passed());
        assert_eq!(session.close_calls(), 1);
        assert!(reporter.labels().contains(&"ProbeResult".to_string()));
    }
}
