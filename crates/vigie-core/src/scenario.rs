/// One blocking operation in a check run.
///
/// A scenario is a flat list of these; there is no branching and no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Navigate to a path resolved against the run's base URL.
    Goto(String),
    /// Wait for `selector` to appear, failing after `timeout_ms`.
    WaitForSelector { selector: String, timeout_ms: u64 },
    /// Wait for the page's network-idle signal.
    WaitForNetworkIdle,
    /// Fixed delay.
    Pause { ms: u64 },
    /// Read the document title and report it.
    ReadTitle,
    /// Report whether any element matches `selector`, without failing the run.
    Probe { label: String, selector: String },
    /// Click the first element whose visible text contains `text`.
    ClickText { text: String },
    /// Capture a screenshot to `file`, resolved against the run's output dir.
    Screenshot { file: String, full_page: bool },
}

/// A named, fixed sequence of steps.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn goto(mut self, path: impl Into<String>) -> Self {
        self.steps.push(Step::Goto(path.into()));
        self
    }

    pub fn wait_for_selector(mut self, selector: impl Into<String>, timeout_ms: u64) -> Self {
        self.steps.push(Step::WaitForSelector {
            selector: selector.into(),
            timeout_ms,
        });
        self
    }

    pub fn wait_for_network_idle(mut self) -> Self {
        self.steps.push(Step::WaitForNetworkIdle);
        self
    }

    pub fn pause(mut self, ms: u64) -> Self {
        self.steps.push(Step::Pause { ms });
        self
    }

    pub fn read_title(mut self) -> Self {
        self.steps.push(Step::ReadTitle);
        self
    }

    pub fn probe(mut self, label: impl Into<String>, selector: impl Into<String>) -> Self {
        self.steps.push(Step::Probe {
            label: label.into(),
            selector: selector.into(),
        });
        self
    }

    pub fn click_text(mut self, text: impl Into<String>) -> Self {
        self.steps.push(Step::ClickText { text: text.into() });
        self
    }

    pub fn screenshot(mut self, file: impl Into<String>) -> Self {
        self.steps.push(Step::Screenshot {
            file: file.into(),
            full_page: false,
        });
        self
    }

    pub fn screenshot_full_page(mut self, file: impl Into<String>) -> Self {
        self.steps.push(Step::Screenshot {
            file: file.into(),
            full_page: true,
        });
        self
    }

    /// Screenshot file names this scenario produces, in order.
    pub fn screenshot_files(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::Screenshot { file, .. } => Some(file.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_step_order() {
        let scenario = Scenario::new("demo")
            .goto("/")
            .wait_for_selector("body", 5_000)
            .screenshot("demo.png");

        assert_eq!(scenario.name, "demo");
        assert_eq!(
            scenario.steps,
            vec![
                Step::Goto("/".into()),
                Step::WaitForSelector {
                    selector: "body".into(),
                    timeout_ms: 5_000,
                },
                Step::Screenshot {
                    file: "demo.png".into(),
                    full_page: false,
                },
            ]
        );
    }

    #[test]
    fn screenshot_files_lists_only_screenshots() {
        let scenario = Scenario::new("demo")
            .goto("/")
            .screenshot("a.png")
            .pause(100)
            .screenshot_full_page("b.png");

        assert_eq!(scenario.screenshot_files(), vec!["a.png", "b.png"]);
    }
}
