pub mod error;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod testutil;
pub mod traits;

pub use error::CheckError;
pub use runner::{
    CheckEvent, CheckReporter, CheckRunner, ConsoleReporter, RunConfig, RunOutcome,
    TracingReporter,
};
pub use scenario::{Scenario, Step};
pub use traits::{BrowserSession, PageDriver};
