//! Headless-browser plumbing and the prediction-form protocol.

mod headless;
mod session;

pub use headless::{launch_headless_browser, shutdown_browser};
pub use session::{Geno2PhenoForm, Locators, SubmissionForm};
