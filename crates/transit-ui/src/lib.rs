//! Transit-UI: page model and test harness for the road-freight transit-time
//! calculator.
//!
//! The calculator is a third-party, dynamically loading web form: field
//! validation, a loading indicator on the submit button, a success overlay
//! and a global retrieval error all appear asynchronously. The hard part of
//! testing it is not the assertions but the synchronization layer, so that
//! layer is the core of this crate:
//!
//! - [`wait`]: bounded polling against the live DOM, re-resolving locators
//!   on every poll
//! - [`interact`]: reliable clicking (scroll into view, re-check, click)
//! - [`dropdown`]: native-`<select>` vs custom-popup selection, classified
//!   fresh per call
//! - [`field`]: total reads and fail-loud writes on inputs and messages
//! - [`submit`]: submit-and-settle as one atomic step
//! - [`page`]: the fluent page object and its locator registry
//!
//! Sessions implement [`session::BrowserSession`]; a scripted in-memory
//! calculator lives in [`mock`] so the whole suite runs deterministically on
//! a paused tokio clock, and a real Chrome session is available behind the
//! `browser` feature.

#![warn(missing_docs)]

pub mod config;
pub mod dropdown;
pub mod field;
pub mod fixtures;
pub mod interact;
pub mod mock;
pub mod page;
pub mod result;
pub mod session;
pub mod submit;
pub mod wait;

#[cfg(feature = "browser")]
pub mod chrome;

pub use config::{CalculatorConfig, WaitTimeouts, DEFAULT_BASE_URL};
pub use page::{locators, with_page, CalculatorPage, FormSide};
pub use result::{UiError, UiResult};
pub use session::{BrowserSession, ElementSnapshot, Locator};
pub use submit::{SettlePhase, SubmissionOutcome};
pub use wait::{Condition, ElementObservation, WaitProfile};

#[cfg(feature = "browser")]
pub use chrome::{with_chrome, ChromeSession};
