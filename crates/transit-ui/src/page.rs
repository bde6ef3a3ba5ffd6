//! Page model for the transit-time calculator.
//!
//! One declarative locator per logical UI region, and a fluent, stateless
//! per-call API over them. Every mutating method returns `&Self` so scenarios
//! read as a chain of form-filling steps; nothing is cached between calls.

use std::future::Future;

use crate::config::CalculatorConfig;
use crate::dropdown;
use crate::field;
use crate::interact;
use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, Locator};
use crate::submit::{submit_and_settle, SubmissionOutcome};
use crate::wait::{wait_for, Condition, ElementObservation};

/// Locator registry: one entry per region of the calculator's DOM.
pub mod locators {
    use crate::session::Locator;

    /// Root section of the calculator
    pub static SECTION_ROOT: Locator = Locator::new("calculator section", ".c-calculator");

    /// Origin country dropdown
    pub static ORIGIN_COUNTRY: Locator = Locator::new("origin country dropdown", "#origin-country");
    /// Origin postcode input
    pub static ORIGIN_POSTCODE: Locator =
        Locator::new("origin postcode input", "[data-di-id='#origin-postcode']");
    /// Validation message under the origin postcode field
    pub static ORIGIN_POSTCODE_ERROR: Locator =
        Locator::new("origin postcode error", "[class*='origin-zip-error']");

    /// Destination country dropdown
    pub static DESTINATION_COUNTRY: Locator =
        Locator::new("destination country dropdown", "#destination-country");
    /// Destination postcode input
    pub static DESTINATION_POSTCODE: Locator =
        Locator::new("destination postcode input", "[data-di-id='#destination-postcode']");
    /// Validation message under the destination postcode field
    pub static DESTINATION_POSTCODE_ERROR: Locator =
        Locator::new("destination postcode error", "[class*='destination-zip-error']");

    /// Calculate (submit) button
    pub static CALCULATE_BUTTON: Locator =
        Locator::new("calculate button", ".c-calculator button");
    /// Loading state of the calculate button
    pub static BUTTON_LOADER: Locator =
        Locator::new("calculate button loader", ".c-calculator button.is-loading");

    /// Lead-time result panel
    pub static RESULT_PANEL: Locator =
        Locator::new("result panel", ".js--leadtime--options-container");
    /// Overlay covering the calculator once results are shown
    pub static OVERLAY: Locator = Locator::new(
        "country selector overlay",
        ".c-calculator--countryselector-overlay",
    );
    /// Global retrieval error message
    pub static GLOBAL_ERROR: Locator = Locator::new(
        "global error message",
        ".c-calculator--error-message.js--freight-coutries-general-error-message",
    );

    /// Cookie-consent accept button (page chrome, not part of the form)
    pub static COOKIE_ACCEPT: Locator =
        Locator::new("cookie accept button", "#onetrust-accept-btn-handler");
}

/// Side of the form. Origin and destination are symmetric: one country
/// dropdown, one postcode input, one error region each, supporting identical
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSide {
    /// Where the shipment starts
    Origin,
    /// Where the shipment goes
    Destination,
}

impl FormSide {
    /// Country dropdown for this side.
    #[must_use]
    pub fn country(self) -> &'static Locator {
        match self {
            Self::Origin => &locators::ORIGIN_COUNTRY,
            Self::Destination => &locators::DESTINATION_COUNTRY,
        }
    }

    /// Postcode input for this side.
    #[must_use]
    pub fn postcode(self) -> &'static Locator {
        match self {
            Self::Origin => &locators::ORIGIN_POSTCODE,
            Self::Destination => &locators::DESTINATION_POSTCODE,
        }
    }

    /// Error region for this side.
    #[must_use]
    pub fn error(self) -> &'static Locator {
        match self {
            Self::Origin => &locators::ORIGIN_POSTCODE_ERROR,
            Self::Destination => &locators::DESTINATION_POSTCODE_ERROR,
        }
    }
}

/// Fluent page object over a [`BrowserSession`].
#[derive(Debug)]
pub struct CalculatorPage<S> {
    session: S,
    config: CalculatorConfig,
}

impl<S: BrowserSession> CalculatorPage<S> {
    /// Wrap an already-running session.
    pub fn new(session: S, config: CalculatorConfig) -> Self {
        Self { session, config }
    }

    /// The underlying session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// The configuration this page was built with.
    #[must_use]
    pub const fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Navigate to the calculator and wait for the root section to render.
    ///
    /// # Errors
    ///
    /// [`UiError::Navigation`] when the page loads but the calculator never
    /// appears; session faults pass through.
    pub async fn open(&self) -> UiResult<&Self> {
        tracing::info!(url = %self.config.base_url, "opening calculator");
        self.session.open(&self.config.base_url).await?;

        let observation = wait_for(
            &self.session,
            &locators::SECTION_ROOT,
            Condition::Visible,
            self.config.waits.default_profile(),
        )
        .await?;
        match observation {
            ElementObservation::Satisfied { .. } => Ok(self),
            ElementObservation::TimedOut => Err(UiError::Navigation {
                url: self.config.base_url.clone(),
                message: "calculator section never became visible".to_string(),
            }),
        }
    }

    /// Quick check that the calculator root is visible.
    pub async fn is_at(&self) -> UiResult<bool> {
        field::is_visible(
            &self.session,
            &locators::SECTION_ROOT,
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Dismiss the cookie-consent banner if it is present. Best-effort and
    /// non-blocking: a quick existence check first so an absent banner costs
    /// nothing, then a short clickable wait; every failure is swallowed.
    pub async fn dismiss_cookie_notice(&self) -> UiResult<&Self> {
        if self
            .session
            .query(locators::COOKIE_ACCEPT.selector())
            .await?
            .is_none()
        {
            return Ok(self);
        }

        let result = interact::click(
            &self.session,
            &locators::COOKIE_ACCEPT,
            self.config.waits.appear_profile(),
        )
        .await;
        if let Err(e) = result {
            // Present but not clickable; the banner does not block the form.
            tracing::warn!(error = %e, "could not dismiss cookie banner");
        }
        Ok(self)
    }

    /// Select a country (by code or visible label) on one side of the form.
    ///
    /// # Errors
    ///
    /// See [`dropdown::select`].
    pub async fn select_country(&self, side: FormSide, choice: &str) -> UiResult<&Self> {
        dropdown::select(
            &self.session,
            side.country(),
            choice,
            self.config.waits.default_profile(),
        )
        .await?;
        Ok(self)
    }

    /// Fill the postcode input on one side of the form (clear, then type).
    ///
    /// # Errors
    ///
    /// See [`field::set_text`].
    pub async fn type_postcode(&self, side: FormSide, postcode: &str) -> UiResult<&Self> {
        field::set_text(
            &self.session,
            side.postcode(),
            postcode,
            self.config.waits.default_profile(),
        )
        .await?;
        Ok(self)
    }

    /// Current value of a postcode input, for verifying a fill landed.
    pub async fn postcode_value(&self, side: FormSide) -> UiResult<String> {
        field::value(
            &self.session,
            side.postcode(),
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Click Calculate and wait until the network round-trip has settled.
    ///
    /// # Errors
    ///
    /// Only the click itself can fail; see [`submit_and_settle`].
    pub async fn calculate_and_settle(&self) -> UiResult<&Self> {
        submit_and_settle(
            &self.session,
            &locators::CALCULATE_BUTTON,
            &locators::BUTTON_LOADER,
            &self.config.waits,
        )
        .await?;
        Ok(self)
    }

    /// Validation text under one postcode field; empty when none is shown.
    pub async fn postcode_error(&self, side: FormSide) -> UiResult<String> {
        field::error_text(
            &self.session,
            side.error(),
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Whether the global retrieval error is visible.
    pub async fn global_error_visible(&self) -> UiResult<bool> {
        field::is_visible(
            &self.session,
            &locators::GLOBAL_ERROR,
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Text of the global retrieval error; empty when it is not shown.
    pub async fn global_error_text(&self) -> UiResult<String> {
        field::error_text(
            &self.session,
            &locators::GLOBAL_ERROR,
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Whether the lead-time result panel is visible.
    pub async fn result_visible(&self) -> UiResult<bool> {
        field::is_visible(
            &self.session,
            &locators::RESULT_PANEL,
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Whether the overlay covering the calculator is visible.
    pub async fn overlay_visible(&self) -> UiResult<bool> {
        field::is_visible(
            &self.session,
            &locators::OVERLAY,
            self.config.waits.default_profile(),
        )
        .await
    }

    /// Classify the page state after a settled submission.
    ///
    /// Probes each region with the short profile: after
    /// [`Self::calculate_and_settle`] the final state is either already
    /// readable or will not arrive at all. Neither result nor any error
    /// within the budget is reported as
    /// [`SubmissionOutcome::Indeterminate`], never silently as success.
    pub async fn outcome(&self) -> UiResult<SubmissionOutcome> {
        let probe = self.config.waits.appear_profile();

        if field::is_visible(&self.session, &locators::RESULT_PANEL, probe).await? {
            return Ok(SubmissionOutcome::ResultShown);
        }
        if field::is_visible(&self.session, &locators::GLOBAL_ERROR, probe).await? {
            return Ok(SubmissionOutcome::GlobalError {
                text: field::error_text(&self.session, &locators::GLOBAL_ERROR, probe).await?,
            });
        }

        let origin = field::error_text(&self.session, FormSide::Origin.error(), probe).await?;
        let destination =
            field::error_text(&self.session, FormSide::Destination.error(), probe).await?;
        if !origin.is_empty() || !destination.is_empty() {
            return Ok(SubmissionOutcome::FieldErrors {
                origin,
                destination,
            });
        }

        Ok(SubmissionOutcome::Indeterminate)
    }

    /// End the underlying session.
    ///
    /// # Errors
    ///
    /// Session faults from the browser teardown.
    pub async fn quit(&self) -> UiResult<()> {
        self.session.quit().await
    }
}

/// Run a scenario against a page with guaranteed session teardown.
///
/// The session is quit on every exit path: scenario success, scenario error,
/// and wait timeouts that surfaced as errors. A scenario error wins over a
/// teardown error.
///
/// # Errors
///
/// Whatever the scenario returned; otherwise any teardown failure.
pub async fn with_page<'a, S, F, Fut, T>(page: &'a CalculatorPage<S>, scenario: F) -> UiResult<T>
where
    S: BrowserSession,
    F: FnOnce(&'a CalculatorPage<S>) -> Fut,
    Fut: Future<Output = UiResult<T>> + 'a,
{
    let outcome = scenario(page).await;
    let teardown = page.quit().await;

    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(teardown_err)) => Err(teardown_err),
        (Err(scenario_err), _) => Err(scenario_err),
    }
}
