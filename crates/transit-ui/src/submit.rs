//! Submission and network settling as one atomic step.
//!
//! Reading the page while a request is still in flight is the single biggest
//! source of flakiness in this suite's history, so "click submit" and "wait
//! for the settle signal" are never offered separately.

use crate::config::WaitTimeouts;
use crate::interact;
use crate::result::UiResult;
use crate::session::{BrowserSession, Locator};
use crate::wait::{wait_for, Condition, ElementObservation};

/// Progression of one submission through its loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePhase {
    /// Nothing submitted yet
    Idle,
    /// Submit clicked, short wait for the indicator to render
    AwaitingLoaderAppear,
    /// Long wait for the indicator to clear again
    AwaitingLoaderDisappear,
    /// Transient loading UI is done; final state is readable
    Settled,
}

/// Final page state after a settled submission, as the test layer reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The lead-time result panel became visible
    ResultShown,
    /// Per-field validation fired
    FieldErrors {
        /// Error text under the origin postcode field
        origin: String,
        /// Error text under the destination postcode field
        destination: String,
    },
    /// The global retrieval error became visible
    GlobalError {
        /// Its message text
        text: String,
    },
    /// Neither a result nor any error became visible before the probe
    /// budget ran out. A detectable failure condition, not a success.
    Indeterminate,
}

/// Click `submit` and wait for the network round-trip to settle.
///
/// After the click, the loading indicator gets `loader_appear` to render; a
/// backend that answers fast enough may remove it before it ever shows, so
/// that timeout is swallowed. The indicator then gets `loader_settle` to
/// clear; that timeout is swallowed too, deferring the pass/fail verdict to
/// whatever the caller inspects next. Once the click has landed this always
/// returns.
///
/// # Errors
///
/// Only the submit click itself can fail, as [`crate::result::UiError::Interaction`],
/// or a session fault while polling the indicator.
pub async fn submit_and_settle<S: BrowserSession>(
    session: &S,
    submit: &Locator,
    loader: &Locator,
    waits: &WaitTimeouts,
) -> UiResult<()> {
    interact::click(session, submit, waits.default_profile()).await?;

    let mut phase = SettlePhase::AwaitingLoaderAppear;
    tracing::debug!(?phase, loader = %loader, "submitted");

    match wait_for(session, loader, Condition::Visible, waits.appear_profile()).await? {
        ElementObservation::Satisfied { .. } => {
            tracing::debug!(loader = %loader, "loading indicator appeared");
        }
        ElementObservation::TimedOut => {
            // Fast backend answer; the indicator was gone before it rendered.
            tracing::debug!(loader = %loader, "loading indicator never appeared");
        }
    }

    phase = SettlePhase::AwaitingLoaderDisappear;
    tracing::debug!(?phase, "waiting for the loading indicator to clear");

    match wait_for(session, loader, Condition::Invisible, waits.settle_profile()).await? {
        ElementObservation::Satisfied { .. } => {}
        ElementObservation::TimedOut => {
            // A stuck indicator is left for the caller's state probe to
            // classify (it resolves to SubmissionOutcome::Indeterminate).
            tracing::warn!(
                loader = %loader,
                timeout_ms = waits.loader_settle.as_millis() as u64,
                "loading indicator still visible after the settle budget"
            );
        }
    }

    phase = SettlePhase::Settled;
    tracing::debug!(?phase, "submission settled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::mock::{LoaderBehavior, MockCalculator};
    use crate::page::locators;

    async fn submit(mock: &MockCalculator) -> UiResult<()> {
        submit_and_settle(
            mock,
            &locators::CALCULATE_BUTTON,
            &locators::BUTTON_LOADER,
            &WaitTimeouts::default(),
        )
        .await
    }

    async fn fill_valid(mock: &MockCalculator) {
        mock.select_by_value(locators::ORIGIN_COUNTRY.selector(), "CZ")
            .await
            .unwrap();
        mock.type_text(locators::ORIGIN_POSTCODE.selector(), "14800")
            .await
            .unwrap();
        mock.type_text(locators::DESTINATION_POSTCODE.selector(), "26234")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn settles_through_a_well_behaved_loader() {
        let mock = MockCalculator::new();
        mock.open("https://calculator.test/").await.unwrap();
        fill_valid(&mock).await;

        submit(&mock).await.unwrap();

        // Settled means the final state is already readable.
        assert!(mock
            .query(locators::RESULT_PANEL.selector())
            .await
            .unwrap()
            .is_some());
        assert!(mock
            .query(locators::BUTTON_LOADER.selector())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn returns_even_when_the_loader_never_appears() {
        let mock = MockCalculator::new().with_loader(LoaderBehavior::Skipped);
        mock.open("https://calculator.test/").await.unwrap();
        fill_valid(&mock).await;

        submit(&mock).await.unwrap();
        assert!(mock
            .query(locators::RESULT_PANEL.selector())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn returns_even_when_the_loader_sticks_forever() {
        let mock = MockCalculator::new().with_loader(LoaderBehavior::Stuck {
            delay: Duration::from_millis(50),
        });
        mock.open("https://calculator.test/").await.unwrap();
        fill_valid(&mock).await;

        // Swallows the settle timeout; the verdict is left to the caller.
        submit(&mock).await.unwrap();
        assert!(mock
            .query(locators::BUTTON_LOADER.selector())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn a_failing_submit_click_propagates() {
        let mock = MockCalculator::new();
        // Page never opened: the button never becomes clickable.
        let err = submit(&mock).await.expect_err("click must fail loudly");
        assert!(matches!(err, crate::result::UiError::Interaction { .. }));
    }
}
