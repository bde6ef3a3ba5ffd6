//! Reliable single-element actions.
//!
//! A click on this form regularly targets something below the fold or mid
//! CSS transition. [`click`] waits the target into a clickable state, brings
//! it into the viewport center, re-checks clickability after the scroll
//! (layout may still be settling; a fixed sleep would just reintroduce the
//! race) and only then dispatches the native click.

use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, Locator};
use crate::wait::{wait_for, Condition, ElementObservation, WaitProfile};

/// Click the element at `locator`, failing loudly if it never becomes ready.
///
/// # Errors
///
/// [`UiError::Interaction`] when the element does not become clickable within
/// `profile`, or when scrolling/clicking faults underneath us. A silent no-op
/// would mask real defects in the page under test, so unlike read-only
/// queries this never degrades to a negative answer.
pub async fn click<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    profile: WaitProfile,
) -> UiResult<()> {
    match wait_for(session, locator, Condition::Clickable, profile).await? {
        ElementObservation::Satisfied { .. } => {}
        ElementObservation::TimedOut => {
            return Err(UiError::interaction(
                locator.name(),
                locator.selector(),
                format!(
                    "not clickable within {}ms",
                    profile.timeout.as_millis()
                ),
            ));
        }
    }

    session
        .scroll_into_view(locator.selector())
        .await
        .map_err(|e| {
            UiError::interaction(locator.name(), locator.selector(), format!("scroll failed: {e}"))
        })?;

    // Re-check after the scroll instead of sleeping a fixed amount.
    match wait_for(session, locator, Condition::Clickable, profile).await? {
        ElementObservation::Satisfied { .. } => {}
        ElementObservation::TimedOut => {
            return Err(UiError::interaction(
                locator.name(),
                locator.selector(),
                "no longer clickable after scrolling into view",
            ));
        }
    }

    tracing::debug!(locator = %locator, "clicking");
    session.click(locator.selector()).await.map_err(|e| {
        UiError::interaction(locator.name(), locator.selector(), format!("click failed: {e}"))
    })
}
