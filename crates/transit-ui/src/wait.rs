//! Bounded polling against the live DOM.
//!
//! Everything else in the harness is built on [`wait_for`]: poll a condition
//! at a fixed interval until it holds or the budget elapses. The locator is
//! re-resolved on every poll, so a DOM node being swapped out between polls
//! is handled by construction rather than by stale-handle recovery.
//!
//! A timeout is not an error here. Read-only callers treat
//! [`ElementObservation::TimedOut`] as a normal negative answer; mutating
//! callers (see [`crate::interact`]) convert it into a hard failure.

use std::time::Duration;

use tokio::time::Instant;

use crate::result::UiResult;
use crate::session::{BrowserSession, ElementSnapshot, Locator};

/// Default poll interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default wait budget (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Condition a wait can be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Element exists and is rendered
    Visible,
    /// Element is visible and enabled
    Clickable,
    /// Element is hidden or does not exist at all
    Invisible,
}

impl Condition {
    /// Whether the condition holds for the given query result.
    ///
    /// Disappearance and absence are equivalent: `Invisible` is satisfied
    /// both by a hidden element and by no element at all.
    #[must_use]
    pub fn holds(self, snapshot: Option<&ElementSnapshot>) -> bool {
        match self {
            Self::Visible => snapshot.map_or(false, |s| s.visible),
            Self::Clickable => snapshot.map_or(false, ElementSnapshot::is_clickable),
            Self::Invisible => snapshot.map_or(true, |s| !s.visible),
        }
    }
}

/// Wait budget: total timeout plus the polling cadence.
///
/// Values come from configuration ([`crate::config::WaitTimeouts`]), not from
/// call sites; the two named shapes are a short profile for "did a transient
/// indicator appear" and a long one for "did the primary action complete".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitProfile {
    /// Maximum time to keep polling
    pub timeout: Duration,
    /// Pause between polls
    pub poll_interval: Duration,
}

impl WaitProfile {
    /// Create a profile from explicit durations.
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

impl Default for WaitProfile {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        )
    }
}

/// Outcome of a wait: either the condition held, or the budget ran out.
#[derive(Debug, Clone)]
pub enum ElementObservation {
    /// The condition held. For visibility conditions this carries the
    /// snapshot that satisfied it; an `Invisible` wait satisfied by sheer
    /// absence carries none.
    Satisfied {
        /// Last snapshot of the element, when one existed
        element: Option<ElementSnapshot>,
    },
    /// The condition did not hold within the wait budget.
    TimedOut,
}

impl ElementObservation {
    /// Whether the awaited condition held.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// The satisfying snapshot, if the condition held for an existing element.
    #[must_use]
    pub fn into_element(self) -> Option<ElementSnapshot> {
        match self {
            Self::Satisfied { element } => element,
            Self::TimedOut => None,
        }
    }
}

/// Poll `locator` until `condition` holds or `profile.timeout` elapses.
///
/// The condition is checked at least once even with a zero budget. Deadlines
/// are computed on the tokio clock so a paused-clock test harness drives the
/// loop deterministically.
///
/// # Errors
///
/// Only genuine session faults propagate; a condition that never held within
/// the budget is reported as `Ok(ElementObservation::TimedOut)`.
pub async fn wait_for<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    condition: Condition,
    profile: WaitProfile,
) -> UiResult<ElementObservation> {
    let deadline = Instant::now() + profile.timeout;

    loop {
        let snapshot = session.query(locator.selector()).await?;
        if condition.holds(snapshot.as_ref()) {
            return Ok(ElementObservation::Satisfied { element: snapshot });
        }

        if Instant::now() >= deadline {
            tracing::debug!(
                locator = %locator,
                ?condition,
                timeout_ms = profile.timeout.as_millis() as u64,
                "wait budget elapsed"
            );
            return Ok(ElementObservation::TimedOut);
        }

        tokio::time::sleep(profile.poll_interval).await;
    }
}
