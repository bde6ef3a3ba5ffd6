//! Typed access to text inputs and message regions.
//!
//! Writes are partial: a field that never becomes visible fails the step,
//! because silently skipping a form fill would surface later as a confusing
//! assertion failure. Reads are total: absence, hidden state and timeout all
//! map to an empty string or `false`, never to an error.

use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, Locator};
use crate::wait::{wait_for, Condition, ElementObservation, WaitProfile};

/// Replace the field's content with `value` (clear first, then type).
///
/// Clearing is mandatory: appending to stale content is a defect, and the
/// round-trip `set_text` → [`value`] must yield exactly `value` regardless of
/// what the field held before.
///
/// # Errors
///
/// [`UiError::Interaction`] when the field never becomes visible within
/// `profile` or when clearing/typing faults underneath us.
pub async fn set_text<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    value: &str,
    profile: WaitProfile,
) -> UiResult<()> {
    match wait_for(session, locator, Condition::Visible, profile).await? {
        ElementObservation::Satisfied { .. } => {}
        ElementObservation::TimedOut => {
            return Err(UiError::interaction(
                locator.name(),
                locator.selector(),
                format!(
                    "not visible within {}ms, could not enter {value:?}",
                    profile.timeout.as_millis()
                ),
            ));
        }
    }

    session.clear(locator.selector()).await.map_err(|e| {
        UiError::interaction(locator.name(), locator.selector(), format!("clear failed: {e}"))
    })?;
    session
        .type_text(locator.selector(), value)
        .await
        .map_err(|e| {
            UiError::interaction(
                locator.name(),
                locator.selector(),
                format!("could not enter {value:?}: {e}"),
            )
        })
}

/// Current input value; empty string when the field never became visible.
pub async fn value<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    profile: WaitProfile,
) -> UiResult<String> {
    let observation = wait_for(session, locator, Condition::Visible, profile).await?;
    Ok(observation
        .into_element()
        .and_then(|e| e.value)
        .unwrap_or_default())
}

/// Rendered text; empty string when the element never became visible.
pub async fn text<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    profile: WaitProfile,
) -> UiResult<String> {
    let observation = wait_for(session, locator, Condition::Visible, profile).await?;
    Ok(observation
        .into_element()
        .map(|e| e.text)
        .unwrap_or_default())
}

/// Validation-message text with surrounding whitespace trimmed; empty when
/// the region is absent or hidden.
pub async fn error_text<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    profile: WaitProfile,
) -> UiResult<String> {
    Ok(text(session, locator, profile).await?.trim().to_string())
}

/// Whether the element became visible within the budget; `false` on timeout.
pub async fn is_visible<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    profile: WaitProfile,
) -> UiResult<bool> {
    let observation = wait_for(session, locator, Condition::Visible, profile).await?;
    Ok(observation.is_satisfied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCalculator;
    use crate::page::locators;

    async fn opened() -> MockCalculator {
        let mock = MockCalculator::new();
        mock.open("https://calculator.test/").await.unwrap();
        mock
    }

    #[tokio::test(start_paused = true)]
    async fn set_text_replaces_stale_content() {
        let mock = opened().await;
        let input = &locators::ORIGIN_POSTCODE;

        // Simulate leftovers from an earlier fill.
        mock.type_text(input.selector(), "99999").await.unwrap();

        set_text(&mock, input, "14800", WaitProfile::default())
            .await
            .unwrap();
        let current = value(&mock, input, WaitProfile::default()).await.unwrap();
        assert_eq!(current, "14800");
    }

    #[tokio::test(start_paused = true)]
    async fn set_text_on_a_field_that_never_appears_fails_loudly() {
        let mock = MockCalculator::new();
        // Page never opened, so the input never becomes visible.
        let err = set_text(
            &mock,
            &locators::ORIGIN_POSTCODE,
            "14800",
            WaitProfile::default(),
        )
        .await
        .expect_err("a skipped form fill must abort the step");
        assert!(err.to_string().contains("14800"));
    }

    #[tokio::test(start_paused = true)]
    async fn reads_are_total_on_absent_elements() {
        let mock = opened().await;
        let profile = WaitProfile::default();

        assert_eq!(
            text(&mock, &locators::GLOBAL_ERROR, profile).await.unwrap(),
            ""
        );
        assert_eq!(
            error_text(&mock, &locators::ORIGIN_POSTCODE_ERROR, profile)
                .await
                .unwrap(),
            ""
        );
        assert!(!is_visible(&mock, &locators::RESULT_PANEL, profile)
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn error_text_is_trimmed() {
        let mock = opened().await;
        // An empty submission renders the validation copy (padded in the DOM).
        mock.click(locators::CALCULATE_BUTTON.selector())
            .await
            .unwrap();

        let text = error_text(
            &mock,
            &locators::ORIGIN_POSTCODE_ERROR,
            WaitProfile::default(),
        )
        .await
        .unwrap();
        assert_eq!(text, crate::fixtures::POSTAL_CODE_ERROR);
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Whatever was in the field before, set_text followed by a read
            // yields exactly the requested value.
            #[test]
            fn set_text_round_trips(prior in "[ -~]{0,12}", requested in "[ -~]{0,12}") {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .start_paused(true)
                    .build()
                    .unwrap();
                let current = runtime.block_on(async {
                    let mock = opened().await;
                    let input = &locators::ORIGIN_POSTCODE;

                    mock.type_text(input.selector(), &prior).await.unwrap();
                    set_text(&mock, input, &requested, WaitProfile::default())
                        .await
                        .unwrap();

                    value(&mock, input, WaitProfile::default()).await.unwrap()
                });
                prop_assert_eq!(current, requested);
            }
        }
    }
}
