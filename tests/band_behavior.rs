//! Behavior-driven tests for Bollinger Band computation
//!
//! These tests verify HOW the band engine behaves across market shapes:
//! flat series, trending series, short histories, and boundary positions.

use bandtrack_tests::*;

// =============================================================================
// Band Computation: Flat and Trending Markets
// =============================================================================

#[test]
fn when_the_market_is_flat_the_bands_collapse_and_the_signal_stays_neutral() {
    // Given: 200 identical closes
    let series = series_from_closes("TCS.NS", &vec![1_250.0; 200]);

    // When: The bands are computed
    let result = compute(&series, &BandParams::default()).expect("computes");

    // Then: SMA and both bands equal the close, position pins to the midpoint
    assert_eq!(result.sma, 1_250.0);
    assert_eq!(result.upper_band, 1_250.0);
    assert_eq!(result.lower_band, 1_250.0);
    assert_eq!(result.position_pct, 50.0);
    assert_eq!(result.signal, Signal::Neutral);
}

#[test]
fn when_the_price_rallies_the_position_rises_toward_the_upper_band() {
    // Given: A flat base with an increasingly strong final close
    let mut calm = vec![100.0; 200];
    calm[0] = 101.0; // one off-mean close so the bands have width

    let mut previous_position = f64::MIN;
    for last_close in [100.5, 101.0, 101.5] {
        let mut closes = calm.clone();
        *closes.last_mut().expect("non-empty") = last_close;
        let series = series_from_closes("INFY.NS", &closes);

        // When: The bands are computed for each stronger close
        let result = compute(&series, &BandParams::default()).expect("computes");

        // Then: The band position is strictly increasing
        assert!(
            result.position_pct > previous_position,
            "position should rise with the close: {} vs {}",
            result.position_pct,
            previous_position
        );
        previous_position = result.position_pct;
    }
}

#[test]
fn when_the_history_is_shorter_than_the_window_the_engine_refuses_to_guess() {
    // Given: Only 120 closes against a 200-bar window
    let series = series_from_closes("NEWIPO.NS", &vec![450.0; 120]);

    // When: The bands are computed
    let error = compute(&series, &BandParams::default()).expect_err("must fail");

    // Then: The error reports both sides of the shortfall
    assert_eq!(error.to_string(), "insufficient data: got 120 points, need 200");
}

// =============================================================================
// Band Computation: Signal Boundaries
// =============================================================================

#[test]
fn when_the_position_sits_exactly_on_a_threshold_the_strict_comparison_wins() {
    // Given/When/Then: Exact threshold values fall to the weaker signal
    assert_eq!(Signal::from_position(95.0), Signal::NearUpper);
    assert_eq!(Signal::from_position(80.0), Signal::Neutral);
    assert_eq!(Signal::from_position(20.0), Signal::Neutral);
    assert_eq!(Signal::from_position(5.0), Signal::NearLower);
}

#[test]
fn when_the_position_breaks_out_of_the_bands_the_extreme_signals_fire() {
    // Positions outside 0..100 happen when the close escapes the bands
    assert_eq!(Signal::from_position(112.0), Signal::Overbought);
    assert_eq!(Signal::from_position(-7.0), Signal::Oversold);
}

// =============================================================================
// Band Computation: Mock Provider Integration
// =============================================================================

#[tokio::test]
async fn when_the_mock_provider_feeds_the_engine_both_timeframes_compute() {
    // Given: The offline adapter
    let adapter = YahooAdapter::default();
    let symbol = Symbol::parse("RELIANCE.NS").expect("valid");

    for timeframe in Timeframe::ALL {
        // When: A series is fetched and the bands are computed
        let series = adapter
            .series(SeriesRequest::new(symbol.clone(), timeframe))
            .await
            .expect("mock fetch succeeds");
        let result = compute(&series, &BandParams::default()).expect("computes");

        // Then: The snapshot is internally consistent
        assert!(result.upper_band >= result.sma);
        assert!(result.lower_band <= result.sma);
        assert_eq!(result.symbol, "RELIANCE");
    }
}
