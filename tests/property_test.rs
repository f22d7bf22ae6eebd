//! Property-based checks over the simulation state machine and the
//! derived statistics.

mod common;

use common::*;
use goldencross::domain::backtest::{run_backtest, BacktestConfig};
use goldencross::domain::performance;
use goldencross::domain::signal::Transition;
use goldencross::domain::simulator::{simulate, step, HoldingState};
use proptest::prelude::*;

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..10_000.0, 1..=max_len)
}

proptest! {
    #[test]
    fn state_sides_are_exclusive_and_non_negative(
        closes in arb_closes(120),
        seed in any::<u64>(),
    ) {
        let prices = make_series(&closes);
        let transitions: Vec<Transition> = (0..closes.len())
            .map(|i| match (seed.wrapping_add(i as u64)) % 7 {
                0 => Transition::CrossUp,
                1 => Transition::CrossDown,
                _ => Transition::None,
            })
            .collect();

        let mut state = HoldingState::with_cash(10_000.0);
        for (p, &t) in prices.points().iter().zip(&transitions) {
            let (next, value) = step(state, p, t)?;
            state = next;
            prop_assert!(state.cash >= 0.0);
            prop_assert!(state.units >= 0.0);
            prop_assert!(!(state.cash > 0.0 && state.units > 0.0));
            prop_assert!(value > 0.0);
        }
    }

    #[test]
    fn value_is_conserved_across_a_trade(
        cash in 1.0f64..1_000_000.0,
        close in 0.01f64..100_000.0,
    ) {
        // Converting the entire balance at one price changes the
        // representation, never the value.
        let flat = HoldingState::with_cash(cash);
        let (long, value) = step(flat, &make_points(&[close])[0], Transition::CrossUp)?;

        prop_assert!((value - cash).abs() < cash * 1e-12);
        prop_assert!((long.units * close - cash).abs() < cash * 1e-12);

        let (back, value_out) = step(long, &make_points(&[close])[0], Transition::CrossDown)?;
        prop_assert!(back.is_flat());
        prop_assert!((value_out - cash).abs() < cash * 1e-9);
    }

    #[test]
    fn drawdown_is_never_positive(closes in arb_closes(200)) {
        let prices = make_series(&closes);
        let result = run_backtest(prices, &BacktestConfig::default())?;
        prop_assert!(result.report.max_drawdown <= 0.0);
    }

    #[test]
    fn profit_loss_is_final_minus_initial(closes in arb_closes(300)) {
        let prices = make_series(&closes);
        let result = run_backtest(prices, &BacktestConfig::default())?;
        prop_assert!(
            (result.report.profit_loss - (result.report.final_value - 10_000.0)).abs() < 1e-9
        );
    }

    #[test]
    fn evaluate_matches_running_max_definition(values in prop::collection::vec(0.01f64..1e6, 1..200)) {
        let report = performance::evaluate(&values, 10_000.0)?;

        let mut running_max = f64::NEG_INFINITY;
        let mut worst = 0.0f64;
        for &v in &values {
            running_max = running_max.max(v);
            worst = worst.min(v - running_max);
        }
        prop_assert!((report.max_drawdown - worst).abs() < 1e-9);
        prop_assert!((report.final_value - *values.last().unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn simulation_is_deterministic(
        closes in arb_closes(150),
    ) {
        let prices = make_series(&closes);
        let transitions: Vec<Transition> = (0..closes.len())
            .map(|i| match i % 11 {
                0 => Transition::CrossUp,
                5 => Transition::CrossDown,
                _ => Transition::None,
            })
            .collect();

        let a = simulate(&prices, &transitions, 10_000.0)?;
        let b = simulate(&prices, &transitions, 10_000.0)?;
        prop_assert_eq!(&a, &b);
        for (x, y) in a.values.iter().zip(&b.values) {
            prop_assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn pipeline_never_manufactures_negative_value(closes in arb_closes(400)) {
        let prices = make_series(&closes);
        let result = run_backtest(prices, &BacktestConfig::default())?;
        prop_assert!(result.portfolio_values.iter().all(|&v| v > 0.0));
        prop_assert!(result.final_state.cash >= 0.0);
        prop_assert!(result.final_state.units >= 0.0);
    }

    #[test]
    fn held_value_tracks_price_exactly(closes in arb_closes(100)) {
        // Buy on the first bar and hold; every recorded value must be
        // the unit count marked at that bar's close.
        let prices = make_series(&closes);
        let mut schedule = vec![Transition::None; closes.len()];
        schedule[0] = Transition::CrossUp;

        let result = simulate(&prices, &schedule, 10_000.0)?;
        let units = 10_000.0 / closes[0];
        for (value, close) in result.values.iter().zip(&closes) {
            prop_assert!((value - units * close).abs() < 1e-6 * units * close);
        }
    }
}
