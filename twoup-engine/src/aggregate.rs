//! Trial aggregation: reduce a sample of session outcomes into one
//! summary row per parameter tuple.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::{ParamError, SessionParams};
use crate::session::{play_time_boxed, play_until_bust};

/// Summary statistics for one (stake, round-budget) cell of a
/// time-boxed sweep, reduced from `n_sims` independent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBoxedSummary {
    pub base_bet: f64,
    pub box_rounds: u32,
    pub mean_final: f64,
    pub median_final: f64,
    /// Fraction of trials whose final bankroll was exactly zero. This is
    /// a proxy for "could not cover the next stake": the two coincide
    /// only when the busting stake drains the balance to precisely zero,
    /// unlike the unlimited variant's `balance < stake` test. Kept as
    /// observed behavior; see the pinning test below.
    pub bust_rate: f64,
    /// Fraction of trials ending strictly above the starting bankroll.
    pub pct_profitable: f64,
    /// Mean profit among profitable trials, 0.0 when none were.
    pub avg_profit_given_profit: f64,
    /// Mean loss among losing trials, 0.0 when none were.
    pub avg_loss_given_loss: f64,
}

/// Summary statistics for one (stake, safety-cap) cell of an unlimited
/// sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnlimitedSummary {
    pub base_bet: f64,
    pub cap_rounds: u32,
    pub avg_peak_profit: f64,
    pub median_peak_profit: f64,
    /// Mean bust round over busted trials only; `NaN` when no trial
    /// busted within the cap.
    pub avg_bust_round: f64,
    /// Fraction of trials that busted within the cap.
    pub bust_rate: f64,
}

/// Run `n_sims` time-boxed sessions and reduce them to a summary row.
///
/// Trials consume draws from the caller's random source in order, so a
/// sweep can thread one seeded stream through every cell.
///
/// # Errors
///
/// Fails before the first trial if the parameters, round budget, or
/// trial count are out of domain.
pub fn aggregate_time_boxed<R: Rng>(
    params: &SessionParams,
    box_rounds: u32,
    n_sims: u32,
    rng: &mut R,
) -> Result<TimeBoxedSummary, ParamError> {
    params.validate()?;
    if box_rounds == 0 {
        return Err(ParamError::RoundLimit);
    }
    if n_sims == 0 {
        return Err(ParamError::TrialCount);
    }

    let mut finals = Vec::with_capacity(n_sims as usize);
    for _ in 0..n_sims {
        finals.push(play_time_boxed(params, box_rounds, rng));
    }

    let bankroll = params.bankroll;
    let busts = finals.iter().filter(|&&f| f == 0.0).count();
    let profits: Vec<f64> = finals
        .iter()
        .filter(|&&f| f > bankroll)
        .map(|f| f - bankroll)
        .collect();
    let losses: Vec<f64> = finals
        .iter()
        .filter(|&&f| f < bankroll)
        .map(|f| bankroll - f)
        .collect();

    let n = f64::from(n_sims);
    Ok(TimeBoxedSummary {
        base_bet: params.base_bet,
        box_rounds,
        mean_final: mean(&finals),
        median_final: median(&mut finals.clone()),
        bust_rate: to_f64(busts) / n,
        pct_profitable: to_f64(profits.len()) / n,
        avg_profit_given_profit: if profits.is_empty() {
            0.0
        } else {
            mean(&profits)
        },
        avg_loss_given_loss: if losses.is_empty() { 0.0 } else { mean(&losses) },
    })
}

/// Run `n_sims` unlimited sessions and reduce them to a summary row.
///
/// # Errors
///
/// Fails before the first trial if the parameters, safety cap, or trial
/// count are out of domain.
pub fn aggregate_unlimited<R: Rng>(
    params: &SessionParams,
    cap_rounds: u32,
    n_sims: u32,
    rng: &mut R,
) -> Result<UnlimitedSummary, ParamError> {
    params.validate()?;
    if cap_rounds == 0 {
        return Err(ParamError::SafetyCap);
    }
    if n_sims == 0 {
        return Err(ParamError::TrialCount);
    }

    let mut peaks = Vec::with_capacity(n_sims as usize);
    let mut bust_rounds = Vec::new();
    for _ in 0..n_sims {
        let outcome = play_until_bust(params, cap_rounds, rng);
        peaks.push(outcome.peak_profit);
        if let Some(round) = outcome.bust_round {
            bust_rounds.push(f64::from(round));
        }
    }

    let n = f64::from(n_sims);
    Ok(UnlimitedSummary {
        base_bet: params.base_bet,
        cap_rounds,
        avg_peak_profit: mean(&peaks),
        median_peak_profit: median(&mut peaks.clone()),
        avg_bust_round: if bust_rounds.is_empty() {
            f64::NAN
        } else {
            mean(&bust_rounds)
        },
        bust_rate: to_f64(bust_rounds.len()) / n,
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / to_f64(values.len())
}

/// Median of the sample; the midpoint of the two central values for an
/// even count. Sorts its scratch buffer in place.
pub(crate) fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(count: usize) -> f64 {
    count as f64
}
