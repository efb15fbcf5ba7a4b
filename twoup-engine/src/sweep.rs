//! Parameter-grid sweeps over the trial aggregator.
//!
//! A sweep iterates the Cartesian product of stakes and grid values
//! (round budgets or safety caps), producing one summary row per cell in
//! nested iteration order: outer stakes, inner grid. One random stream
//! is seeded at sweep start and threaded through every cell, so a fixed
//! seed reproduces the whole table bit for bit.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::aggregate::{
    TimeBoxedSummary, UnlimitedSummary, aggregate_time_boxed, aggregate_unlimited,
};
use crate::params::{ParamError, SessionParams};

/// Fixed inputs shared by every cell of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Starting bankroll for every simulated session.
    pub bankroll: f64,
    /// Monte-Carlo trials per (stake, grid value) cell.
    pub n_sims: u32,
    /// Seed for the sweep's single random stream.
    pub seed: u64,
    pub win_probability: f64,
    pub loss_multiplier: f64,
}

impl SweepConfig {
    /// Fair-coin classic-Martingale sweep with the given bankroll, trial
    /// count, and seed.
    #[must_use]
    pub const fn new(bankroll: f64, n_sims: u32, seed: u64) -> Self {
        Self {
            bankroll,
            n_sims,
            seed,
            win_probability: 0.5,
            loss_multiplier: 2.0,
        }
    }

    fn session_params(&self, base_bet: f64) -> SessionParams {
        SessionParams::new(self.bankroll, base_bet)
            .with_win_probability(self.win_probability)
            .with_loss_multiplier(self.loss_multiplier)
    }
}

/// Sweep stakes against round budgets with the time-boxed simulator.
///
/// Empty `stakes` or `round_grid` sequences yield an empty table; that
/// is a valid degenerate sweep, not an error.
///
/// # Errors
///
/// Returns [`ParamError`] before any simulation runs when the fixed
/// parameters, any stake, any round budget, or the trial count are out
/// of domain.
pub fn run_timeboxed_sweep(
    stakes: &[f64],
    round_grid: &[u32],
    cfg: &SweepConfig,
) -> Result<Vec<TimeBoxedSummary>, ParamError> {
    validate_grid(stakes, round_grid, cfg, ParamError::RoundLimit)?;

    let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
    let mut table = Vec::with_capacity(stakes.len() * round_grid.len());
    for &stake in stakes {
        let params = cfg.session_params(stake);
        for &box_rounds in round_grid {
            debug!(
                "time-boxed cell: stake {stake}, rounds {box_rounds}, {} trials",
                cfg.n_sims
            );
            table.push(aggregate_time_boxed(
                &params, box_rounds, cfg.n_sims, &mut rng,
            )?);
        }
    }
    Ok(table)
}

/// Sweep stakes against safety caps with the unlimited simulator.
///
/// With a single cap this reduces to one row per stake, the summary
/// shape used for peak-profit reporting.
///
/// # Errors
///
/// Same fail-fast validation as [`run_timeboxed_sweep`], with
/// [`ParamError::SafetyCap`] for a zero cap.
pub fn run_unlimited_sweep(
    stakes: &[f64],
    caps: &[u32],
    cfg: &SweepConfig,
) -> Result<Vec<UnlimitedSummary>, ParamError> {
    validate_grid(stakes, caps, cfg, ParamError::SafetyCap)?;

    let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
    let mut table = Vec::with_capacity(stakes.len() * caps.len());
    for &stake in stakes {
        let params = cfg.session_params(stake);
        for &cap_rounds in caps {
            debug!(
                "unlimited cell: stake {stake}, cap {cap_rounds}, {} trials",
                cfg.n_sims
            );
            table.push(aggregate_unlimited(&params, cap_rounds, cfg.n_sims, &mut rng)?);
        }
    }
    Ok(table)
}

/// Reject every malformed input up front so a sweep can never fail
/// after its first cell has already consumed random draws.
fn validate_grid(
    stakes: &[f64],
    grid: &[u32],
    cfg: &SweepConfig,
    zero_grid_error: ParamError,
) -> Result<(), ParamError> {
    if cfg.n_sims == 0 {
        return Err(ParamError::TrialCount);
    }
    for &stake in stakes {
        cfg.session_params(stake).validate()?;
    }
    if grid.iter().any(|&value| value == 0) {
        return Err(zero_grid_error);
    }
    Ok(())
}
