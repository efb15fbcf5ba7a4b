//! Session parameters and fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure for simulation inputs.
///
/// Every sweep entry point validates its full parameter set before the
/// first trial runs, so a bad input can never abort a sweep partway.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("win probability must be in (0, 1], got {0}")]
    WinProbability(f64),
    #[error("loss multiplier must be >= 1, got {0}")]
    LossMultiplier(f64),
    #[error("base bet must be positive, got {0}")]
    BaseBet(f64),
    #[error("initial bankroll must be non-negative, got {0}")]
    Bankroll(f64),
    #[error("round limit must be at least 1")]
    RoundLimit,
    #[error("safety cap must be at least 1")]
    SafetyCap,
    #[error("trial count must be at least 1")]
    TrialCount,
}

/// Immutable inputs for a single Martingale session.
///
/// The round budget (time-boxed) or safety cap (unlimited) is supplied
/// separately by the caller, since it is the swept quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Starting capital.
    pub bankroll: f64,
    /// Stake placed after every win (the reset amount).
    pub base_bet: f64,
    /// Probability of winning a single resolved round.
    pub win_probability: f64,
    /// Factor applied to the stake after each loss. 2.0 is the classic
    /// Martingale.
    pub loss_multiplier: f64,
}

impl SessionParams {
    /// Fair-coin, double-after-loss session with the given capital and
    /// reset stake.
    #[must_use]
    pub const fn new(bankroll: f64, base_bet: f64) -> Self {
        Self {
            bankroll,
            base_bet,
            win_probability: 0.5,
            loss_multiplier: 2.0,
        }
    }

    #[must_use]
    pub const fn with_win_probability(mut self, win_probability: f64) -> Self {
        self.win_probability = win_probability;
        self
    }

    #[must_use]
    pub const fn with_loss_multiplier(mut self, loss_multiplier: f64) -> Self {
        self.loss_multiplier = loss_multiplier;
        self
    }

    /// Check every field against its documented domain.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] encountered, checked in field
    /// declaration order.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.bankroll.is_finite() || self.bankroll < 0.0 {
            return Err(ParamError::Bankroll(self.bankroll));
        }
        if !self.base_bet.is_finite() || self.base_bet <= 0.0 {
            return Err(ParamError::BaseBet(self.base_bet));
        }
        if !self.win_probability.is_finite()
            || self.win_probability <= 0.0
            || self.win_probability > 1.0
        {
            return Err(ParamError::WinProbability(self.win_probability));
        }
        if !self.loss_multiplier.is_finite() || self.loss_multiplier < 1.0 {
            return Err(ParamError::LossMultiplier(self.loss_multiplier));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fair_classic_martingale() {
        let params = SessionParams::new(1_000.0, 10.0);
        assert!(params.validate().is_ok());
        assert!((params.win_probability - 0.5).abs() < f64::EPSILON);
        assert!((params.loss_multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_domain_fields() {
        let base = SessionParams::new(1_000.0, 10.0);

        let err = base.with_win_probability(0.0).validate().unwrap_err();
        assert_eq!(err, ParamError::WinProbability(0.0));

        let err = base.with_win_probability(1.5).validate().unwrap_err();
        assert_eq!(err, ParamError::WinProbability(1.5));

        let err = base.with_loss_multiplier(0.9).validate().unwrap_err();
        assert_eq!(err, ParamError::LossMultiplier(0.9));

        let mut bad_bet = base;
        bad_bet.base_bet = 0.0;
        assert_eq!(bad_bet.validate().unwrap_err(), ParamError::BaseBet(0.0));

        let mut bad_bankroll = base;
        bad_bankroll.bankroll = -1.0;
        assert_eq!(
            bad_bankroll.validate().unwrap_err(),
            ParamError::Bankroll(-1.0)
        );
    }

    #[test]
    fn win_probability_of_one_is_valid() {
        let params = SessionParams::new(100.0, 5.0).with_win_probability(1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let mut params = SessionParams::new(1_000.0, 10.0);
        params.bankroll = f64::NAN;
        assert!(params.validate().is_err());

        let params = SessionParams::new(1_000.0, 10.0).with_loss_multiplier(f64::INFINITY);
        assert!(params.validate().is_err());
    }
}
