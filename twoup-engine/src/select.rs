//! Selection policy: pick each stake's best-performing row from a
//! sweep's result table.

use serde::{Deserialize, Serialize};

use crate::aggregate::TimeBoxedSummary;

/// Ranking criterion for [`best_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankField {
    /// Maximize the mean final bankroll.
    MeanFinal,
    /// Maximize the fraction of profitable sessions.
    PctProfitable,
}

impl RankField {
    fn value_of(self, row: &TimeBoxedSummary) -> f64 {
        match self {
            Self::MeanFinal => row.mean_final,
            Self::PctProfitable => row.pct_profitable,
        }
    }
}

impl std::fmt::Display for RankField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeanFinal => write!(f, "mean_final"),
            Self::PctProfitable => write!(f, "pct_profitable"),
        }
    }
}

/// Group the table's rows by stake and keep, per group, the single row
/// maximizing `rank`. Ties break toward the earlier row (stable argmax),
/// and groups appear in the order their stake first occurs in the table.
#[must_use]
pub fn best_by(table: &[TimeBoxedSummary], rank: RankField) -> Vec<TimeBoxedSummary> {
    let mut winners: Vec<TimeBoxedSummary> = Vec::new();
    for row in table {
        match winners
            .iter_mut()
            .find(|winner| winner.base_bet == row.base_bet)
        {
            Some(winner) => {
                if rank.value_of(row) > rank.value_of(winner) {
                    *winner = *row;
                }
            }
            None => winners.push(*row),
        }
    }
    winners
}
