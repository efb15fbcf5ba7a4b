//! Two-Up Martingale Engine
//!
//! Monte-Carlo core for studying a Martingale betting strategy on a
//! near-fair coin-flip game. The crate simulates single sessions (time
//! boxed or played until bust), aggregates trial populations into
//! summary statistics, sweeps parameter grids into result tables, and
//! selects best-performing parameter combinations. It performs no I/O;
//! randomness enters only through injected `rand::Rng` sources, and
//! every sweep is reproducible from its seed.

pub mod aggregate;
pub mod params;
pub mod select;
pub mod session;
pub mod sweep;

// Re-export commonly used types
pub use aggregate::{TimeBoxedSummary, UnlimitedSummary, aggregate_time_boxed, aggregate_unlimited};
pub use params::{ParamError, SessionParams};
pub use select::{RankField, best_by};
pub use session::{UnlimitedOutcome, play_time_boxed, play_until_bust};
pub use sweep::{SweepConfig, run_timeboxed_sweep, run_unlimited_sweep};
