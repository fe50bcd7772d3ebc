//! Error types surfaced by the simulation core.

use thiserror::Error;

/// Result type used throughout the simulation core.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by scene building, planning and goal selection.
///
/// `PathNotFound` and `NoEligibleActivity` are per-cow and recoverable
/// (the cow idles and retries on a later tick). `EmptyLayout` and
/// `InvalidLayout` are scene-fatal: the scene fails to build.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// The layout contains no area a cow could pick as a destination.
    #[error("layout has no eligible activity area")]
    EmptyLayout,

    /// The transition row of the current activity has no probability
    /// mass on any available area kind.
    #[error("no eligible next activity from activity {current}")]
    NoEligibleActivity { current: usize },

    /// The planner exhausted its iteration budget without reaching the
    /// goal region.
    #[error("no path found within {iterations} iterations")]
    PathNotFound { iterations: usize },

    /// The spawn sampler exhausted its retry budget; the map is too
    /// crowded for another cow.
    #[error("no free spawn position after {attempts} attempts")]
    SpawnInfeasible { attempts: usize },

    /// A placed area extends past the grid, or its orientation is not
    /// allowed for its kind.
    #[error("invalid layout: {reason}")]
    InvalidLayout { reason: String },
}
