//! Sailing decision components
//!
//! Leaves first:
//! - [`velocity`]: GPS-derived velocity outlier filter
//! - [`mode`]: Fore/side/aft-wind classification with hysteresis
//! - [`layline`]: Per-leg layline tracking
//! - [`tack`]: Tack side ownership and tack decisions
//! - [`time`]: Race clock and finish projection
//! - [`helm`]: Rudder and sail command mapping

pub mod helm;
pub mod layline;
pub mod mode;
pub mod tack;
pub mod time;
pub mod velocity;

pub use helm::{Helm, HelmConfig};
pub use layline::{LaylineTracker, Leg};
pub use mode::{ModeThresholds, SailingMode, SailingModeClassifier, TackingMode};
pub use tack::{TackConfig, TackDecision, TackEvent, TackInputs, TackKeeper, TackSign};
pub use time::{LegProgress, TimeProjector};
pub use velocity::{VelocityFilter, VelocityFilterConfig, VelocityUpdate};
