//! Process-wide defaults.
//!
//! The default precision is read by every constructor that is not given an
//! explicit precision; the default rounding mode is used by the operator
//! traits and by [`FromStr`](std::str::FromStr). Changes only affect values
//! created or operations run afterwards.

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Error;
use crate::precision::{DEFAULT_PRECISION, Precision, check_precision};
use crate::round::RoundingMode;

/// Snapshot of the process-wide defaults.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub precision: Precision,
    pub rounding: RoundingMode,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            rounding: RoundingMode::Nearest,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

static CONFIG: RwLock<Config> = parking_lot::const_rwlock(Config::new());

/// Returns a copy of the current defaults.
pub fn snapshot() -> Config {
    *CONFIG.read()
}

pub fn default_precision() -> Precision {
    CONFIG.read().precision
}

/// Sets the precision used by constructors that do not take one.
pub fn set_default_precision(prec: Precision) -> Result<(), Error> {
    let prec = check_precision(prec)?;
    CONFIG.write().precision = prec;
    debug!(prec, "default precision changed");
    Ok(())
}

pub fn default_rounding_mode() -> RoundingMode {
    CONFIG.read().rounding
}

pub fn set_default_rounding_mode(rnd: RoundingMode) {
    CONFIG.write().rounding = rnd;
    debug!(?rnd, "default rounding mode changed");
}
