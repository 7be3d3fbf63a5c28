//! Domain primitives: HolderName and the reserved holder keys.

use serde::{Deserialize, Serialize};

/// Cap-table key for option-pool shares not yet granted to anyone.
pub const OPTION_POOL_KEY: &str = "Available Options";

/// Cap-table key for grants that do not name a specific recipient.
pub const EMPLOYEE_POOL_KEY: &str = "Employees";

/// Shares split between founders before any event is applied.
pub const INITIAL_SHARES: i64 = 10_000_000;

/// Name of an equity holder (founder, investor, instrument, pool).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderName(pub String);

impl HolderName {
    pub fn new(name: impl Into<String>) -> Self {
        HolderName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn option_pool() -> Self {
        HolderName::new(OPTION_POOL_KEY)
    }

    pub fn employee_pool() -> Self {
        HolderName::new(EMPLOYEE_POOL_KEY)
    }

    /// True for the two keys consumers render as pool rows.
    pub fn is_reserved(&self) -> bool {
        self.0 == OPTION_POOL_KEY || self.0 == EMPLOYEE_POOL_KEY
    }

    pub fn is_option_pool(&self) -> bool {
        self.0 == OPTION_POOL_KEY
    }
}

impl std::fmt::Display for HolderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HolderName {
    fn from(value: &str) -> Self {
        HolderName::new(value)
    }
}
