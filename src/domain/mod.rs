//! Domain types for the cap-table simulator.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Holder names and the reserved pool keys
//! - Founders, financing events and the exit
//! - The CapTable snapshot value object

pub mod cap_table;
pub mod decimal;
pub mod event;
pub mod founder;
pub mod primitives;

pub use cap_table::{merge_tables, total_shares, CapTable};
pub use decimal::Decimal;
pub use event::{Convertible, ConvertibleNote, Event, OptionsAction, PricedRound, Safe};
pub use founder::{Exit, Founder};
pub use primitives::{HolderName, EMPLOYEE_POOL_KEY, INITIAL_SHARES, OPTION_POOL_KEY};
