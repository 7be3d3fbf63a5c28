pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use domain::{
    merge_tables, total_shares, CapTable, ConvertibleNote, Decimal, Event, Exit, Founder,
    HolderName, OptionsAction, PricedRound, Safe, EMPLOYEE_POOL_KEY, INITIAL_SHARES,
    OPTION_POOL_KEY,
};
pub use engine::{build_cap_table_sequence, simulate, InvalidEventError, Simulation};
pub use error::AppError;
