//! Energy figures derived from explorer data
//!
//! Every figure is `size_bytes * watt_per_byte`, in watts. The interesting
//! part is getting the sizes: [`EnergyCalculator::consumption_per_day`] fans
//! out over days and blocks while tolerating partial failure, and
//! [`EnergyCalculator::wallet_energy`] paginates.

mod calculator;
mod daily;
mod types;

pub use calculator::EnergyCalculator;
pub use types::{BlockEnergy, DayEnergyRecord, TransactionEnergy, WalletEnergy};
