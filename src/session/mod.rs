//! Per-user state the calculators share: display currency and the history of
//! finished calculations. Nothing here is persisted.

mod currency;
mod history;

use chrono::Utc;
use serde::Serialize;

pub use currency::Currency;
pub use history::{Calculation, CalculationHistory, CalculationSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub currency: Currency,
    pub history: CalculationHistory,
}

impl Session {
    /// Records `calculation` stamped with the current time.
    pub fn record(&mut self, calculation: Calculation) -> &CalculationSnapshot {
        self.history.record(calculation, Utc::now())
    }
}
