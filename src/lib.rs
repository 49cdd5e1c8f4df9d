//! Loan, mortgage, investment and retirement calculators with the chart
//! geometry needed to display their projections.

pub mod api;
pub mod chart;
pub mod cli;
pub mod core;
pub mod error;
pub mod session;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT_TRACING: Once = Once::new();

/// Installs the global subscriber. `RUST_LOG` overrides the `fincalc=info` default.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fincalc=info"));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
