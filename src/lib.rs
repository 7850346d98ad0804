#![doc(test(attr(deny(warnings))))]

//! spendy records income and expenses and reports on them: totals, category
//! breakdowns, monthly trends and a filterable transaction history.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("spendy tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
