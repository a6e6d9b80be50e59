//! Domain types — the durable artifacts of the pipeline.

pub mod bar;
pub mod forecast;
pub mod report;
pub mod signal;

pub use bar::PriceBar;
pub use forecast::{Forecast, ForecastMethod, ForecastPoint};
pub use report::{ForecastSnapshot, PriceSnapshot, Report, SignalSnapshot};
pub use signal::{Signal, SignalAction};
