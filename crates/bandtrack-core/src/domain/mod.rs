mod category;
mod models;
mod symbol;
mod timeframe;
mod timestamp;

pub use category::Category;
pub use models::{Bar, PriceSeries};
pub use symbol::{Symbol, NSE_SUFFIX};
pub use timeframe::Timeframe;
pub use timestamp::UtcDateTime;
