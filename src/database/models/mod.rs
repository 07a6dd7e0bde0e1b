pub mod baseline;

pub use baseline::{BaselineConfig, NewBaseline};
