pub mod csv_format;
pub mod measurement;
pub mod store;

pub use csv_format::{RecordFormat, DATE_FORMAT};
pub use measurement::{Measurement, MeasurementValues};
pub use store::MeasurementStore;
