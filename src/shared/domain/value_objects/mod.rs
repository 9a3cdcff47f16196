mod measurement_category;

pub use measurement_category::MeasurementCategory;
