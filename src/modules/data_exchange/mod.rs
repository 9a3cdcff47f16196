/// Measurement data exchange
///
/// CSV import and export of health measurements. The importer, exporter and
/// purger implement the job module's `DataImporter` / `DataExporter` /
/// `DataPurger` ports.
pub mod domain;
pub mod exporter;
pub mod importer;
pub mod infrastructure;
pub mod purger;

pub use domain::{Measurement, MeasurementStore, MeasurementValues, RecordFormat};
pub use exporter::CsvMeasurementExporter;
pub use importer::CsvMeasurementImporter;
pub use infrastructure::InMemoryMeasurementStore;
pub use purger::MeasurementStorePurger;
