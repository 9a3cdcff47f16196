/// Test data factories using builder pattern
///
/// Provides measurements and CSV payloads with sensible defaults
use chrono::{NaiveDate, NaiveDateTime};
use healthtracker_lib::modules::data_exchange::{Measurement, MeasurementValues, RecordFormat};
use healthtracker_lib::shared::domain::MeasurementCategory;
use rand::Rng;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap()
}

pub struct MeasurementFactory {
    person_id: i64,
    name: String,
    date: NaiveDateTime,
    values: MeasurementValues,
}

impl MeasurementFactory {
    pub fn blood_pressure(systolic: u32, diastolic: u32) -> Self {
        Self::with_values(MeasurementValues::BloodPressure {
            systolic,
            diastolic,
        })
    }

    pub fn blood_oxygen_saturation(percentage: f64) -> Self {
        Self::with_values(MeasurementValues::BloodOxygenSaturation { percentage })
    }

    pub fn weight(weight: f64) -> Self {
        Self::with_values(MeasurementValues::Weight { weight })
    }

    pub fn cholesterol(total: f64, hdl: f64, ldl: f64, triglycerides: f64) -> Self {
        Self::with_values(MeasurementValues::Cholesterol {
            total,
            hdl,
            ldl,
            triglycerides,
        })
    }

    pub fn planned_meal(meal_type: &str, meal: &str) -> Self {
        Self::with_values(MeasurementValues::PlannedMeal {
            meal_type: meal_type.to_string(),
            meal: meal.to_string(),
        })
    }

    /// Random but valid blood pressure reading
    pub fn random_blood_pressure() -> Self {
        let mut rng = rand::thread_rng();
        Self::blood_pressure(rng.gen_range(95..160), rng.gen_range(55..100))
    }

    fn with_values(values: MeasurementValues) -> Self {
        Self {
            person_id: 1,
            name: "Alex Taylor".to_string(),
            date: at(date(2024, 1, 15), 8),
            values,
        }
    }

    pub fn for_person(mut self, person_id: i64) -> Self {
        self.person_id = person_id;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn on(mut self, date: NaiveDateTime) -> Self {
        self.date = date;
        self
    }

    pub fn build(self) -> Measurement {
        Measurement {
            person_id: self.person_id,
            name: self.name,
            date: self.date,
            values: self.values,
        }
    }
}

/// Header plus one record per measurement, in the category's import format
pub fn csv_for(category: MeasurementCategory, measurements: &[Measurement]) -> String {
    let format = RecordFormat::new(category).unwrap();
    let mut content = format.header();
    for measurement in measurements {
        content.push('\n');
        content.push_str(&format.format(measurement).unwrap());
    }
    content
}
