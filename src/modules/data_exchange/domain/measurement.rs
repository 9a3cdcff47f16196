use crate::shared::domain::value_objects::MeasurementCategory;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single health reading for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub person_id: i64,
    pub name: String,
    pub date: NaiveDateTime,
    pub values: MeasurementValues,
}

/// Category specific readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum MeasurementValues {
    BloodGlucose {
        level: f64,
    },
    BloodPressure {
        systolic: u32,
        diastolic: u32,
    },
    BloodOxygenSaturation {
        percentage: f64,
    },
    /// mmol/L
    Cholesterol {
        total: f64,
        hdl: f64,
        ldl: f64,
        triglycerides: f64,
    },
    Exercise {
        activity_type: String,
        /// H:MM:SS
        duration: String,
        distance: Option<f64>,
        calories: u32,
        minimum_heart_rate: u32,
        maximum_heart_rate: u32,
    },
    Weight {
        weight: f64,
    },
    MealConsumption {
        meal_id: i64,
        meal: String,
        quantity: f64,
    },
    PlannedMeal {
        meal_type: String,
        meal: String,
    },
    BeverageConsumption {
        beverage_id: i64,
        beverage: String,
        quantity: u32,
        /// ml per serving
        volume: f64,
        abv: f64,
        units: f64,
    },
    AlcoholConsumption {
        beverage_id: i64,
        beverage: String,
        /// ml per measure
        measure: f64,
        measure_name: String,
        quantity: u32,
        abv: f64,
        units: f64,
    },
}

impl MeasurementValues {
    pub fn category(&self) -> MeasurementCategory {
        match self {
            MeasurementValues::BloodGlucose { .. } => MeasurementCategory::BloodGlucose,
            MeasurementValues::BloodPressure { .. } => MeasurementCategory::BloodPressure,
            MeasurementValues::BloodOxygenSaturation { .. } => {
                MeasurementCategory::BloodOxygenSaturation
            }
            MeasurementValues::Cholesterol { .. } => MeasurementCategory::Cholesterol,
            MeasurementValues::Exercise { .. } => MeasurementCategory::Exercise,
            MeasurementValues::Weight { .. } => MeasurementCategory::Weight,
            MeasurementValues::MealConsumption { .. } => MeasurementCategory::MealConsumption,
            MeasurementValues::PlannedMeal { .. } => MeasurementCategory::PlannedMeal,
            MeasurementValues::BeverageConsumption { .. } => {
                MeasurementCategory::BeverageConsumption
            }
            MeasurementValues::AlcoholConsumption { .. } => MeasurementCategory::AlcoholConsumption,
        }
    }
}

impl Measurement {
    pub fn category(&self) -> MeasurementCategory {
        self.values.category()
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Inclusive on both ends; `None` leaves that side open
    pub fn falls_within(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        let day = self.day();
        from.map_or(true, |from| day >= from) && to.map_or(true, |to| day <= to)
    }
}
