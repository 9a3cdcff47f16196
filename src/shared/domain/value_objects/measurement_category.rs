use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of health data that can be imported and exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementCategory {
    BloodGlucose,
    BloodPressure,
    BloodOxygenSaturation,
    Cholesterol,
    Exercise,
    Weight,
    MealConsumption,
    PlannedMeal,
    BeverageConsumption,
    AlcoholConsumption,
}

impl MeasurementCategory {
    pub const ALL: [MeasurementCategory; 10] = [
        MeasurementCategory::BloodGlucose,
        MeasurementCategory::BloodPressure,
        MeasurementCategory::BloodOxygenSaturation,
        MeasurementCategory::Cholesterol,
        MeasurementCategory::Exercise,
        MeasurementCategory::Weight,
        MeasurementCategory::MealConsumption,
        MeasurementCategory::PlannedMeal,
        MeasurementCategory::BeverageConsumption,
        MeasurementCategory::AlcoholConsumption,
    ];

    /// Human readable label used in job names and log lines
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementCategory::BloodGlucose => "blood glucose",
            MeasurementCategory::BloodPressure => "blood pressure",
            MeasurementCategory::BloodOxygenSaturation => "% SPO2",
            MeasurementCategory::Cholesterol => "cholesterol",
            MeasurementCategory::Exercise => "exercise",
            MeasurementCategory::Weight => "weight",
            MeasurementCategory::MealConsumption => "meal consumption",
            MeasurementCategory::PlannedMeal => "planned meal",
            MeasurementCategory::BeverageConsumption => "beverage consumption",
            MeasurementCategory::AlcoholConsumption => "alcohol consumption",
        }
    }

    /// Alcohol consumption is a view over recorded beverages and is only
    /// ever exported
    pub fn supports_import(&self) -> bool {
        !matches!(self, MeasurementCategory::AlcoholConsumption)
    }

    /// Categories whose readings can be averaged per day
    pub fn supports_daily_average(&self) -> bool {
        matches!(
            self,
            MeasurementCategory::BloodPressure | MeasurementCategory::BloodOxygenSaturation
        )
    }
}

impl fmt::Display for MeasurementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementCategory::BloodGlucose => "blood_glucose",
            MeasurementCategory::BloodPressure => "blood_pressure",
            MeasurementCategory::BloodOxygenSaturation => "blood_oxygen_saturation",
            MeasurementCategory::Cholesterol => "cholesterol",
            MeasurementCategory::Exercise => "exercise",
            MeasurementCategory::Weight => "weight",
            MeasurementCategory::MealConsumption => "meal_consumption",
            MeasurementCategory::PlannedMeal => "planned_meal",
            MeasurementCategory::BeverageConsumption => "beverage_consumption",
            MeasurementCategory::AlcoholConsumption => "alcohol_consumption",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for MeasurementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementCategory::ALL
            .into_iter()
            .find(|category| category.to_string() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Invalid measurement category: {}", s))
    }
}
