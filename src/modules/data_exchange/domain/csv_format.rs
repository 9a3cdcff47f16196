/// Quoted CSV record formats, one per measurement category
///
/// Every file starts with a header line followed by one record per line, each
/// field wrapped in double quotes: `"1","Jo Smith","05/01/2024 08:30:00","120","80"`.
/// Text fields cannot contain double quotes, which keeps splitting on `","`
/// unambiguous.
use crate::modules::data_exchange::domain::measurement::{Measurement, MeasurementValues};
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use regex::Regex;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Decimal,
    OptionalDecimal,
    Text,
    Date,
    Duration,
}

impl FieldKind {
    fn pattern(self) -> &'static str {
        match self {
            FieldKind::Integer => r"[0-9]+",
            FieldKind::Decimal => r"[0-9]+(?:\.[0-9]+)?",
            FieldKind::OptionalDecimal => r"(?:[0-9]+(?:\.[0-9]+)?)?",
            FieldKind::Text => r#"[^"]*"#,
            FieldKind::Date => r"[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}",
            FieldKind::Duration => r"[0-9]+:[0-9]{2}:[0-9]{2}",
        }
    }
}

type Column = (&'static str, FieldKind);

const PERSON_COLUMNS: [Column; 3] = [
    ("Person ID", FieldKind::Integer),
    ("Name", FieldKind::Text),
    ("Date", FieldKind::Date),
];

fn value_columns(category: MeasurementCategory) -> &'static [Column] {
    match category {
        MeasurementCategory::BloodGlucose => &[("Level", FieldKind::Decimal)],
        MeasurementCategory::BloodPressure => &[
            ("Systolic", FieldKind::Integer),
            ("Diastolic", FieldKind::Integer),
        ],
        MeasurementCategory::BloodOxygenSaturation => &[("Percentage", FieldKind::Decimal)],
        MeasurementCategory::Cholesterol => &[
            ("Total", FieldKind::Decimal),
            ("HDL", FieldKind::Decimal),
            ("LDL", FieldKind::Decimal),
            ("Triglycerides", FieldKind::Decimal),
        ],
        MeasurementCategory::Exercise => &[
            ("Activity Type", FieldKind::Text),
            ("Duration", FieldKind::Duration),
            ("Distance", FieldKind::OptionalDecimal),
            ("Calories", FieldKind::Integer),
            ("Minimum Heart Rate", FieldKind::Integer),
            ("Maximum Heart Rate", FieldKind::Integer),
        ],
        MeasurementCategory::Weight => &[("Weight", FieldKind::Decimal)],
        MeasurementCategory::MealConsumption => &[
            ("Meal Id", FieldKind::Integer),
            ("Meal", FieldKind::Text),
            ("Quantity", FieldKind::Decimal),
        ],
        MeasurementCategory::PlannedMeal => {
            &[("Meal Type", FieldKind::Text), ("Meal", FieldKind::Text)]
        }
        MeasurementCategory::BeverageConsumption => &[
            ("Beverage Id", FieldKind::Integer),
            ("Beverage", FieldKind::Text),
            ("Quantity", FieldKind::Integer),
            ("Volume", FieldKind::Decimal),
            ("ABV", FieldKind::Decimal),
            ("Units", FieldKind::Decimal),
        ],
        MeasurementCategory::AlcoholConsumption => &[
            ("Beverage Id", FieldKind::Integer),
            ("Beverage", FieldKind::Text),
            ("Measure", FieldKind::Decimal),
            ("Measure Name", FieldKind::Text),
            ("Quantity", FieldKind::Integer),
            ("ABV", FieldKind::Decimal),
            ("Units", FieldKind::Decimal),
        ],
    }
}

/// Header, record pattern and field codec for one category
#[derive(Debug, Clone)]
pub struct RecordFormat {
    category: MeasurementCategory,
    columns: Vec<Column>,
    pattern: Regex,
}

impl RecordFormat {
    pub fn new(category: MeasurementCategory) -> AppResult<Self> {
        let columns: Vec<Column> = PERSON_COLUMNS
            .iter()
            .chain(value_columns(category))
            .copied()
            .collect();

        let fields: Vec<String> = columns
            .iter()
            .map(|(_, kind)| format!("\"{}\"", kind.pattern()))
            .collect();
        let pattern = Regex::new(&format!("^{}$", fields.join(","))).map_err(|e| {
            AppError::InternalError(format!("Invalid {} record pattern: {}", category, e))
        })?;

        Ok(Self {
            category,
            columns,
            pattern,
        })
    }

    pub fn category(&self) -> MeasurementCategory {
        self.category
    }

    pub fn header(&self) -> String {
        self.columns
            .iter()
            .map(|(name, _)| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Column names must match in order, ignoring case, quoting and a
    /// leading byte order mark
    pub fn check_header(&self, line: &str) -> AppResult<()> {
        let line = line.trim_start_matches('\u{feff}');
        let found: Vec<String> = line
            .split(',')
            .map(|name| name.trim().trim_matches('"').trim().to_lowercase())
            .collect();

        let matches = found.len() == self.columns.len()
            && found
                .iter()
                .zip(&self.columns)
                .all(|(found, (expected, _))| *found == expected.to_lowercase());

        if matches {
            Ok(())
        } else {
            Err(AppError::InvalidRecordFormat(format!(
                "Invalid header for {} import: expected {}, found {}",
                self.category.label(),
                self.header(),
                line.trim()
            )))
        }
    }

    /// Parse one record. `line_number` counts from 1 and includes the header.
    pub fn parse(&self, line: &str, line_number: usize) -> AppResult<Measurement> {
        let invalid_format = || {
            AppError::InvalidRecordFormat(format!("Invalid record format at line {}", line_number))
        };

        let line = line.trim_end_matches('\r');
        if !self.pattern.is_match(line) {
            return Err(invalid_format());
        }

        let inner = line
            .strip_prefix('"')
            .and_then(|l| l.strip_suffix('"'))
            .ok_or_else(invalid_format)?;

        let record = RecordFields {
            fields: inner.split("\",\"").collect(),
            columns: &self.columns,
            line_number,
        };

        let values = match self.category {
            MeasurementCategory::BloodGlucose => MeasurementValues::BloodGlucose {
                level: record.parse(3)?,
            },
            MeasurementCategory::BloodPressure => MeasurementValues::BloodPressure {
                systolic: record.parse(3)?,
                diastolic: record.parse(4)?,
            },
            MeasurementCategory::BloodOxygenSaturation => {
                MeasurementValues::BloodOxygenSaturation {
                    percentage: record.parse(3)?,
                }
            }
            MeasurementCategory::Cholesterol => MeasurementValues::Cholesterol {
                total: record.parse(3)?,
                hdl: record.parse(4)?,
                ldl: record.parse(5)?,
                triglycerides: record.parse(6)?,
            },
            MeasurementCategory::Exercise => MeasurementValues::Exercise {
                activity_type: record.text(3),
                duration: record.text(4),
                distance: record.optional(5)?,
                calories: record.parse(6)?,
                minimum_heart_rate: record.parse(7)?,
                maximum_heart_rate: record.parse(8)?,
            },
            MeasurementCategory::Weight => MeasurementValues::Weight {
                weight: record.parse(3)?,
            },
            MeasurementCategory::MealConsumption => MeasurementValues::MealConsumption {
                meal_id: record.parse(3)?,
                meal: record.text(4),
                quantity: record.parse(5)?,
            },
            MeasurementCategory::PlannedMeal => MeasurementValues::PlannedMeal {
                meal_type: record.text(3),
                meal: record.text(4),
            },
            MeasurementCategory::BeverageConsumption => MeasurementValues::BeverageConsumption {
                beverage_id: record.parse(3)?,
                beverage: record.text(4),
                quantity: record.parse(5)?,
                volume: record.parse(6)?,
                abv: record.parse(7)?,
                units: record.parse(8)?,
            },
            MeasurementCategory::AlcoholConsumption => MeasurementValues::AlcoholConsumption {
                beverage_id: record.parse(3)?,
                beverage: record.text(4),
                measure: record.parse(5)?,
                measure_name: record.text(6),
                quantity: record.parse(7)?,
                abv: record.parse(8)?,
                units: record.parse(9)?,
            },
        };

        Ok(Measurement {
            person_id: record.parse(0)?,
            name: record.text(1),
            date: record.date(2)?,
            values,
        })
    }

    /// Render one measurement as a record line
    pub fn format(&self, measurement: &Measurement) -> AppResult<String> {
        if measurement.category() != self.category {
            return Err(AppError::InvalidInput(format!(
                "Cannot write a {} measurement as {}",
                measurement.category().label(),
                self.category.label()
            )));
        }

        let mut fields = vec![
            measurement.person_id.to_string(),
            clean_text(&measurement.name),
            measurement.date.format(DATE_FORMAT).to_string(),
        ];

        match &measurement.values {
            MeasurementValues::BloodGlucose { level } => fields.push(level.to_string()),
            MeasurementValues::BloodPressure {
                systolic,
                diastolic,
            } => {
                fields.push(systolic.to_string());
                fields.push(diastolic.to_string());
            }
            MeasurementValues::BloodOxygenSaturation { percentage } => {
                fields.push(percentage.to_string())
            }
            MeasurementValues::Cholesterol {
                total,
                hdl,
                ldl,
                triglycerides,
            } => {
                fields.push(total.to_string());
                fields.push(hdl.to_string());
                fields.push(ldl.to_string());
                fields.push(triglycerides.to_string());
            }
            MeasurementValues::Exercise {
                activity_type,
                duration,
                distance,
                calories,
                minimum_heart_rate,
                maximum_heart_rate,
            } => {
                fields.push(clean_text(activity_type));
                fields.push(duration.clone());
                fields.push(distance.map(|d| d.to_string()).unwrap_or_default());
                fields.push(calories.to_string());
                fields.push(minimum_heart_rate.to_string());
                fields.push(maximum_heart_rate.to_string());
            }
            MeasurementValues::Weight { weight } => fields.push(weight.to_string()),
            MeasurementValues::MealConsumption {
                meal_id,
                meal,
                quantity,
            } => {
                fields.push(meal_id.to_string());
                fields.push(clean_text(meal));
                fields.push(quantity.to_string());
            }
            MeasurementValues::PlannedMeal { meal_type, meal } => {
                fields.push(clean_text(meal_type));
                fields.push(clean_text(meal));
            }
            MeasurementValues::BeverageConsumption {
                beverage_id,
                beverage,
                quantity,
                volume,
                abv,
                units,
            } => {
                fields.push(beverage_id.to_string());
                fields.push(clean_text(beverage));
                fields.push(quantity.to_string());
                fields.push(volume.to_string());
                fields.push(abv.to_string());
                fields.push(units.to_string());
            }
            MeasurementValues::AlcoholConsumption {
                beverage_id,
                beverage,
                measure,
                measure_name,
                quantity,
                abv,
                units,
            } => {
                fields.push(beverage_id.to_string());
                fields.push(clean_text(beverage));
                fields.push(measure.to_string());
                fields.push(clean_text(measure_name));
                fields.push(quantity.to_string());
                fields.push(abv.to_string());
                fields.push(units.to_string());
            }
        }

        Ok(fields
            .iter()
            .map(|field| format!("\"{}\"", field))
            .collect::<Vec<_>>()
            .join(","))
    }
}

/// Keep text fields parseable: no quotes, no line breaks
fn clean_text(value: &str) -> String {
    value
        .replace('"', "'")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

struct RecordFields<'a> {
    fields: Vec<&'a str>,
    columns: &'a [Column],
    line_number: usize,
}

impl RecordFields<'_> {
    fn raw(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.trim()).unwrap_or_default()
    }

    fn invalid(&self, index: usize) -> AppError {
        let column = self.columns.get(index).map(|(name, _)| *name).unwrap_or("?");
        AppError::InvalidFieldValue(format!(
            "Invalid value for '{}' at record {}",
            column, self.line_number
        ))
    }

    fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    fn parse<T: FromStr>(&self, index: usize) -> AppResult<T> {
        self.raw(index).parse().map_err(|_| self.invalid(index))
    }

    fn optional<T: FromStr>(&self, index: usize) -> AppResult<Option<T>> {
        match self.raw(index) {
            "" => Ok(None),
            value => value.parse().map(Some).map_err(|_| self.invalid(index)),
        }
    }

    fn date(&self, index: usize) -> AppResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.raw(index), DATE_FORMAT).map_err(|_| self.invalid(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn format(category: MeasurementCategory) -> RecordFormat {
        RecordFormat::new(category).unwrap()
    }

    #[test]
    fn test_every_category_has_a_valid_pattern() {
        for category in MeasurementCategory::ALL {
            let format = format(category);
            assert!(format.header().starts_with("\"Person ID\",\"Name\",\"Date\""));
            assert!(format.check_header(&format.header()).is_ok());
        }
    }

    #[test]
    fn test_header_check_is_lenient_on_case_and_quotes() {
        let format = format(MeasurementCategory::BloodPressure);
        assert!(format
            .check_header("person id, name , DATE,Systolic,\"diastolic\"")
            .is_ok());
    }

    #[test]
    fn test_header_check_ignores_byte_order_mark() {
        let format = format(MeasurementCategory::Weight);
        assert!(format
            .check_header("\u{feff}\"Person ID\",\"Name\",\"Date\",\"Weight\"")
            .is_ok());
    }

    #[test]
    fn test_header_mismatch_is_a_format_error() {
        let format = format(MeasurementCategory::BloodGlucose);
        let result = format.check_header("2024-01-01,5.6");
        assert!(matches!(result, Err(AppError::InvalidRecordFormat(_))));
    }

    #[test]
    fn test_parse_blood_pressure_record() {
        let format = format(MeasurementCategory::BloodPressure);
        let m = format
            .parse(r#""7","Jo Smith","05/01/2024 08:30:00","120","80""#, 2)
            .unwrap();

        assert_eq!(m.person_id, 7);
        assert_eq!(m.name, "Jo Smith");
        assert_eq!(
            m.date,
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
        assert_eq!(
            m.values,
            MeasurementValues::BloodPressure {
                systolic: 120,
                diastolic: 80
            }
        );
    }

    #[test]
    fn test_parse_exercise_with_missing_distance() {
        let format = format(MeasurementCategory::Exercise);
        let m = format
            .parse(
                r#""1","Jo","05/01/2024 08:30:00","Yoga","0:45:00","","150","70","110""#,
                5,
            )
            .unwrap();

        match m.values {
            MeasurementValues::Exercise {
                distance, duration, ..
            } => {
                assert_eq!(distance, None);
                assert_eq!(duration, "0:45:00");
            }
            other => panic!("unexpected values {:?}", other),
        }
    }

    #[test]
    fn test_parse_cholesterol_and_beverage_records() {
        let cholesterol = format(MeasurementCategory::Cholesterol)
            .parse(r#""2","Jo","10/02/2024 09:00:00","5.2","1.4","3.1","1.6""#, 2)
            .unwrap();
        assert_eq!(
            cholesterol.values,
            MeasurementValues::Cholesterol {
                total: 5.2,
                hdl: 1.4,
                ldl: 3.1,
                triglycerides: 1.6
            }
        );

        let beverage = format(MeasurementCategory::BeverageConsumption)
            .parse(
                r#""2","Jo","10/02/2024 19:30:00","4","Pale Ale","2","568","4.5","5.11""#,
                2,
            )
            .unwrap();
        assert_eq!(beverage.category(), MeasurementCategory::BeverageConsumption);
        assert_eq!(
            format(MeasurementCategory::BeverageConsumption)
                .format(&beverage)
                .unwrap(),
            r#""2","Jo","10/02/2024 19:30:00","4","Pale Ale","2","568","4.5","5.11""#
        );
    }

    #[test]
    fn test_pattern_mismatch_reports_line() {
        let format = format(MeasurementCategory::Weight);
        let err = format.parse("1,Jo,05/01/2024,80", 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid record format: Invalid record format at line 4"
        );
    }

    #[test]
    fn test_impossible_date_reports_field() {
        let format = format(MeasurementCategory::Weight);
        let err = format
            .parse(r#""1","Jo","31/02/2024 08:30:00","80.2""#, 3)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid field value: Invalid value for 'Date' at record 3"
        );
    }

    #[test]
    fn test_format_output_parses_back() {
        let format = format(MeasurementCategory::MealConsumption);
        let m = Measurement {
            person_id: 3,
            name: "Sam \"the cook\"".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            values: MeasurementValues::MealConsumption {
                meal_id: 9,
                meal: "Porridge".to_string(),
                quantity: 1.5,
            },
        };

        let line = format.format(&m).unwrap();
        assert_eq!(
            line,
            r#""3","Sam 'the cook'","01/06/2024 12:00:00","9","Porridge","1.5""#
        );
        assert_eq!(format.parse(&line, 2).unwrap().person_id, 3);
    }

    #[test]
    fn test_format_rejects_other_category() {
        let format = format(MeasurementCategory::Weight);
        let m = Measurement {
            person_id: 1,
            name: "Jo".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            values: MeasurementValues::BloodGlucose { level: 5.6 },
        };
        assert!(format.format(&m).is_err());
    }
}
