//! Body-mass-index calculator.
//!
//! Takes the raw form inputs (height in centimeters, weight in kilograms)
//! and returns the index with its weight category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Half-open bands: [0, 18.5), [18.5, 25), [25, 30), [30, ∞).
    pub fn from_index(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiReading {
    pub fn compute(height_cm: f64, weight_kg: f64) -> Result<Self, ValidationError> {
        ensure_positive("Height", height_cm)?;
        ensure_positive("Weight", weight_kg)?;
        let height_m = height_cm / 100.0;
        let bmi = weight_kg / (height_m * height_m);
        Ok(Self {
            height_cm,
            weight_kg,
            bmi,
            category: BmiCategory::from_index(bmi),
        })
    }

    /// Validate the raw text inputs and compute.
    pub fn from_inputs(height: &str, weight: &str) -> Result<Self, ValidationError> {
        let (height, weight) = (height.trim(), weight.trim());
        if height.is_empty() || weight.is_empty() {
            return Err(ValidationError::MissingInput("both height and weight".into()));
        }
        let height_cm = parse_number("height", height)?;
        let weight_kg = parse_number("weight", weight)?;
        Self::compute(height_cm, weight_kg)
    }

    /// Index rounded for display, e.g. `22.49`.
    pub fn display_bmi(&self) -> String {
        format!("{:.2}", self.bmi)
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ValidationError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field: field.into(),
            value: raw.into(),
        })
}

fn ensure_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive {
            field: field.into(),
        })
    }
}
