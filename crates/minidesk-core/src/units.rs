//! Unit conversion between multiplicative units of one category.
//!
//! Each unit carries a rate to its category's base unit; converting is
//! `value * rate(from) / rate(to)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Volume,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 3] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Volume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
        }
    }

    /// Units of this category. Bases: meter, gram, liter.
    pub fn units(self) -> &'static [UnitDef] {
        match self {
            UnitCategory::Length => LENGTH,
            UnitCategory::Weight => WEIGHT,
            UnitCategory::Volume => VOLUME,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One unit of a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    /// Canonical (plural) name.
    pub name: &'static str,
    /// Other accepted spellings: singular form and abbreviations.
    pub aliases: &'static [&'static str],
    /// Rate to the category's base unit.
    pub rate: f64,
}

impl UnitDef {
    fn matches(&self, wanted: &str) -> bool {
        self.name == wanted || self.aliases.contains(&wanted)
    }
}

const fn unit(name: &'static str, aliases: &'static [&'static str], rate: f64) -> UnitDef {
    UnitDef {
        name,
        aliases,
        rate,
    }
}

const LENGTH: &[UnitDef] = &[
    unit("millimeters", &["millimeter", "mm"], 0.001),
    unit("centimeters", &["centimeter", "cm"], 0.01),
    unit("meters", &["meter", "m"], 1.0),
    unit("kilometers", &["kilometer", "km"], 1000.0),
    unit("inches", &["inch", "in"], 0.0254),
    unit("feet", &["foot", "ft"], 0.3048),
    unit("yards", &["yard", "yd"], 0.9144),
    unit("miles", &["mile", "mi"], 1609.344),
];

const WEIGHT: &[UnitDef] = &[
    unit("milligrams", &["milligram", "mg"], 0.001),
    unit("grams", &["gram", "g"], 1.0),
    unit("kilograms", &["kilogram", "kg"], 1000.0),
    unit("ounces", &["ounce", "oz"], 28.349523125),
    unit("pounds", &["pound", "lb", "lbs"], 453.59237),
];

const VOLUME: &[UnitDef] = &[
    unit("milliliters", &["milliliter", "ml"], 0.001),
    unit("liters", &["liter", "l"], 1.0),
    unit("cups", &["cup"], 0.2365882365),
    unit("pints", &["pint", "pt"], 0.473176473),
    unit("quarts", &["quart", "qt"], 0.946352946),
    unit("gallons", &["gallon", "gal"], 3.785411784),
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Unit {
    name: &'static str,
    category: UnitCategory,
    rate: f64,
}

fn lookup(name: &str) -> Result<Unit, ValidationError> {
    let wanted = name.trim().to_ascii_lowercase();
    UnitCategory::ALL
        .iter()
        .find_map(|&category| {
            category
                .units()
                .iter()
                .find(|def| def.matches(&wanted))
                .map(|def| Unit {
                    name: def.name,
                    category,
                    rate: def.rate,
                })
        })
        .ok_or_else(|| ValidationError::UnknownUnit(name.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub category: UnitCategory,
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
}

impl Conversion {
    /// Result rounded to `precision` decimals, e.g. `1000.00`.
    pub fn display(&self, precision: usize) -> String {
        format!("{:.*}", precision, self.result)
    }
}

/// Convert `value` between two units of the same category.
///
/// Unit names are case-insensitive; singular forms and common
/// abbreviations are accepted.
pub fn convert(value: f64, from: &str, to: &str) -> Result<Conversion, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: "value".into(),
            value: value.to_string(),
        });
    }
    let from = lookup(from)?;
    let to = lookup(to)?;
    if from.category != to.category {
        return Err(ValidationError::IncompatibleUnits {
            from: from.name.into(),
            from_category: from.category.name().into(),
            to: to.name.into(),
            to_category: to.category.name().into(),
        });
    }
    Ok(Conversion {
        category: from.category,
        value,
        from: from.name.into(),
        to: to.name.into(),
        result: value * from.rate / to.rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn kilometers_to_meters() {
        let c = convert(1.0, "kilometers", "meters").unwrap();
        assert!(approx(c.result, 1000.0));
        assert_eq!(c.display(2), "1000.00");
        assert_eq!(c.category, UnitCategory::Length);
    }

    #[test]
    fn accepts_singular_and_mixed_case() {
        let c = convert(2.0, "Pound", "KILOGRAM").unwrap();
        assert!(approx(c.result, 0.90718474));
        assert_eq!(c.from, "pounds");
        assert_eq!(c.to, "kilograms");
    }

    #[test]
    fn irregular_singulars_resolve() {
        let c = convert(1.0, "inch", "centimeters").unwrap();
        assert!(approx(c.result, 2.54));
        assert_eq!(c.from, "inches");

        let c = convert(1.0, "foot", "meters").unwrap();
        assert!(approx(c.result, 0.3048));
        assert_eq!(c.from, "feet");

        let c = convert(3.0, "ft", "in").unwrap();
        assert!(approx(c.result, 36.0));
    }

    #[test]
    fn aliases_are_unique_across_categories() {
        let mut seen = std::collections::HashSet::new();
        for category in UnitCategory::ALL {
            for def in category.units() {
                assert!(seen.insert(def.name), "duplicate {}", def.name);
                for alias in def.aliases {
                    assert!(seen.insert(*alias), "duplicate {alias}");
                }
            }
        }
    }

    #[test]
    fn same_unit_is_identity() {
        let c = convert(3.5, "cups", "cups").unwrap();
        assert!(approx(c.result, 3.5));
    }

    #[test]
    fn rejects_cross_category() {
        let err = convert(1.0, "liters", "meters").unwrap_err();
        assert!(matches!(err, ValidationError::IncompatibleUnits { .. }));
    }

    #[test]
    fn rejects_unknown_unit() {
        assert_eq!(
            convert(1.0, "parsecs", "meters").unwrap_err(),
            ValidationError::UnknownUnit("parsecs".into())
        );
    }

    #[test]
    fn every_category_has_a_base_unit() {
        for category in UnitCategory::ALL {
            assert!(category.units().iter().any(|def| def.rate == 1.0));
        }
    }
}
