//! Catalog loading and normalization
//!
//! A catalog is an ordered, immutable list of [`CarRecord`]s. Rows come from a
//! CSV file, a JSON array, or the builtin seed fleet. Every categorical field is
//! lowercased and trimmed on load, numeric fields are coerced leniently, and a
//! feature text is derived for the vectorizer.
//!
//! # Source shape
//!
//! ```text
//! Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC[,Year]
//! ```
//!
//! Header names are matched case-insensitively. Missing columns are treated as
//! empty values rather than errors.

use crate::error::CatalogError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

lazy_static! {
    /// Leading non-negative real number, e.g. "18" in "18 km/l"
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\+?(\d+(?:\.\d*)?|\.\d+)").unwrap();

    /// Leading integer, used for model years
    static ref LEADING_INTEGER: Regex = Regex::new(r"^\+?(\d+)").unwrap();
}

/// Column names of a catalog row
pub const COLUMNS: [&str; 9] = [
    "Car_ID",
    "Brand",
    "Model",
    "Fuel_Type",
    "Transmission",
    "Body_Type",
    "Mileage",
    "Engine_CC",
    "Year",
];

/// One normalized catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    #[serde(rename = "Car_ID")]
    pub id: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Body_Type")]
    pub body_type: String,
    /// Fuel efficiency
    #[serde(rename = "Mileage")]
    pub mileage: f64,
    /// Engine displacement in cc
    #[serde(rename = "Engine_CC")]
    pub engine_cc: f64,
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Derived from the categorical fields, never persisted
    #[serde(skip)]
    pub feature_text: String,
}

impl CarRecord {
    /// Build a record from raw attribute values, normalizing as it goes
    pub fn from_raw(row: &RawCarRow) -> Self {
        let brand = normalize_text(&row.brand);
        let model = normalize_text(&row.model);
        let fuel_type = normalize_text(&row.fuel_type);
        let transmission = normalize_text(&row.transmission);
        let body_type = normalize_text(&row.body_type);

        let feature_text = feature_text(&[&brand, &model, &fuel_type, &transmission, &body_type]);

        Self {
            id: row.car_id.trim().to_string(),
            brand,
            model,
            fuel_type,
            transmission,
            body_type,
            mileage: parse_number(&row.mileage),
            engine_cc: parse_number(&row.engine_cc),
            year: parse_year(&row.year),
            feature_text,
        }
    }
}

/// Un-normalized row as read from a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCarRow {
    pub car_id: String,
    pub brand: String,
    pub model: String,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    pub mileage: String,
    pub engine_cc: String,
    pub year: String,
}

impl RawCarRow {
    /// Build a row by looking up each column through `field`
    fn from_lookup(mut field: impl FnMut(&str) -> Option<String>) -> Self {
        let mut get = |name: &str| field(name).unwrap_or_default();
        Self {
            car_id: get("Car_ID"),
            brand: get("Brand"),
            model: get("Model"),
            fuel_type: get("Fuel_Type"),
            transmission: get("Transmission"),
            body_type: get("Body_Type"),
            mileage: get("Mileage"),
            engine_cc: get("Engine_CC"),
            year: get("Year"),
        }
    }
}

/// Lowercase and trim a categorical value
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Join already-normalized values into a feature text, skipping empty ones
pub fn feature_text(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coerce a raw value to a non-negative real number
///
/// Uses the leading number of the value ("1,498 cc" -> 1498.0). Anything that
/// does not start with a number becomes 0.
pub fn parse_number(value: &str) -> f64 {
    let cleaned = value.trim().replace(',', "");
    LEADING_NUMBER
        .captures(&cleaned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn parse_year(value: &str) -> Option<i32> {
    LEADING_INTEGER
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .filter(|y| *y > 0)
}

/// An ordered, immutable set of cars
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cars: Vec<CarRecord>,
}

impl Catalog {
    /// Build a catalog from raw rows
    ///
    /// Rows without an id get their 1-based position as id, or the next
    /// number up when an explicit id already holds it.
    pub fn from_rows(rows: &[RawCarRow]) -> Result<Self, CatalogError> {
        let mut cars: Vec<CarRecord> = rows.iter().map(CarRecord::from_raw).collect();

        let mut seen = HashSet::new();
        for car in cars.iter().filter(|c| !c.id.is_empty()) {
            if !seen.insert(car.id.clone()) {
                return Err(CatalogError::DuplicateId(car.id.clone()));
            }
        }

        // position-derived ids skip any id claimed explicitly
        for (position, car) in cars.iter_mut().enumerate() {
            if car.id.is_empty() {
                let mut candidate = position + 1;
                while seen.contains(&candidate.to_string()) {
                    candidate += 1;
                }
                car.id = candidate.to_string();
                seen.insert(car.id.clone());
            }
        }

        Ok(Self { cars })
    }

    /// Load a catalog file, picking the parser from its extension
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let io_err = |source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        };

        let catalog = match extension.as_str() {
            "csv" => {
                let file = std::fs::File::open(path).map_err(io_err)?;
                Self::from_csv_reader(file)?
            }
            "json" => {
                let text = std::fs::read_to_string(path).map_err(io_err)?;
                Self::from_json_str(&text)?
            }
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };

        info!("Loaded {} cars from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse CSV with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(RawCarRow::from_lookup(|name| {
                let wanted = name.to_ascii_lowercase();
                headers
                    .iter()
                    .position(|h| *h == wanted)
                    .and_then(|idx| record.get(idx))
                    .map(str::to_string)
            }));
        }

        Self::from_rows(&rows)
    }

    /// Parse a JSON array of row objects
    ///
    /// Values may be strings, numbers or booleans; nulls count as missing.
    /// Blank text is an empty catalog, like a header-only CSV.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let objects: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(text)?;

        let rows: Vec<RawCarRow> = objects
            .iter()
            .map(|object| {
                RawCarRow::from_lookup(|name| {
                    object
                        .iter()
                        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                        .and_then(|(_, value)| scalar_to_string(value))
                })
            })
            .collect();

        Self::from_rows(&rows)
    }

    /// The builtin seed fleet
    pub fn builtin() -> Self {
        let rows: Vec<RawCarRow> = SEED_FLEET
            .iter()
            .enumerate()
            .map(|(idx, (brand, model, body, fuel, transmission, mileage, engine))| RawCarRow {
                car_id: (idx + 1).to_string(),
                brand: brand.to_string(),
                model: model.to_string(),
                fuel_type: fuel.to_string(),
                transmission: transmission.to_string(),
                body_type: body.to_string(),
                mileage: mileage.to_string(),
                engine_cc: engine.to_string(),
                year: String::new(),
            })
            .collect();

        Self {
            cars: rows.iter().map(CarRecord::from_raw).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn cars(&self) -> &[CarRecord] {
        &self.cars
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarRecord> {
        self.cars.iter()
    }

    /// Look up a car by id
    pub fn get(&self, id: &str) -> Option<&CarRecord> {
        let id = id.trim();
        self.cars.iter().find(|c| c.id == id)
    }

    /// Feature texts in catalog order
    pub fn feature_texts(&self) -> Vec<&str> {
        self.cars.iter().map(|c| c.feature_text.as_str()).collect()
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// (brand, model, body, fuel, transmission, mileage, engine)
const SEED_FLEET: [(&str, &str, &str, &str, &str, &str, &str); 12] = [
    ("Honda", "City", "Sedan", "Petrol", "Manual / Automatic", "18 km/l", "1498 cc"),
    ("Hyundai", "Verna", "Sedan", "Petrol", "Manual / Automatic", "20 km/l", "1497 cc"),
    ("Skoda", "Slavia", "Sedan", "Petrol", "Manual / Automatic", "19 km/l", "1498 cc"),
    ("Hyundai", "Creta", "SUV", "Petrol / Diesel", "Manual / Automatic", "17 km/l", "1497 cc"),
    ("Kia", "Seltos", "SUV", "Petrol / Diesel", "Manual / Automatic", "16 km/l", "1497 cc"),
    ("Mahindra", "XUV700", "SUV", "Petrol / Diesel", "Manual / Automatic", "15 km/l", "1999 cc"),
    ("Maruti Suzuki", "Baleno", "Hatchback", "Petrol", "Manual / Automatic", "22 km/l", "1197 cc"),
    ("Hyundai", "i20", "Hatchback", "Petrol", "Manual / Automatic", "20 km/l", "1197 cc"),
    ("Tata", "Altroz", "Hatchback", "Petrol / Diesel", "Manual", "23 km/l", "1199 cc"),
    ("Maruti Suzuki", "Alto K10", "Small Car", "Petrol", "Manual / Automatic", "24 km/l", "998 cc"),
    ("Maruti Suzuki", "S-Presso", "Small Car", "Petrol", "Manual / Automatic", "25 km/l", "998 cc"),
    ("Renault", "Kwid", "Small Car", "Petrol", "Manual / Automatic", "22 km/l", "999 cc"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_normalizes_categorical_fields() {
        let row = RawCarRow {
            car_id: " 7 ".to_string(),
            brand: "  Toyota ".to_string(),
            model: "Corolla".to_string(),
            fuel_type: "PETROL".to_string(),
            transmission: "Automatic".to_string(),
            body_type: " Sedan".to_string(),
            mileage: "18".to_string(),
            engine_cc: "1798".to_string(),
            year: "2021".to_string(),
        };

        let car = CarRecord::from_raw(&row);
        assert_eq!(car.id, "7");
        assert_eq!(car.brand, "toyota");
        assert_eq!(car.fuel_type, "petrol");
        assert_eq!(car.body_type, "sedan");
        assert_eq!(car.feature_text, "toyota corolla petrol automatic sedan");
        assert_eq!(car.year, Some(2021));
    }

    #[test]
    fn test_identical_categoricals_share_feature_text() {
        let a = RawCarRow {
            brand: "Kia".to_string(),
            model: "Seltos".to_string(),
            mileage: "16".to_string(),
            ..Default::default()
        };
        let b = RawCarRow {
            brand: " KIA".to_string(),
            model: "seltos ".to_string(),
            mileage: "11".to_string(),
            ..Default::default()
        };
        assert_eq!(CarRecord::from_raw(&a).feature_text, CarRecord::from_raw(&b).feature_text);
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(parse_number("18 km/l"), 18.0);
        assert_eq!(parse_number("1,498 cc"), 1498.0);
        assert_eq!(parse_number("17.5"), 17.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("-4"), 0.0);
    }

    #[test]
    fn test_csv_catalog() {
        let csv = "Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC\n\
                   1,Toyota,Corolla,Petrol,Automatic,Sedan,18,1798\n\
                   2,Honda,Civic,Diesel,Manual,Sedan,oops,1597\n";
        let catalog = Catalog::from_csv_reader(csv.as_bytes()).expect("parse csv");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.cars()[1].brand, "honda");
        assert_eq!(catalog.cars()[1].mileage, 0.0);
        assert_eq!(catalog.cars()[1].year, None);
    }

    #[test]
    fn test_header_only_csv_is_empty_catalog() {
        let csv = "Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC\n";
        let catalog = Catalog::from_csv_reader(csv.as_bytes()).expect("parse csv");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_json_catalog_accepts_numbers() {
        let json = r#"[
            {"Car_ID": 10, "Brand": "BMW", "Model": "X1", "Fuel_Type": "Diesel",
             "Transmission": "Automatic", "Body_Type": "SUV", "Mileage": 15.5,
             "Engine_CC": 1995, "Year": 2020},
            {"Brand": "Tata", "Model": "Nexon EV", "Fuel_Type": "Electric", "Mileage": null}
        ]"#;
        let catalog = Catalog::from_json_str(json).expect("parse json");

        assert_eq!(catalog.len(), 2);
        let bmw = catalog.get("10").expect("bmw present");
        assert_eq!(bmw.mileage, 15.5);
        assert_eq!(bmw.year, Some(2020));
        // second row has no id and takes its position
        assert_eq!(catalog.cars()[1].id, "2");
        assert_eq!(catalog.cars()[1].mileage, 0.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"Car_ID": "a", "Brand": "Kia"}, {"Car_ID": "a", "Brand": "Tata"}]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC,Year")
            .expect("write header");
        writeln!(file, "c1,Renault,Kwid,Petrol,Manual,Hatchback,22 km/l,999 cc,2019")
            .expect("write row");

        let catalog = Catalog::load(file.path()).expect("load catalog");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.cars()[0].engine_cc, 999.0);
    }

    #[test]
    fn test_empty_json_file_is_empty_catalog() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("temp file");

        let catalog = Catalog::load(file.path()).expect("empty file loads");
        assert!(catalog.is_empty());

        writeln!(file, "  ").expect("write blanks");
        let catalog = Catalog::load(file.path()).expect("blank file loads");
        assert!(catalog.is_empty());

        assert!(Catalog::from_json_str("[]").expect("empty array").is_empty());
    }

    #[test]
    fn test_missing_id_skips_explicit_ids() {
        let csv = "Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC\n\
                   2,Kia,Seltos,Diesel,Manual,SUV,16,1497\n\
                   ,Tata,Nexon,Petrol,Manual,SUV,17,1199\n\
                   ,Renault,Kwid,Petrol,Manual,Hatchback,22,999\n";
        let catalog = Catalog::from_csv_reader(csv.as_bytes()).expect("ids do not clash");

        let ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
        assert_eq!(catalog.get("3").expect("nexon").model, "nexon");
    }

    #[test]
    fn test_explicit_id_later_in_file_is_kept() {
        let json = r#"[{"Brand": "Tata"}, {"Car_ID": "1", "Brand": "Kia"}]"#;
        let catalog = Catalog::from_json_str(json).expect("ids do not clash");

        assert_eq!(catalog.get("1").expect("kia").brand, "kia");
        assert_eq!(catalog.get("2").expect("tata").brand, "tata");
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Catalog::load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Catalog::load(Path::new("cars.xlsx")).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn test_builtin_fleet() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        let city = catalog.get("1").expect("honda city");
        assert_eq!(city.brand, "honda");
        assert_eq!(city.mileage, 18.0);
        assert_eq!(city.engine_cc, 1498.0);
    }
}
