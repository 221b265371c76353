//! City records as shown in the directory

use serde::Deserialize;
use serde_json::Value;

/// Label shown when the dataset gives a country as a link instead of a name.
pub const COUNTRY_PLACEHOLDER: &str = "Country Code or Name";

/// Label shown when the dataset gives no country at all.
pub const COUNTRY_MISSING: &str = "N/A";

/// One row of the city directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityRecord {
    pub name: String,
    pub country: String,
    pub timezone: String,
    pub population: u64,
}

impl CityRecord {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        timezone: impl Into<String>,
        population: u64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            timezone: timezone.into(),
            population,
        }
    }
}

/// Normalize a raw country value.
///
/// Link-like values (`scheme://...`) are replaced by [`COUNTRY_PLACEHOLDER`]
/// without being resolved. Missing or blank values become [`COUNTRY_MISSING`].
pub fn normalize_country(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if looks_like_url(value) => COUNTRY_PLACEHOLDER.to_string(),
        Some(value) if !value.is_empty() => value.to_string(),
        _ => COUNTRY_MISSING.to_string(),
    }
}

fn looks_like_url(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Fields of one dataset record, as served by the OpenDataSoft records API.
#[derive(Debug, Default, Deserialize)]
pub struct DatasetFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<Value>,
    #[serde(default)]
    pub cou_name_en: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub population: Option<f64>,
}

impl DatasetFields {
    fn raw_country(&self) -> Option<String> {
        match &self.country {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(Value::Null) | None => self.cou_name_en.clone(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => None,
        }
    }
}

impl From<DatasetFields> for CityRecord {
    fn from(fields: DatasetFields) -> Self {
        let country = normalize_country(fields.raw_country().as_deref());
        let population = fields
            .population
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p as u64)
            .unwrap_or(0);

        CityRecord {
            name: fields.name.unwrap_or_default(),
            country,
            timezone: fields.timezone.unwrap_or_default(),
            population,
        }
    }
}
