//! OpenMensa records as returned by the v2 JSON API.

use crate::error::{MensaError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A single canteen, without geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canteen {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
}

impl Canteen {
    /// Strip the stray newlines upstream leaves in some text fields.
    pub fn normalized(mut self) -> Self {
        self.name = strip_newlines(&self.name);
        self.city = strip_newlines(&self.city);
        self.address = strip_newlines(&self.address);
        self
    }
}

fn strip_newlines(s: &str) -> String {
    s.replace('\n', "")
}

/// Opening status of one canteen on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanteenDate {
    pub date: NaiveDate,
    #[serde(default)]
    pub closed: bool,
}

/// A single meal offered on a (canteen, date) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prices: PriceSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
}

/// Prices per audience. Upstream sends `null` for audiences it has no price for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub students: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pupils: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub others: f64,
}

impl PriceSet {
    pub fn for_audience(&self, audience: Audience) -> f64 {
        match audience {
            Audience::Student => self.students,
            Audience::Employee => self.employees,
            Audience::Pupil => self.pupils,
            Audience::Other => self.others,
        }
    }
}

/// Price audiences, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Student,
    Pupil,
    Employee,
    Other,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Audience::Student,
        Audience::Pupil,
        Audience::Employee,
        Audience::Other,
    ];

    /// Label used in price lines, matching the API field names
    pub fn label(self) -> &'static str {
        match self {
            Audience::Student => "students",
            Audience::Pupil => "pupils",
            Audience::Employee => "employees",
            Audience::Other => "others",
        }
    }
}

/// One resolved day together with its meals
#[derive(Debug, Clone, PartialEq)]
pub struct DayMeals {
    pub day: CanteenDate,
    pub meals: Vec<Meal>,
}

/// One page of the canteen listing plus the advertised page count
#[derive(Debug, Clone, PartialEq)]
pub struct CanteenPage {
    pub canteens: Vec<Canteen>,
    pub total_pages: u32,
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let well_formed = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(MensaError::Validation(format!(
            "'{}' is not a YYYY-MM-DD date",
            s
        )));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| MensaError::Validation(format!("'{}' is not a valid date: {}", s, e)))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
