use crate::domain::record::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Near-Earth-Object feed for a date window.
///
/// Buckets are keyed by calendar date, so iteration order is chronological.
#[derive(Debug, Clone, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub element_count: u64,
    pub links: FeedLinks,
    pub near_earth_objects: BTreeMap<NaiveDate, Vec<Record>>,
}

/// Opaque URLs returned by the API. They already carry the window and the
/// api key and are fetched verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedLinks {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, rename = "self")]
    pub self_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Previous => "previous",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" => Ok(Direction::Next),
            "previous" | "prev" => Ok(Direction::Previous),
            other => anyhow::bail!("unknown direction: {other}"),
        }
    }
}

impl NeoFeed {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.near_earth_objects.keys().copied().collect()
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.near_earth_objects.keys().next().copied()
    }

    pub fn bucket(&self, date: NaiveDate) -> Option<&[Record]> {
        self.near_earth_objects.get(&date).map(Vec::as_slice)
    }

    pub fn link(&self, direction: Direction) -> Option<&str> {
        let link = match direction {
            Direction::Next => self.links.next.as_deref(),
            Direction::Previous => self.links.previous.as_deref(),
        };
        link.filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::NeoFeed;
    use serde_json::{json, Value};

    pub fn asteroid(id: &str) -> Value {
        json!({
            "links": {"self": format!("http://api.nasa.gov/neo/rest/v1/neo/{id}")},
            "id": id,
            "neo_reference_id": id,
            "name": format!("({id})"),
            "nasa_jpl_url": format!("https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr={id}"),
            "absolute_magnitude_h": 25.3,
            "estimated_diameter": {
                "kilometers": {"estimated_diameter_min": 0.0201, "estimated_diameter_max": 0.0449},
                "meters": {"estimated_diameter_min": 20.1, "estimated_diameter_max": 44.9},
                "miles": {"estimated_diameter_min": 0.0125, "estimated_diameter_max": 0.0279},
                "feet": {"estimated_diameter_min": 65.9, "estimated_diameter_max": 147.3}
            },
            "is_potentially_hazardous_asteroid": false,
            "close_approach_data": [
                {
                    "close_approach_date": "2024-01-01",
                    "close_approach_date_full": "2024-Jan-01 04:15",
                    "epoch_date_close_approach": 1704082500000u64,
                    "relative_velocity": {
                        "kilometers_per_second": "9.12",
                        "kilometers_per_hour": "32832.1",
                        "miles_per_hour": "20400.7"
                    },
                    "miss_distance": {
                        "astronomical": "0.021",
                        "lunar": "8.2",
                        "kilometers": "3141592",
                        "miles": "1952041"
                    },
                    "orbiting_body": "Earth"
                }
            ],
            "is_sentry_object": false
        })
    }

    pub fn feed_json(dates: &[&str], next: Option<&str>, previous: Option<&str>) -> Value {
        let mut buckets = serde_json::Map::new();
        for (i, date) in dates.iter().enumerate() {
            let id = format!("35425{i:02}");
            buckets.insert(date.to_string(), json!([asteroid(&id)]));
        }
        json!({
            "links": {"next": next, "previous": previous, "self": "http://api.nasa.gov/neo/rest/v1/feed"},
            "element_count": dates.len(),
            "near_earth_objects": buckets
        })
    }

    pub fn feed(dates: &[&str], next: Option<&str>, previous: Option<&str>) -> NeoFeed {
        serde_json::from_value(feed_json(dates, next, previous)).unwrap()
    }
}
