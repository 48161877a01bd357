//! Summary statistics over every record, in either naming convention.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{info_span, Instrument};

use query_engine_document::document::helpers::{all_fields, default_sort, empty_filter, everything};
use query_engine_metadata::metadata::{field_value, Document, LogicalField};

use crate::envelope::Envelope;
use crate::error::Error;
use crate::state::State;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// `{}` when there are no records.
    #[serde(serialize_with = "empty_when_none")]
    pub overall: Option<OverallStats>,
    pub by_city: Vec<CityStats>,
}

/// Averages skip records without a numeric reading, and are `null` when no
/// record has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
    #[serde(rename = "avgNO")]
    pub avg_no: Option<f64>,
    #[serde(rename = "avgNOX")]
    pub avg_nox: Option<f64>,
    #[serde(rename = "avgBenzene")]
    pub avg_benzene: Option<f64>,
    #[serde(rename = "avgToluene")]
    pub avg_toluene: Option<f64>,
    #[serde(rename = "avgTemp")]
    pub avg_temp: Option<f64>,
    #[serde(rename = "avgRH")]
    pub avg_rh: Option<f64>,
    #[serde(rename = "maxNO")]
    pub max_no: Option<f64>,
    #[serde(rename = "minNO")]
    pub min_no: Option<f64>,
    /// Distinct city names, sorted.
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    /// `null` groups records without a city.
    #[serde(rename = "_id")]
    pub city: Option<String>,
    pub count: u64,
    #[serde(rename = "avgNO")]
    pub avg_no: Option<f64>,
    #[serde(rename = "avgTemp")]
    pub avg_temp: Option<f64>,
}

/// Compute statistics over the whole collection.
pub async fn stats(state: &State) -> Result<Envelope<Stats>, Error> {
    let records = state
        .store
        .find(&empty_filter(), &all_fields(), &default_sort(), everything())
        .instrument(info_span!("Find records"))
        .await?;
    Ok(Envelope::success(summarize(&records)))
}

/// Group and average the records.
pub fn summarize(records: &[Document]) -> Stats {
    if records.is_empty() {
        return Stats {
            overall: None,
            by_city: vec![],
        };
    }

    let mut no = Mean::default();
    let mut nox = Mean::default();
    let mut benzene = Mean::default();
    let mut toluene = Mean::default();
    let mut temp = Mean::default();
    let mut rh = Mean::default();
    let mut max_no: Option<f64> = None;
    let mut min_no: Option<f64> = None;
    let mut cities = BTreeSet::new();
    let mut groups: BTreeMap<Option<String>, (u64, Mean, Mean)> = BTreeMap::new();

    for record in records {
        let reading = |field| field_value(record, field).and_then(serde_json::Value::as_f64);
        let city = field_value(record, LogicalField::City)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        let record_no = reading(LogicalField::No);
        let record_temp = reading(LogicalField::Temperature);
        no.add(record_no);
        nox.add(reading(LogicalField::Nox));
        benzene.add(reading(LogicalField::Benzene));
        toluene.add(reading(LogicalField::Toluene));
        temp.add(record_temp);
        rh.add(reading(LogicalField::RelativeHumidity));
        if let Some(value) = record_no {
            max_no = Some(max_no.map_or(value, |max| max.max(value)));
            min_no = Some(min_no.map_or(value, |min| min.min(value)));
        }
        if let Some(city) = &city {
            cities.insert(city.clone());
        }

        let (count, city_no, city_temp) = groups.entry(city).or_default();
        *count += 1;
        city_no.add(record_no);
        city_temp.add(record_temp);
    }

    let mut by_city: Vec<CityStats> = groups
        .into_iter()
        .map(|(city, (count, city_no, city_temp))| CityStats {
            city,
            count,
            avg_no: city_no.value(),
            avg_temp: city_temp.value(),
        })
        .collect();
    // stable: ties stay in city order
    by_city.sort_by(|a, b| b.count.cmp(&a.count));

    Stats {
        overall: Some(OverallStats {
            total_records: records.len() as u64,
            avg_no: no.value(),
            avg_nox: nox.value(),
            avg_benzene: benzene.value(),
            avg_toluene: toluene.value(),
            avg_temp: temp.value(),
            avg_rh: rh.value(),
            max_no,
            min_no,
            cities: cities.into_iter().collect(),
        }),
        by_city,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn empty_when_none<S: Serializer>(
    overall: &Option<OverallStats>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match overall {
        Some(overall) => overall.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn no_records_give_empty_overall() {
        assert_eq!(
            serde_json::to_value(summarize(&[])).unwrap(),
            json!({"overall": {}, "by_city": []})
        );
    }

    #[test]
    fn reads_both_conventions() {
        let records = [
            document(json!({"city": "Pune", "no": 10, "temp": 20})),
            document(json!({"City": "Pune", "NO (µg/m3)": 20, "Temp (°C)": 30})),
            document(json!({"city": "Agra", "no": "n/a"})),
        ];
        let stats = summarize(&records);
        let overall = stats.overall.unwrap();
        assert_eq!(overall.total_records, 3);
        assert_eq!(overall.avg_no, Some(15.0));
        assert_eq!(overall.avg_rh, None);
        assert_eq!(overall.max_no, Some(20.0));
        assert_eq!(overall.min_no, Some(10.0));
        assert_eq!(overall.cities, vec!["Agra", "Pune"]);
        assert_eq!(
            stats.by_city,
            vec![
                CityStats {
                    city: Some("Pune".into()),
                    count: 2,
                    avg_no: Some(15.0),
                    avg_temp: Some(25.0),
                },
                CityStats {
                    city: Some("Agra".into()),
                    count: 1,
                    avg_no: None,
                    avg_temp: None,
                },
            ]
        );
    }
}
