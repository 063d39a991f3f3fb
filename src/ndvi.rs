//! Vegetation-index time series around a single event date.
//!
//! Series come as two-column CSV exports (date, NDVI), one file per site.
//! They are joined, cut to a window of whole calendar months either side of
//! the event, and every record is labelled as before or after it.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::error::{Error, Result};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub struct NdviRecord {
    pub date: NaiveDateTime,
    pub ndvi: f64,
    pub site: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Period {
    Before,
    After,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.pad("Before"),
            Self::After => f.pad("After"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub date: NaiveDateTime,
    pub ndvi: f64,
    pub site: String,
    pub period: Period,
}

/// Maps the key in a series file name (`hans` in `hans_NDVI.csv`) to a site name.
#[derive(Debug, Clone, Default)]
pub struct SiteNames(HashMap<String, String>);

impl SiteNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.0.insert(key.into(), name.into());
    }

    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SiteNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Part of the file stem before the first underscore.
#[must_use]
pub fn site_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.split('_').next().unwrap_or_default().to_string()
}

/// Parses the formats seen in spreadsheet and Earth Engine exports. Plain
/// dates become midnight; times of day are kept.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        })
}

// Midnight is written as a bare date.
fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    if ts.time() == NaiveTime::MIN {
        s.collect_str(&ts.format("%Y-%m-%d"))
    } else {
        s.collect_str(&ts.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Rows with an unusable date or value are dropped and counted.
pub fn read_series<R: Read>(reader: R, site: &str) -> Result<(Vec<NdviRecord>, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut dropped = 0;
    for row in rdr.records() {
        let row = row?;
        let date = row.get(0).and_then(parse_date);
        let ndvi = row
            .get(1)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        match (date, ndvi) {
            (Some(date), Some(ndvi)) => records.push(NdviRecord {
                date,
                ndvi,
                site: site.to_string(),
            }),
            _ => {
                debug!("{}: dropping row {:?}", site, row);
                dropped += 1;
            }
        }
    }
    Ok((records, dropped))
}

pub fn load_series<P: AsRef<Path>>(paths: &[P], sites: &SiteNames) -> Result<Vec<NdviRecord>> {
    let mut all = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let site = sites.resolve(&site_key(path));
        let (records, dropped) = read_series(File::open(path)?, &site)?;
        info!(
            "{}: {} records from {} ({} dropped)",
            site,
            records.len(),
            path.display(),
            dropped
        );
        all.extend(records);
    }
    Ok(all)
}

/// Calendar-month window centred on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub anchor: NaiveDateTime,
    pub months: u32,
}

impl EventWindow {
    #[must_use]
    pub const fn new(anchor: NaiveDateTime, months: u32) -> Self {
        Self { anchor, months }
    }

    /// Parses the anchor from `YYYY-MM-DD` or any format [`parse_date`] accepts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDate` if the anchor cannot be parsed.
    pub fn parse(anchor: &str, months: u32) -> Result<Self> {
        parse_date(anchor)
            .map(|a| Self::new(a, months))
            .ok_or_else(|| Error::InvalidDate(anchor.to_string()))
    }

    /// Inclusive bounds, compared against full timestamps.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidWindow` if either bound falls outside the
    /// representable date range.
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let span = Months::new(self.months);
        let start = self.anchor.checked_sub_months(span);
        let end = self.anchor.checked_add_months(span);
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(Error::InvalidWindow(format!(
                "{} months around {}",
                self.months, self.anchor
            ))),
        }
    }

    #[must_use]
    pub fn label(&self, date: NaiveDateTime) -> Period {
        if date < self.anchor {
            Period::Before
        } else {
            Period::After
        }
    }

    /// Records inside the window, labelled, in input order.
    pub fn apply(&self, records: &[NdviRecord]) -> Result<Vec<LabeledRecord>> {
        let (start, end) = self.bounds()?;
        Ok(records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| LabeledRecord {
                date: r.date,
                ndvi: r.ndvi,
                site: r.site.clone(),
                period: self.label(r.date),
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub site: String,
    pub period: Period,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Count, mean and range of NDVI per site and period. Sites keep the order
/// they first appear in; `Before` precedes `After`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(records: &[LabeledRecord]) -> Vec<PeriodSummary> {
    let mut sites: Vec<&str> = Vec::new();
    let mut groups: HashMap<(&str, Period), Vec<f64>> = HashMap::new();
    for r in records {
        if !sites.contains(&r.site.as_str()) {
            sites.push(r.site.as_str());
        }
        groups.entry((r.site.as_str(), r.period)).or_default().push(r.ndvi);
    }

    let mut out = Vec::new();
    for site in sites {
        for period in [Period::Before, Period::After] {
            let Some(values) = groups.get(&(site, period)) else {
                continue;
            };
            let sum: f64 = values.iter().sum();
            out.push(PeriodSummary {
                site: site.to_string(),
                period,
                count: values.len(),
                mean: sum / values.len() as f64,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            });
        }
    }
    out
}

pub fn write_records<W: Write>(records: &[LabeledRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
