// Joining and windowing vegetation-index series loaded from disk

use std::fs;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tempfile::TempDir;
use wave_tally::ndvi::{load_series, summarize, write_records, EventWindow, Period, SiteNames};

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
}

fn write_series(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_series_are_joined_windowed_and_labelled() {
    let dir = TempDir::new().unwrap();
    let hans = write_series(
        &dir,
        "hans_NDVI_timeseries.csv",
        "system:time_start,NDVI\n\
         \"Jan 5, 2017\",0.80\n\
         \"Aug 30, 2017\",0.78\n\
         \"Sep 6, 2017\",0.41\n\
         \"Oct 1, 2017\",0.45\n",
    );
    let scb = write_series(
        &dir,
        "scb_NDVI_timeseries.csv",
        "date,ndvi\n2017-08-01,0.70\n2017-09-20,0.50\n2018-06-01,0.69\n",
    );

    let sites: SiteNames = [("hans", "Hans Creek"), ("scb", "Sea Cow's Bay")]
        .into_iter()
        .collect();
    let records = load_series(&[hans, scb], &sites).unwrap();
    assert_eq!(records.len(), 7);

    let window = EventWindow::parse("2017-09-06", 6).unwrap();
    let labeled = window.apply(&records).unwrap();

    let got: Vec<(&str, NaiveDateTime, Period)> = labeled
        .iter()
        .map(|r| (r.site.as_str(), r.date, r.period))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Hans Creek", date(2017, 8, 30), Period::Before),
            ("Hans Creek", date(2017, 9, 6), Period::After),
            ("Hans Creek", date(2017, 10, 1), Period::After),
            ("Sea Cow's Bay", date(2017, 8, 1), Period::Before),
            ("Sea Cow's Bay", date(2017, 9, 20), Period::After),
        ]
    );

    let summary = summarize(&labeled);
    assert_eq!(summary.len(), 4);
    assert_eq!(summary[1].site, "Hans Creek");
    assert_eq!(summary[1].period, Period::After);
    assert_eq!(summary[1].count, 2);
    assert!((summary[1].mean - 0.43).abs() < 1e-9);

    let mut buf = Vec::new();
    write_records(&labeled, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().next(), Some("date,ndvi,site,period"));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn test_timestamps_past_the_end_bound_are_dropped() {
    let dir = TempDir::new().unwrap();
    let series = write_series(
        &dir,
        "french_NDVI.csv",
        "date,ndvi\n2018-03-06,0.60\n2018-03-06T10:00:00,0.61\n2017-09-06T09:00:00,0.30\n",
    );

    let records = load_series(&[series], &SiteNames::new()).unwrap();
    let window = EventWindow::parse("2017-09-06", 6).unwrap();
    let labeled = window.apply(&records).unwrap();

    let got: Vec<(f64, Period)> = labeled.iter().map(|r| (r.ndvi, r.period)).collect();
    assert_eq!(got, vec![(0.60, Period::After), (0.30, Period::After)]);
    assert_eq!(labeled[0].site, "french");
}

#[test]
fn test_missing_series_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = load_series(&[dir.path().join("nope_NDVI.csv")], &SiteNames::new());
    assert!(matches!(result, Err(wave_tally::Error::Io(_))));
}
