//! Synthetic StatBank responses shared by the integration tests.
#![allow(dead_code)]

use dstna_rs::api::parse_csv_table;
use dstna_rs::models::{RawSeries, SeriesSpec, default_series};

pub const FIRST_YEAR: i32 = 1978;
pub const LAST_YEAR: i32 = 2020;

/// Level of a series in a year; GDP doubles exactly between 1980 and 2018.
pub fn level(key: &str, year: i32) -> f64 {
    let t = (year - FIRST_YEAR) as f64;
    match key {
        "gdp" => 100.0 * (1.0 + (year - 1980) as f64 / 38.0),
        "priv_cons" => 1000.0 + 10.0 * t,
        "publ_cons" => 400.0 + 3.0 * t,
        "inv" => 200.0 + 2.5 * t,
        "exp" => 40.0 + 1.5 * t,
        "imp" => 35.0 + t,
        other => panic!("no synthetic data for {other}"),
    }
}

/// `1234.56` -> `1.234,6`, the way the Danish API formats values.
pub fn danish(v: f64) -> String {
    let text = format!("{v:.1}");
    let (int, frac) = text.split_once('.').unwrap();
    let mut grouped = String::new();
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{grouped},{frac}")
}

/// CSV body of one series, with selected cells replaced by raw text.
pub fn csv_body(spec: &SeriesSpec, overrides: &[(i32, &str)]) -> String {
    let mut body = String::from("TRANSAKT;PRISENHED;TID;INDHOLD\n");
    for year in FIRST_YEAR..=LAST_YEAR {
        let value = overrides
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| danish(level(&spec.key, year)));
        body.push_str(&format!("{};LAN_M;{year};{value}\n", spec.code));
    }
    body
}

/// Raw series for every default spec; `overrides` apply to `override_key` only.
pub fn raw_series_with(override_key: &str, overrides: &[(i32, &str)]) -> Vec<RawSeries> {
    default_series()
        .into_iter()
        .map(|spec| {
            let cells: &[(i32, &str)] = if spec.key == override_key {
                overrides
            } else {
                &[]
            };
            let table = parse_csv_table(&csv_body(&spec, cells)).unwrap();
            RawSeries { spec, table }
        })
        .collect()
}

pub fn raw_series() -> Vec<RawSeries> {
    raw_series_with("", &[])
}
