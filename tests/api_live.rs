// Live tests against api.statbank.dk (opt-in): cargo test --features online
#![cfg(feature = "online")]

use dstna_rs::{Client, PipelineConfig};

#[test]
fn live_table_info_lists_transactions() {
    let info = Client::default().table_info("NAN1").unwrap();
    let transakt = info
        .variables
        .iter()
        .find(|v| v.id == "TRANSAKT")
        .expect("TRANSAKT variable");
    assert!(transakt.values.iter().any(|v| v.id == "B1GQK"));
}

#[test]
fn live_pipeline_covers_window() {
    let cfg = PipelineConfig::default();
    let out = dstna_rs::run(&Client::default(), &cfg).unwrap();
    assert_eq!(out.levels.years().first(), Some(&1980));
    assert_eq!(out.levels.years().last(), Some(&2018));
    assert!(out.summary.row("gdp").unwrap().total_change_pct > 0.0);
}
