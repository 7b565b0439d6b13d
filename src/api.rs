//! Synchronous client for the **Statistics Denmark StatBank API (v1)**.
//!
//! Two endpoints are used:
//! - `data/{table}/CSV` returns a `;`-separated table with identifier columns
//!   (`TRANSAKT`, `PRISENHED`, `TID`) and a text value column (`INDHOLD`).
//! - `tableinfo/{table}` describes a table's variables and their value codes.
//!
//! ### Notes
//! - Values come back locale-formatted (`571,2` when `lang=da`); parsing happens
//!   later in `clean`, after the series are merged and truncated.
//! - There is no pagination; a request either returns the whole selection or fails.
//! - Network timeouts use a sane default (30s) and can be adjusted by editing the client builder.
//!
//! Typical usage:
//! ```no_run
//! # use dstna_rs::Client;
//! # use dstna_rs::models::VariableFilter;
//! let client = Client::default();
//! let table = client.fetch_table(
//!     "NAN1",
//!     &[
//!         VariableFilter::new("TRANSAKT", &["B1GQK"]),
//!         VariableFilter::new("PRISENHED", &["LAN_M"]),
//!         VariableFilter::new("Tid", &["*"]),
//!     ],
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::config::PipelineConfig;
use crate::models::{ApiErrorBody, RawSeries, RawTable, SeriesSpec, TableInfo, VariableFilter};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Variable id selecting periods; `*` means every available period.
pub const TIME_VARIABLE: &str = "Tid";
pub const TRANSACTION_VARIABLE: &str = "TRANSAKT";
pub const PRICE_UNIT_VARIABLE: &str = "PRISENHED";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub lang: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("dstna_rs/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: "https://api.statbank.dk/v1".into(),
            lang: "da".into(),
            http,
        }
    }
}

// Allow -, _, . and the `*` wildcard unescaped in codes
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

fn enc_join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts.into_iter().map(enc).collect::<Vec<_>>().join(",")
}

/// Error for a non-retried failure status, carrying the API's message when the body has one.
fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(e) => anyhow!("statbank api error ({}): {}", status, e.message),
        Err(_) => anyhow!("request failed with HTTP {}", status),
    }
}

/// Parse the `;`-separated CSV body of the data endpoint.
pub fn parse_csv_table(body: &str) -> Result<RawTable> {
    let body = body.trim_start_matches('\u{feff}');
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(body.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context("read csv header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.len() < 2 {
        bail!("unexpected response shape: {} column(s) in header", headers.len());
    }
    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read csv row {}", i + 1))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(RawTable { headers, rows })
}

impl Client {
    /// Same client, requesting responses in another language (`da` or `en`).
    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// URL of a CSV data query with one `code=v1,v2` pair per filter.
    pub fn data_url(&self, table: &str, filters: &[VariableFilter]) -> String {
        let mut url = format!(
            "{}/data/{}/CSV?lang={}&valuePresentation=Code",
            self.base_url,
            enc(table),
            enc(&self.lang)
        );
        for f in filters {
            url.push_str(&format!(
                "&{}={}",
                enc(&f.code),
                enc_join(f.values.iter().map(|s| s.as_str()))
            ));
        }
        url
    }

    pub fn table_info_url(&self, table: &str) -> String {
        format!(
            "{}/tableinfo/{}?format=JSON&lang={}",
            self.base_url,
            enc(table),
            enc(&self.lang)
        )
    }

    fn get_text(&self, url: &str) -> Result<String> {
        // Small retry for transient failures (5xx / network errors)
        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r.text().context("read response body");
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(anyhow!("HTTP {}", r.status()));
                }
                Ok(r) => {
                    let status = r.status();
                    let body = r.text().unwrap_or_default();
                    return Err(status_error(status, &body));
                }
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        bail!("network error: {:?}", last_err);
    }

    /// Fetch a table selection as raw text cells.
    pub fn fetch_table(&self, table: &str, filters: &[VariableFilter]) -> Result<RawTable> {
        if filters.is_empty() {
            bail!("at least one variable filter required");
        }
        let url = self.data_url(table, filters);
        debug!("GET {url}");
        let body = self.get_text(&url).with_context(|| format!("GET {}", url))?;
        parse_csv_table(&body).with_context(|| format!("parse response of {}", url))
    }

    /// Fetch one series over all periods: `TRANSAKT=code`, `PRISENHED=price_unit`, `Tid=*`.
    pub fn fetch_series(&self, table: &str, price_unit: &str, spec: &SeriesSpec) -> Result<RawSeries> {
        let filters = [
            VariableFilter::new(TRANSACTION_VARIABLE, &[spec.code.as_str()]),
            VariableFilter::new(PRICE_UNIT_VARIABLE, &[price_unit]),
            VariableFilter::new(TIME_VARIABLE, &["*"]),
        ];
        let raw = self
            .fetch_table(table, &filters)
            .with_context(|| format!("fetch series {} ({})", spec.key, spec.code))?;
        info!("fetched {} ({}): {} rows", spec.key, spec.code, raw.rows.len());
        Ok(RawSeries {
            spec: spec.clone(),
            table: raw,
        })
    }

    /// Fetch every configured series, one request after another.
    pub fn fetch_all(&self, cfg: &PipelineConfig) -> Result<Vec<RawSeries>> {
        cfg.series
            .iter()
            .map(|spec| self.fetch_series(&cfg.table, &cfg.price_unit, spec))
            .collect()
    }

    /// Describe a table's variables and their value codes.
    pub fn table_info(&self, table: &str) -> Result<TableInfo> {
        let url = self.table_info_url(table);
        debug!("GET {url}");
        let body = self.get_text(&url).with_context(|| format!("GET {}", url))?;
        serde_json::from_str(&body).context("parse table info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_carries_api_message() {
        let body = r#"{"errorTypeCode":"EXTRACT-NOTFOUND","message":"Tabellen blev ikke fundet"}"#;
        let err = status_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "statbank api error (400 Bad Request): Tabellen blev ikke fundet"
        );
    }

    #[test]
    fn client_error_without_payload_reports_status() {
        let err = status_error(StatusCode::NOT_FOUND, "<html>not found</html>");
        assert_eq!(err.to_string(), "request failed with HTTP 404 Not Found");
    }
}
