use dstna_rs::Client;
use dstna_rs::api::parse_csv_table;
use dstna_rs::models::{ApiErrorBody, TableInfo, VariableFilter};

#[test]
fn parse_sample_csv() {
    let body = "\u{feff}TRANSAKT;PRISENHED;TID;INDHOLD\n\
                B1GQK;LAN_M;1966;571,2\n\
                B1GQK;LAN_M;1967;594,0\n\
                B1GQK;LAN_M;1968;..\n";
    let table = parse_csv_table(body).unwrap();
    assert_eq!(table.headers, vec!["TRANSAKT", "PRISENHED", "TID", "INDHOLD"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.column_index("tid"), Some(2));
    assert_eq!(table.rows[0][3], "571,2");
    assert_eq!(table.rows[2][3], "..");
}

#[test]
fn single_column_body_is_rejected() {
    let err = parse_csv_table("error\nsomething went wrong\n").unwrap_err();
    assert!(err.to_string().contains("unexpected response shape"));
}

#[test]
fn data_url_encodes_filters() {
    let client = Client::default().with_base_url("https://example.test/v1/");
    let url = client.data_url(
        "NAN1",
        &[
            VariableFilter::new("TRANSAKT", &["B1GQK", "P6D"]),
            VariableFilter::new("Tid", &["*"]),
        ],
    );
    assert_eq!(
        url,
        "https://example.test/v1/data/NAN1/CSV?lang=da&valuePresentation=Code&TRANSAKT=B1GQK,P6D&Tid=*"
    );
}

#[test]
fn table_info_url_uses_language() {
    let client = Client::default().with_lang("en");
    assert_eq!(
        client.table_info_url("NAN1"),
        "https://api.statbank.dk/v1/tableinfo/NAN1?format=JSON&lang=en"
    );
}

#[test]
fn parse_table_info() {
    let sample = r#"
    {
      "id": "NAN1",
      "text": "Forsyningsbalance, forbrug og investeringer",
      "unit": "-",
      "updated": "2019-03-29T08:00:00",
      "variables": [
        {
          "id": "TRANSAKT",
          "text": "transaktion",
          "elimination": false,
          "time": false,
          "values": [
            {"id": "B1GQK", "text": "B.1*g Bruttonationalprodukt, BNP"},
            {"id": "P6D", "text": "P.6 Eksport af varer og tjenester"}
          ]
        },
        {
          "id": "Tid",
          "text": "tid",
          "time": true,
          "values": [{"id": "1966", "text": "1966"}]
        }
      ]
    }
    "#;
    let info: TableInfo = serde_json::from_str(sample).unwrap();
    assert_eq!(info.id, "NAN1");
    assert_eq!(info.variables.len(), 2);
    assert_eq!(info.variables[0].values[0].id, "B1GQK");
    assert!(info.variables[1].time);
}

#[test]
fn parse_api_error() {
    let body = r#"{"errorTypeCode":"EXTRACT-NOTFOUND","message":"Tabellen blev ikke fundet"}"#;
    let err: ApiErrorBody = serde_json::from_str(body).unwrap();
    assert_eq!(err.error_type_code.as_deref(), Some("EXTRACT-NOTFOUND"));
    assert_eq!(err.message, "Tabellen blev ikke fundet");
}
