use std::path::Path;

use super::*;

const REPLY: &str = r#"```json
[
  {
    "date": 1,
    "day": "mon",
    "fajr": { "start": "5.39", "jamaat": "7.00" },
    "dhuhar": { "start": "11.47", "jamaat": "12.30/1.30" },
    "asr": { "start": "2.08", "jamaat": "2.30" },
    "maghrib": { "start": "3.53" },
    "isha": { "start": "5.53", "jamaat": "7.00" }
  },
  {
    "date": 2,
    "day": "TUE",
    "fajr": { "start": "5:40", "jamaat": "7:00" },
    "dhuhar": { "start": "11.47", "jamaat": "12.30" },
    "asr": { "start": "2.09", "jamaat": "2.30" },
    "maghrib": { "start": "3.54", "jamaat": "4.00" },
    "isha": { "start": "5.54", "jamaat": "7.00" }
  }
]
```"#;

#[test]
fn parse_ai_reply_strips_fences_and_normalizes_times() {
    let rows = parse_ai_reply(REPLY).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].day, "MON");
    assert_eq!(rows[0].fajr.start.as_str(), "05.39");
    assert_eq!(rows[0].dhuhar.jamaat.as_str(), "12.30/01.30");
    assert_eq!(rows[1].fajr.start.as_str(), "05.40");
}

#[test]
fn parse_ai_reply_mirrors_missing_maghrib_jamaat() {
    let rows = parse_ai_reply(REPLY).unwrap();

    assert_eq!(rows[0].maghrib.jamaat.as_str(), "03.53");
    assert_eq!(rows[1].maghrib.jamaat.as_str(), "04.00");
}

#[test]
fn parse_ai_reply_surfaces_month_mismatch() {
    let reply = r#"[{ "ERROR": "MISMATCH: PDF says March but entry is for April." }]"#;
    let error = parse_ai_reply(reply).unwrap_err();

    assert!(error.to_string().contains("MISMATCH: PDF says March"));
    assert_eq!(
        error.downcast_ref::<ExtractorRejection>().map(|rejection| rejection.message.as_str()),
        Some("MISMATCH: PDF says March but entry is for April.")
    );
}

#[test]
fn parse_ai_reply_rejects_malformed_times() {
    let reply = REPLY.replace("\"5.39\"", "\"5.3\"");
    assert!(parse_ai_reply(&reply).is_err());
}

#[test]
fn parse_ai_reply_rejects_non_json() {
    assert!(parse_ai_reply("Sorry, I could not read that document.").is_err());
}

#[test]
fn source_kind_follows_extension() {
    assert_eq!(SourceKind::from_path(Path::new("june.PDF")), SourceKind::OcrPdf);
    assert_eq!(SourceKind::from_path(Path::new("june.json")), SourceKind::AiJson);
    assert_eq!(SourceKind::from_path(Path::new("june.txt")), SourceKind::Text);
    assert_eq!(SourceKind::from_path(Path::new("june")), SourceKind::Text);
}
