use assert_matches::assert_matches;
use chrono::NaiveDate;

use gpad_suppliers::domain::IsoMonth;
use gpad_suppliers::error::GpadError;

#[test]
fn decompose_january() {
    let month: IsoMonth = "2025-01".parse().unwrap();
    assert_eq!(month.decompose(), ("january", "2025".to_string()));
}

#[test]
fn decompose_october() {
    let month: IsoMonth = "2025-10".parse().unwrap();
    assert_eq!(month.decompose(), ("october", "2025".to_string()));
}

#[test]
fn abbreviated_suffix() {
    let october: IsoMonth = "2025-10".parse().unwrap();
    assert_eq!(october.abbreviated_suffix(), "Oct_25.csv");
    let may: IsoMonth = "2009-05".parse().unwrap();
    assert_eq!(may.abbreviated_suffix(), "May_09.csv");
}

#[test]
fn previous_month() {
    let today = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    assert_eq!(IsoMonth::previous(today).to_string(), "2025-10");
}

#[test]
fn rejects_out_of_range_month() {
    let err = "2025-13".parse::<IsoMonth>().unwrap_err();
    assert_matches!(err, GpadError::InvalidMonth(_));
    let err = IsoMonth::new(2025, 0).unwrap_err();
    assert_matches!(err, GpadError::InvalidMonth(_));
}
