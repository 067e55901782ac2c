// Deduction and payout arithmetic of the cut report

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salon_admin::modules::reports::models::{compute_cut, CutReportRequest, SettlementOutcome};

#[test]
fn test_debt_larger_than_earnings() {
    let cut = compute_cut(dec!(700), dec!(500));
    assert_eq!(cut.deducted, dec!(500));
    assert_eq!(cut.payable, Decimal::ZERO);
}

#[test]
fn test_earnings_larger_than_debt() {
    let cut = compute_cut(dec!(200), dec!(500));
    assert_eq!(cut.deducted, dec!(200));
    assert_eq!(cut.payable, dec!(300));
}

#[test]
fn test_credit_balance_deducts_nothing() {
    let cut = compute_cut(dec!(-150), dec!(500));
    assert_eq!(cut.deducted, Decimal::ZERO);
    assert_eq!(cut.payable, dec!(500));
}

#[test]
fn test_no_earnings_no_deduction() {
    let cut = compute_cut(dec!(900), Decimal::ZERO);
    assert_eq!(cut.deducted, Decimal::ZERO);
    assert_eq!(cut.payable, Decimal::ZERO);
}

#[test]
fn test_period_bounds_and_filename() {
    let now = Utc.with_ymd_and_hms(2025, 6, 30, 18, 45, 0).unwrap();
    let request = CutReportRequest {
        start_date: Some("2025-06-01T10:00:00.000Z".to_string()),
        end_date: Some("2025-06-15".to_string()),
        auto_settle: None,
    };
    let period = request.period(now).unwrap();
    assert_eq!(period.start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    assert_eq!(period.end, Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap());
    assert_eq!(period.filename(), "corte_2025-06-01_2025-06-15.xlsx");
    assert!(!request.auto_settle());

    let open_ended = CutReportRequest {
        start_date: Some("2025-06-01".to_string()),
        end_date: None,
        auto_settle: Some(true),
    };
    let period = open_ended.period(now).unwrap();
    assert_eq!(period.end, now);
    assert_eq!(period.filename(), "corte_2025-06-01_hoy.xlsx");
}

#[test]
fn test_period_rejects_bad_input() {
    let now = Utc::now();
    assert!(CutReportRequest::default().period(now).is_err());

    let garbage = CutReportRequest {
        start_date: Some("01/06/2025".to_string()),
        ..Default::default()
    };
    assert!(garbage.period(now).is_err());

    let reversed = CutReportRequest {
        start_date: Some("2025-06-10".to_string()),
        end_date: Some("2025-06-01".to_string()),
        auto_settle: None,
    };
    assert!(reversed.period(now).is_err());
}

#[test]
fn test_settle_flag_wire_names() {
    let request: CutReportRequest =
        serde_json::from_str(r#"{"startDate":"2025-06-01","crearAbono":true}"#).unwrap();
    assert!(request.auto_settle());

    let request: CutReportRequest =
        serde_json::from_str(r#"{"startDate":"2025-06-01","autoSettle":true}"#).unwrap();
    assert!(request.auto_settle());
}

#[test]
fn test_settlement_labels() {
    assert_eq!(SettlementOutcome::NotRequested.label(), "No");
    assert_eq!(SettlementOutcome::NothingToSettle.label(), "No aplica");
    assert_eq!(SettlementOutcome::Recorded.label(), "Sí");
    assert_eq!(SettlementOutcome::Failed("boom".to_string()).label(), "Error");
}

proptest! {
    #[test]
    fn prop_cut_invariants(debt in -10_000_000i64..10_000_000, earned in 0i64..10_000_000) {
        let debt = Decimal::new(debt, 2);
        let earned = Decimal::new(earned, 2);
        let cut = compute_cut(debt, earned);

        prop_assert!(cut.deducted >= Decimal::ZERO);
        prop_assert!(cut.payable >= Decimal::ZERO);
        prop_assert!(cut.deducted <= earned);
        prop_assert!(cut.deducted <= debt.max(Decimal::ZERO));
        prop_assert_eq!(cut.deducted + cut.payable, earned);
        prop_assert_eq!(cut.deducted, debt.min(earned).max(Decimal::ZERO));
    }
}
