// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use nestegg::errors::AmortizationError;
use nestegg::liability::{
    LiabilitySource, amortize, amortized_balance, elapsed_months, equity_value, resolve_liability,
};
use nestegg::models::{AmortizationTerms, Asset, AssetType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn approx(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < dec!(0.01)
}

fn house() -> Asset {
    Asset {
        id: 1,
        owner: "default".into(),
        name: "House".into(),
        r#type: AssetType::RealEstate,
        value: dec!(500000),
        ownership_percentage: dec!(100),
        linked_account_id: None,
        manual_mortgage_balance: Decimal::ZERO,
        amortization: AmortizationTerms::none(),
        monthly_payment: Decimal::ZERO,
    }
}

fn mortgage_terms(start: NaiveDate) -> AmortizationTerms {
    AmortizationTerms {
        start_date: Some(start),
        original_principal: dec!(200000),
        interest_rate: dec!(6),
        term_months: Some(360),
    }
}

#[test]
fn amortization_starts_at_principal() {
    let b = amortize(dec!(200000), dec!(6), 360, 0).unwrap();
    assert!(approx(b, dec!(200000)), "got {}", b);
}

#[test]
fn amortization_is_paid_off_at_term() {
    let b = amortize(dec!(200000), dec!(6), 360, 360).unwrap();
    assert!(approx(b, Decimal::ZERO), "got {}", b);
}

#[test]
fn amortization_decreases_monotonically() {
    let mid = amortize(dec!(200000), dec!(6), 360, 180).unwrap();
    assert!(mid > Decimal::ZERO && mid < dec!(200000));

    let mut prev = dec!(200000.01);
    for p in (0..=360).step_by(12) {
        let b = amortize(dec!(200000), dec!(6), 360, p).unwrap();
        assert!(b < prev, "balance at {} months ({}) not below {}", p, b, prev);
        prev = b;
    }
}

#[test]
fn amortization_past_term_floors_at_zero() {
    let b = amortize(dec!(200000), dec!(6), 360, 420).unwrap();
    assert_eq!(b, Decimal::ZERO);
    let linear = amortize(dec!(120000), Decimal::ZERO, 120, 200).unwrap();
    assert_eq!(linear, Decimal::ZERO);
}

#[test]
fn zero_rate_is_straight_line() {
    let b = amortize(dec!(120000), Decimal::ZERO, 120, 60).unwrap();
    assert_eq!(b, dec!(60000));
}

#[test]
fn elapsed_months_ignores_day_of_month() {
    assert_eq!(elapsed_months(date(2019, 12, 31), date(2020, 1, 1)), 1);
    assert_eq!(elapsed_months(date(2020, 3, 1), date(2020, 3, 31)), 0);
    assert_eq!(elapsed_months(date(2010, 6, 15), date(2025, 6, 1)), 180);
    assert_eq!(elapsed_months(date(2030, 1, 1), date(2025, 1, 1)), 0);
}

#[test]
fn amortized_balance_uses_calendar_months() {
    let terms = mortgage_terms(date(2010, 6, 15));
    let b = amortized_balance(&terms, date(2025, 6, 1), 360).unwrap();
    assert_eq!(b, amortize(dec!(200000), dec!(6), 360, 180).unwrap());

    let future = mortgage_terms(date(2030, 1, 1));
    let b = amortized_balance(&future, date(2025, 1, 1), 360).unwrap();
    assert!(approx(b, dec!(200000)));
}

#[test]
fn missing_term_uses_default() {
    let mut terms = mortgage_terms(date(2020, 1, 1));
    terms.term_months = None;
    let b = amortized_balance(&terms, date(2025, 1, 1), 180).unwrap();
    assert_eq!(b, amortize(dec!(200000), dec!(6), 180, 60).unwrap());
}

#[test]
fn invalid_terms_are_errors() {
    let mut terms = mortgage_terms(date(2020, 1, 1));
    terms.term_months = Some(0);
    assert_eq!(
        amortized_balance(&terms, date(2025, 1, 1), 360),
        Err(AmortizationError::InvalidTerm(0))
    );

    let mut terms = mortgage_terms(date(2020, 1, 1));
    terms.interest_rate = dec!(-1);
    assert!(matches!(
        amortized_balance(&terms, date(2025, 1, 1), 360),
        Err(AmortizationError::NegativeRate(_))
    ));
}

#[test]
fn equity_scales_net_value_by_ownership() {
    assert_eq!(equity_value(dec!(500000), dec!(200000), dec!(25)), dec!(75000));
    assert_eq!(equity_value(dec!(500000), dec!(200000), dec!(150)), dec!(300000));
    assert_eq!(equity_value(dec!(500000), dec!(200000), dec!(-5)), Decimal::ZERO);
}

#[test]
fn huge_values_do_not_panic() {
    let mut asset = house();
    asset.value = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    let res = resolve_liability(&asset, None, date(2025, 1, 1), 360);
    assert_eq!(res.equity_value, asset.value);

    asset.ownership_percentage = dec!(25);
    let res = resolve_liability(&asset, None, date(2025, 1, 1), 360);
    assert_eq!(res.equity_value, Decimal::from_i128_with_scale(25 * 10_i128.pow(25), 0));

    assert_eq!(equity_value(Decimal::MAX, Decimal::ZERO, dec!(100)), Decimal::MAX);
    assert_eq!(equity_value(Decimal::MIN, Decimal::MAX, dec!(100)), Decimal::ZERO);
}

#[test]
fn linked_account_takes_precedence() {
    let mut asset = house();
    asset.linked_account_id = Some(7);
    asset.manual_mortgage_balance = dec!(123);
    asset.amortization = mortgage_terms(date(2020, 1, 1));

    let r = resolve_liability(&asset, Some(dec!(-350000)), date(2025, 1, 1), 360);
    assert_eq!(r.source, LiabilitySource::LinkedAccount);
    assert_eq!(r.liability_balance, dec!(350000));
    assert_eq!(r.equity_value, dec!(150000));
}

#[test]
fn zero_balance_link_is_still_authoritative() {
    let mut asset = house();
    asset.linked_account_id = Some(7);
    asset.manual_mortgage_balance = dec!(90000);

    let r = resolve_liability(&asset, Some(Decimal::ZERO), date(2025, 1, 1), 360);
    assert_eq!(r.source, LiabilitySource::LinkedAccount);
    assert_eq!(r.liability_balance, Decimal::ZERO);
}

#[test]
fn dangling_link_falls_through_to_manual() {
    let mut asset = house();
    asset.linked_account_id = Some(7);
    asset.manual_mortgage_balance = dec!(90000);

    let r = resolve_liability(&asset, None, date(2025, 1, 1), 360);
    assert_eq!(r.source, LiabilitySource::Manual);
    assert_eq!(r.liability_balance, dec!(90000));
}

#[test]
fn manual_balance_beats_amortization() {
    let mut asset = house();
    asset.manual_mortgage_balance = dec!(150000);
    asset.amortization = mortgage_terms(date(2020, 1, 1));

    let r = resolve_liability(&asset, None, date(2025, 1, 1), 360);
    assert_eq!(r.source, LiabilitySource::Manual);
    assert_eq!(r.liability_balance, dec!(150000));
}

#[test]
fn amortization_used_when_nothing_else_is_set() {
    let mut asset = house();
    asset.ownership_percentage = dec!(50);
    asset.amortization = mortgage_terms(date(2010, 6, 1));

    let r = resolve_liability(&asset, None, date(2025, 6, 1), 360);
    let expected = amortize(dec!(200000), dec!(6), 360, 180).unwrap();
    assert_eq!(r.source, LiabilitySource::Amortized);
    assert_eq!(r.liability_balance, expected);
    assert_eq!(r.equity_value, (dec!(500000) - expected) * dec!(50) / dec!(100));
}

#[test]
fn no_liability_source_means_full_equity() {
    let mut asset = house();
    asset.ownership_percentage = dec!(25);
    // A principal without a start date is not an amortization schedule.
    asset.amortization.original_principal = dec!(200000);

    let r = resolve_liability(&asset, None, date(2025, 1, 1), 360);
    assert_eq!(r.source, LiabilitySource::None);
    assert_eq!(r.liability_balance, Decimal::ZERO);
    assert_eq!(r.equity_value, dec!(125000));
}

#[test]
fn broken_amortization_only_affects_its_own_asset() {
    let mut broken = house();
    broken.amortization = mortgage_terms(date(2020, 1, 1));
    broken.amortization.term_months = Some(0);

    let mut healthy = house();
    healthy.id = 2;
    healthy.amortization = mortgage_terms(date(2020, 1, 1));

    let today = date(2025, 1, 1);
    let results: Vec<_> = [broken, healthy]
        .iter()
        .map(|a| resolve_liability(a, None, today, 360))
        .collect();

    assert_eq!(results[0].liability_balance, Decimal::ZERO);
    assert_eq!(results[0].equity_value, dec!(500000));
    assert_eq!(results[1].source, LiabilitySource::Amortized);
    assert!(results[1].liability_balance > Decimal::ZERO);
}
