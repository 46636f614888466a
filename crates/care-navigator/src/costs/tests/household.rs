use crate::costs::household::{
    household_picture, Assets, HouseholdError, HouseholdInputs, MonthlyCosts, PersonIncome,
};
use crate::costs::pricing::HouseholdSettings;

fn couple_with_care_costs() -> HouseholdInputs {
    HouseholdInputs {
        people: vec![
            PersonIncome {
                name: "Mom".to_string(),
                social_security: 1500.0,
                pension: 500.0,
                has_ltc_insurance: true,
                ..PersonIncome::default()
            },
            PersonIncome {
                name: "Dad".to_string(),
                social_security: 1200.0,
                ..PersonIncome::default()
            },
        ],
        household_income: 300.0,
        costs: MonthlyCosts {
            care: 9000.0,
            home_carrying: 1200.0,
            ..MonthlyCosts::default()
        },
        assets: Assets {
            common: 200_000.0,
            less_common: 50_000.0,
            ..Assets::default()
        },
        ..HouseholdInputs::default()
    }
}

#[test]
fn gap_and_runway_from_totals() {
    let picture =
        household_picture(&couple_with_care_costs(), &HouseholdSettings::default()).expect("ok");

    assert_eq!(picture.monthly_income, 5300);
    assert_eq!(picture.monthly_costs, 10_200);
    assert_eq!(picture.gap, 4900);
    assert_eq!(picture.total_assets, 250_000);
    assert_eq!(picture.months_runway, 51);
    assert_eq!((picture.runway_years, picture.runway_months), (4, 3));
    assert_eq!(picture.years_funded, Some(4.3));
}

#[test]
fn home_sale_counts_only_when_applied() {
    let mut inputs = couple_with_care_costs();
    inputs.assets.home_sale_proceeds = 300_000.0;

    let ignored = household_picture(&inputs, &HouseholdSettings::default()).expect("ok");
    inputs.assets.apply_home_sale = true;
    let applied = household_picture(&inputs, &HouseholdSettings::default()).expect("ok");

    assert_eq!(ignored.total_assets, 250_000);
    assert_eq!(applied.total_assets, 550_000);
    assert_eq!(applied.months_runway, 112);
    assert_eq!((applied.runway_years, applied.runway_months), (9, 4));
}

#[test]
fn reverse_mortgage_and_modifications_adjust_assets() {
    let inputs = HouseholdInputs {
        assets: Assets {
            common: 100_000.0,
            reverse_mortgage_lump: 50_000.0,
            reverse_mortgage_fees: 5_000.0,
            modification_upfront: 15_000.0,
            deduct_modification_upfront: true,
            ..Assets::default()
        },
        ..HouseholdInputs::default()
    };

    let picture = household_picture(&inputs, &HouseholdSettings::default()).expect("ok");

    assert_eq!(picture.total_assets, 130_000);
}

#[test]
fn no_gap_means_no_runway() {
    let mut inputs = couple_with_care_costs();
    inputs.costs.care = 2000.0;

    let picture = household_picture(&inputs, &HouseholdSettings::default()).expect("ok");

    assert!(picture.gap <= 0);
    assert_eq!(picture.months_runway, 0);
    assert_eq!(picture.years_funded, None);
}

#[test]
fn years_funded_is_capped() {
    let inputs = HouseholdInputs {
        costs: MonthlyCosts {
            care: 1000.0,
            ..MonthlyCosts::default()
        },
        assets: Assets {
            common: 10_000_000.0,
            ..Assets::default()
        },
        ..HouseholdInputs::default()
    };

    let picture = household_picture(&inputs, &HouseholdSettings::default()).expect("ok");

    assert_eq!(picture.months_runway, 10_000);
    assert_eq!(picture.years_funded, Some(30.0));
}

#[test]
fn ltc_add_comes_from_settings() {
    let settings = HouseholdSettings {
        ltc_monthly_add: 2500.0,
        ..HouseholdSettings::default()
    };

    let picture = household_picture(&couple_with_care_costs(), &settings).expect("ok");

    assert_eq!(picture.monthly_income, 6000);
}

#[test]
fn negative_amounts_are_rejected() {
    let mut inputs = couple_with_care_costs();
    inputs.people[1].pension = -100.0;

    let err = household_picture(&inputs, &HouseholdSettings::default()).expect_err("invalid");

    assert!(matches!(err, HouseholdError::InvalidAmount { field, .. } if field == "Dad.pension"));
}
