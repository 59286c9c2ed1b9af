//! Property tests for the calculation engine

use proptest::prelude::*;
use rust_decimal::Decimal;
use takehome::core::{
    calculate, personal_allowance, to_pence, Inputs, StudentLoanPlan, TaxYearConfig,
};

fn pounds_and_pence(max_pence: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_pence).prop_map(|p| Decimal::new(p, 2))
}

fn plan() -> impl Strategy<Value = StudentLoanPlan> {
    prop_oneof![
        Just(StudentLoanPlan::None),
        Just(StudentLoanPlan::Plan1),
        Just(StudentLoanPlan::Plan2),
    ]
}

fn config() -> impl Strategy<Value = TaxYearConfig> {
    prop_oneof![Just(TaxYearConfig::y2024_25()), Just(TaxYearConfig::y2025_26())]
}

proptest! {
    #[test]
    fn totals_are_consistent(
        salary in pounds_and_pence(50_000_000),
        dividends in pounds_and_pence(20_000_000),
        plan in plan(),
        config in config(),
    ) {
        let r = calculate(&Inputs::new(salary, dividends, plan), &config);

        prop_assert_eq!(r.income_tax.basic + r.income_tax.higher + r.income_tax.additional, r.income_tax.total);
        prop_assert_eq!(r.dividend_tax.basic + r.dividend_tax.higher + r.dividend_tax.additional, r.dividend_tax.total);
        prop_assert_eq!(r.national_insurance.main + r.national_insurance.upper, r.national_insurance.total);
        prop_assert_eq!(r.totals.tax_only, r.income_tax.total + r.dividend_tax.total);
        prop_assert_eq!(r.totals.tax_and_ni, r.totals.tax_only + r.national_insurance.total);
        prop_assert_eq!(r.totals.net_income, r.totals.gross - r.totals.tax_and_ni - r.student_loan.amount);
        prop_assert!(r.totals.net_income <= r.totals.gross);
    }

    #[test]
    fn allowances_stay_within_income(
        salary in pounds_and_pence(50_000_000),
        dividends in pounds_and_pence(20_000_000),
        config in config(),
    ) {
        let r = calculate(&Inputs::new(salary, dividends, StudentLoanPlan::None), &config);
        let salary_p = to_pence(salary);
        let dividends_p = to_pence(dividends);

        prop_assert!(r.personal_allowance >= 0);
        prop_assert!(r.personal_allowance <= config.personal_allowance);
        prop_assert_eq!(
            r.personal_allowance_used_on_salary + r.personal_allowance_used_on_dividends,
            r.personal_allowance.min(r.totals.gross)
        );
        prop_assert!(r.personal_allowance_used_on_salary <= salary_p);
        prop_assert!(r.dividend_tax.allowance_applied <= config.dividend_allowance);
        prop_assert_eq!(
            r.dividend_tax.allowance_applied + r.dividend_tax.taxable.total(),
            dividends_p - r.personal_allowance_used_on_dividends
        );
    }

    #[test]
    fn allowance_never_grows_with_income(a in 0i64..30_000_000, b in 0i64..30_000_000) {
        let config = TaxYearConfig::y2024_25();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(personal_allowance(hi, &config) <= personal_allowance(lo, &config));
    }

    #[test]
    fn more_salary_never_means_less_deduction(
        salary in 0i64..500_000,
        raise in 1i64..1_000,
        dividends in pounds_and_pence(20_000_000),
        plan in plan(),
    ) {
        let config = TaxYearConfig::y2024_25();
        let before = calculate(&Inputs::new(Decimal::from(salary), dividends, plan), &config);
        let after = calculate(&Inputs::new(Decimal::from(salary + raise), dividends, plan), &config);

        prop_assert!(after.totals.tax_and_ni >= before.totals.tax_and_ni);
        prop_assert!(after.student_loan.amount >= before.student_loan.amount);
    }

    #[test]
    fn raise_moving_allowance_off_dividends_never_lowers_tax(
        salary in 0i64..12_570,
        raise in 1i64..1_000,
        dividends in pounds_and_pence(5_000_000),
    ) {
        let config = TaxYearConfig::y2024_25();
        let before = calculate(&Inputs::new(Decimal::from(salary), dividends, StudentLoanPlan::None), &config);
        let after = calculate(&Inputs::new(Decimal::from(salary + raise), dividends, StudentLoanPlan::None), &config);

        prop_assert!(after.personal_allowance_used_on_dividends <= before.personal_allowance_used_on_dividends);
        prop_assert!(after.totals.tax_only >= before.totals.tax_only);
    }
}
