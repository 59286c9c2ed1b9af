//! Tax year configuration records.
//!
//! Every threshold, band and allowance is held in pence and every rate in
//! basis points. A record is plain data: supporting a new tax year means adding
//! a record here or in a JSON configuration file, never touching the engine.

use super::money::{Pence, MAX_PENCE};
use super::uk::TaxYear;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Highest meaningful rate (100%) in basis points.
pub const MAX_RATE_BPS: u32 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration not found for tax year '{0}'")]
    NotFound(String),
    #[error("{label}: {field} must not be negative (got {value})")]
    NegativeAmount {
        label: String,
        field: &'static str,
        value: Pence,
    },
    #[error("{label}: {field} must not exceed 1000000000000000 pence (got {value})")]
    AmountTooLarge {
        label: String,
        field: &'static str,
        value: Pence,
    },
    #[error("{label}: {field} must be between 0 and 10000 basis points (got {value})")]
    RateOutOfRange {
        label: String,
        field: &'static str,
        value: u32,
    },
    #[error("tax year label must not be empty")]
    EmptyLabel,
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rates applied per band, in basis points (20% = 2000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rates {
    pub income_basic_bps: u32,
    pub income_higher_bps: u32,
    pub income_additional_bps: u32,
    pub div_basic_bps: u32,
    pub div_higher_bps: u32,
    pub div_additional_bps: u32,
    /// Employee Class 1 rate between primary threshold and upper earnings limit
    pub ni_main_bps: u32,
    /// Employee Class 1 rate above the upper earnings limit
    pub ni_upper_bps: u32,
    pub sl_rate_bps: u32,
}

/// Employee Class 1 National Insurance thresholds (annual, pence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NiThresholds {
    pub primary_threshold: Pence,
    pub upper_earnings_limit: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlanThreshold {
    /// Annual repayment threshold in pence
    pub threshold: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudentLoanThresholds {
    pub plan_1: PlanThreshold,
    pub plan_2: PlanThreshold,
}

/// All figures needed to calculate one tax year (rUK).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxYearConfig {
    /// Label identifying the year, e.g. "2024/25"
    pub year_label: String,
    pub personal_allowance: Pence,
    /// Adjusted net income above which the personal allowance is tapered
    pub personal_allowance_taper_start: Pence,
    pub dividend_allowance: Pence,
    /// Gross income at which the additional rate starts
    pub additional_rate_threshold: Pence,
    /// Width of the basic rate band measured in taxable income
    pub basic_rate_band: Pence,
    pub rates: Rates,
    pub ni: NiThresholds,
    pub student_loans: StudentLoanThresholds,
}

const RUK_RATES: Rates = Rates {
    income_basic_bps: 2000,
    income_higher_bps: 4000,
    income_additional_bps: 4500,
    div_basic_bps: 875,
    div_higher_bps: 3375,
    div_additional_bps: 3935,
    ni_main_bps: 800,
    ni_upper_bps: 200,
    sl_rate_bps: 900,
};

impl TaxYearConfig {
    /// 2024/25 (6 Apr 2024 - 5 Apr 2025), rest of UK
    pub fn y2024_25() -> Self {
        TaxYearConfig {
            year_label: "2024/25".to_string(),
            personal_allowance: 12_570_00,
            personal_allowance_taper_start: 100_000_00,
            dividend_allowance: 500_00,
            additional_rate_threshold: 125_140_00,
            basic_rate_band: 37_700_00,
            rates: RUK_RATES,
            ni: NiThresholds {
                primary_threshold: 12_570_00,
                upper_earnings_limit: 50_270_00,
            },
            student_loans: StudentLoanThresholds {
                plan_1: PlanThreshold { threshold: 24_990_00 },
                plan_2: PlanThreshold { threshold: 27_295_00 },
            },
        }
    }

    /// 2025/26 (6 Apr 2025 - 5 Apr 2026). Bands and rates as 2024/25; loan
    /// thresholds uprated.
    pub fn y2025_26() -> Self {
        TaxYearConfig {
            year_label: "2025/26".to_string(),
            student_loans: StudentLoanThresholds {
                plan_1: PlanThreshold { threshold: 26_065_00 },
                plan_2: PlanThreshold { threshold: 28_470_00 },
            },
            ..Self::y2024_25()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.year_label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel);
        }

        let amounts = [
            ("personal_allowance", self.personal_allowance),
            (
                "personal_allowance_taper_start",
                self.personal_allowance_taper_start,
            ),
            ("dividend_allowance", self.dividend_allowance),
            ("additional_rate_threshold", self.additional_rate_threshold),
            ("basic_rate_band", self.basic_rate_band),
            ("ni.primary_threshold", self.ni.primary_threshold),
            ("ni.upper_earnings_limit", self.ni.upper_earnings_limit),
            ("student_loans.plan_1", self.student_loans.plan_1.threshold),
            ("student_loans.plan_2", self.student_loans.plan_2.threshold),
        ];
        if let Some((field, value)) = amounts.into_iter().find(|(_, v)| *v < 0) {
            return Err(ConfigError::NegativeAmount {
                label: self.year_label.clone(),
                field,
                value,
            });
        }
        if let Some((field, value)) = amounts.into_iter().find(|(_, v)| *v > MAX_PENCE) {
            return Err(ConfigError::AmountTooLarge {
                label: self.year_label.clone(),
                field,
                value,
            });
        }

        let r = &self.rates;
        let rates = [
            ("rates.income_basic_bps", r.income_basic_bps),
            ("rates.income_higher_bps", r.income_higher_bps),
            ("rates.income_additional_bps", r.income_additional_bps),
            ("rates.div_basic_bps", r.div_basic_bps),
            ("rates.div_higher_bps", r.div_higher_bps),
            ("rates.div_additional_bps", r.div_additional_bps),
            ("rates.ni_main_bps", r.ni_main_bps),
            ("rates.ni_upper_bps", r.ni_upper_bps),
            ("rates.sl_rate_bps", r.sl_rate_bps),
        ];
        if let Some((field, value)) = rates.into_iter().find(|(_, v)| *v > MAX_RATE_BPS) {
            return Err(ConfigError::RateOutOfRange {
                label: self.year_label.clone(),
                field,
                value,
            });
        }

        Ok(())
    }
}

/// Root of a JSON configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaxYearFile {
    /// Label of the year used when none is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(default)]
    pub tax_years: Vec<TaxYearConfig>,
}

/// The set of supported tax years, with one designated active year.
#[derive(Debug, Clone)]
pub struct TaxYears {
    configs: Vec<TaxYearConfig>,
    active: String,
}

impl Default for TaxYears {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaxYears {
    /// Built-in years; 2024/25 is active.
    pub fn builtin() -> Self {
        TaxYears {
            configs: vec![TaxYearConfig::y2024_25(), TaxYearConfig::y2025_26()],
            active: "2024/25".to_string(),
        }
    }

    /// Look up a year by label. Accepts any spelling `TaxYear` parses
    /// ("2025/26", "2025-26", "2026").
    pub fn get(&self, label: &str) -> Result<&TaxYearConfig, ConfigError> {
        let wanted = label
            .parse::<TaxYear>()
            .map(|ty| ty.label())
            .unwrap_or_else(|_| label.trim().to_string());
        self.configs
            .iter()
            .find(|c| c.year_label == wanted)
            .ok_or_else(|| ConfigError::NotFound(label.to_string()))
    }

    /// The tax year containing `date`.
    pub fn for_date(&self, date: NaiveDate) -> Result<&TaxYearConfig, ConfigError> {
        self.get(&TaxYear::from_date(date).label())
    }

    pub fn active(&self) -> Result<&TaxYearConfig, ConfigError> {
        self.get(&self.active)
    }

    pub fn set_active(&mut self, label: &str) -> Result<(), ConfigError> {
        self.active = self.get(label)?.year_label.clone();
        Ok(())
    }

    /// Add a validated record, replacing any existing record with the same label.
    pub fn insert(&mut self, config: TaxYearConfig) -> Result<(), ConfigError> {
        config.validate()?;
        match self
            .configs
            .iter_mut()
            .find(|c| c.year_label == config.year_label)
        {
            Some(existing) => {
                log::info!("Replacing tax year {}", config.year_label);
                *existing = config;
            }
            None => {
                log::info!("Adding tax year {}", config.year_label);
                self.configs.push(config);
                self.configs.sort_by(|a, b| a.year_label.cmp(&b.year_label));
            }
        }
        Ok(())
    }

    /// Merge the years of a JSON configuration file over this set.
    pub fn load_json<R: Read>(&mut self, reader: R) -> Result<(), ConfigError> {
        let file: TaxYearFile = serde_json::from_reader(reader)?;
        for config in file.tax_years {
            self.insert(config)?;
        }
        if let Some(active) = file.active {
            self.set_active(&active)?;
        }
        Ok(())
    }

    pub fn to_file(&self) -> TaxYearFile {
        TaxYearFile {
            active: Some(self.active.clone()),
            tax_years: self.configs.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxYearConfig> {
        self.configs.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.year_label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_years() {
        let years = TaxYears::builtin();
        assert_eq!(years.labels(), ["2024/25", "2025/26"]);
        assert_eq!(years.active().unwrap().year_label, "2024/25");
    }

    #[test]
    fn builtin_configs_are_valid() {
        for config in TaxYears::builtin().iter() {
            config.validate().unwrap();
        }
    }

    #[test]
    fn years_differ_only_in_loan_thresholds() {
        let a = TaxYearConfig::y2024_25();
        let b = TaxYearConfig::y2025_26();
        assert_eq!(b.student_loans.plan_1.threshold, 26_065_00);
        assert_eq!(b.student_loans.plan_2.threshold, 28_470_00);
        assert_eq!(
            TaxYearConfig {
                year_label: a.year_label.clone(),
                student_loans: a.student_loans,
                ..b
            },
            a
        );
    }

    #[test]
    fn get_accepts_alternative_spellings() {
        let years = TaxYears::builtin();
        assert_eq!(years.get("2025/26").unwrap().year_label, "2025/26");
        assert_eq!(years.get("2025-26").unwrap().year_label, "2025/26");
        assert_eq!(years.get("2026").unwrap().year_label, "2025/26");
    }

    #[test]
    fn get_unknown_year_is_not_found() {
        let err = TaxYears::builtin().get("2019/20").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref l) if l == "2019/20"));
        assert_eq!(
            err.to_string(),
            "configuration not found for tax year '2019/20'"
        );
    }

    #[test]
    fn for_date_resolves_tax_year() {
        let years = TaxYears::builtin();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(years.for_date(date(2024, 4, 6)).unwrap().year_label, "2024/25");
        assert_eq!(years.for_date(date(2025, 4, 5)).unwrap().year_label, "2024/25");
        assert_eq!(years.for_date(date(2025, 4, 6)).unwrap().year_label, "2025/26");
        assert!(years.for_date(date(2020, 1, 1)).is_err());
    }

    #[test]
    fn validate_rejects_rate_above_100_percent() {
        let mut config = TaxYearConfig::y2024_25();
        config.rates.div_higher_bps = 10_001;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RateOutOfRange { field: "rates.div_higher_bps", value: 10_001, .. }
        ));
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let mut config = TaxYearConfig::y2024_25();
        config.ni.upper_earnings_limit = -1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeAmount { field: "ni.upper_earnings_limit", value: -1, .. }
        ));
    }

    #[test]
    fn validate_rejects_amounts_above_max_pence() {
        let mut config = TaxYearConfig::y2024_25();
        config.personal_allowance = i64::MAX;
        config.basic_rate_band = i64::MAX;
        config.additional_rate_threshold = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AmountTooLarge { field: "personal_allowance", value: i64::MAX, .. }
        ));

        config.personal_allowance = MAX_PENCE;
        config.basic_rate_band = MAX_PENCE;
        config.validate().unwrap();

        let mut years = TaxYears::builtin();
        config.basic_rate_band = MAX_PENCE + 1;
        assert!(years.insert(config).is_err());
    }

    #[test]
    fn insert_replaces_existing_label() {
        let mut years = TaxYears::builtin();
        let mut config = TaxYearConfig::y2024_25();
        config.dividend_allowance = 1_000_00;
        years.insert(config).unwrap();
        assert_eq!(years.labels().len(), 2);
        assert_eq!(years.get("2024/25").unwrap().dividend_allowance, 1_000_00);
    }

    #[test]
    fn load_json_adds_year_and_sets_active() {
        let mut config = TaxYearConfig::y2025_26();
        config.year_label = "2026/27".to_string();
        let file = TaxYearFile {
            active: Some("2026/27".to_string()),
            tax_years: vec![config],
        };
        let json = serde_json::to_string(&file).unwrap();

        let mut years = TaxYears::builtin();
        years.load_json(json.as_bytes()).unwrap();
        assert_eq!(years.labels(), ["2024/25", "2025/26", "2026/27"]);
        assert_eq!(years.active().unwrap().year_label, "2026/27");
    }

    #[test]
    fn load_json_rejects_invalid_records() {
        let mut years = TaxYears::builtin();
        let err = years
            .load_json(r#"{"tax_years": [{"year_label": "2026/27"}]}"#.as_bytes())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_json_unknown_active_is_not_found() {
        let mut years = TaxYears::builtin();
        let err = years.load_json(r#"{"active": "2030/31"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn file_round_trips_builtin_years() {
        let file = TaxYears::builtin().to_file();
        let json = serde_json::to_string_pretty(&file).unwrap();
        let mut years = TaxYears::builtin();
        years.load_json(json.as_bytes()).unwrap();
        assert_eq!(years.get("2024/25").unwrap(), &TaxYearConfig::y2024_25());
    }
}
