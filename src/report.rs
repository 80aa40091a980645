//! Console rendering of the analysis passes.
//!
//! Every report implements `Display`; nothing here computes statistics.

use crate::claims::{CheckOutcome, VerificationSummary};
use crate::core::{Unit, Variable};
use crate::forecast::Z_95;
use crate::pipeline::{
    ComparisonOutcome, ForecastRun, TrendReport, ValidationReport, VariableOutcome,
};
use crate::trend::RateBasis;
use std::fmt::{self, Display, Formatter};

const RULE: &str = "============================================================";

fn heading(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{RULE}")
}

fn decimals(unit: Unit) -> usize {
    match unit {
        Unit::Celsius => 3,
        Unit::Days | Unit::Centimeters => 2,
    }
}

/// p-values keep four significant digits however small they get.
fn p_value(p: f64) -> String {
    if p.is_nan() {
        "nan".to_string()
    } else if p != 0.0 && p.abs() < 1e-3 {
        format!("{p:.3e}")
    } else {
        format!("{p:.4}")
    }
}

fn skipped<T>(f: &mut Formatter<'_>, outcome: &VariableOutcome<T>) -> fmt::Result {
    if let Err(err) = &outcome.result {
        writeln!(f, "{}: skipped ({err})", outcome.variable.key)?;
    }
    Ok(())
}

fn write_comparisons(f: &mut Formatter<'_>, comparisons: &[ComparisonOutcome]) -> fmt::Result {
    for outcome in comparisons {
        let (first, second) = (&outcome.pair.first, &outcome.pair.second);
        let cmp = match &outcome.result {
            Ok(cmp) => cmp,
            Err(err) => {
                writeln!(f, "{first} vs {second}: insufficient data ({err})")?;
                continue;
            }
        };
        let rule = match cmp.basis {
            RateBasis::Magnitude => "|first| - |second|",
            RateBasis::Signed => "first - second",
        };
        writeln!(
            f,
            "{first} vs {second}: {:+.4} vs {:+.4} per year, {rule} = {:+.4} per year ({:+.3} per decade), ratio {:.2}x",
            cmp.first_slope,
            cmp.second_slope,
            cmp.difference,
            cmp.difference * 10.0,
            cmp.ratio,
        )?;
        match cmp.first_is_faster() {
            Some(true) => writeln!(f, "  -> {first} changing faster")?,
            Some(false) => writeln!(f, "  -> {second} changing faster")?,
            None => writeln!(
                f,
                "  -> similar rates (difference within {} per year)",
                cmp.threshold
            )?,
        }
    }
    Ok(())
}

impl Display for TrendReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, "LINEAR TRENDS (OLS)")?;
        for outcome in &self.trends {
            let Some(trend) = outcome.value() else {
                skipped(f, outcome)?;
                continue;
            };
            let v = &outcome.variable;
            let d = decimals(v.unit);
            writeln!(
                f,
                "{}: {:+.d$} {}/decade (R² = {:.3}, p = {}, {} trend{})",
                v.key,
                trend.slope_per_decade(),
                v.unit,
                trend.r_squared,
                p_value(trend.p_value),
                trend.strength(),
                if trend.is_significant(0.05) { ", significant" } else { "" },
            )?;
            let (in5, in10) = (trend.last_year + 5, trend.last_year + 10);
            writeln!(
                f,
                "  fitted {}: {:.d$}, projected {in5}: {:.d$}, {in10}: {:.d$}",
                trend.last_year,
                trend.project(trend.last_year),
                trend.project(in5),
                trend.project(in10),
            )?;
        }

        if !self.comparisons.is_empty() {
            writeln!(f)?;
            heading(f, "RATE COMPARISONS")?;
            write_comparisons(f, &self.comparisons)?;
        }

        writeln!(f)?;
        heading(f, "ENDPOINT CHANGE")?;
        for outcome in &self.endpoints {
            let Some(change) = outcome.value() else {
                skipped(f, outcome)?;
                continue;
            };
            let v = &outcome.variable;
            writeln!(
                f,
                "{}: {} {:.1} -> {} {:.1} ({:+.1} {} over {} years)",
                v.key,
                change.first_year,
                change.first_value,
                change.last_year,
                change.last_value,
                change.change(),
                v.unit,
                change.span_years(),
            )?;
        }

        if !self.period_means.is_empty() {
            writeln!(f)?;
            heading(f, "PERIOD MEANS")?;
            for period in &self.period_means {
                writeln!(f, "{}", period.period.label())?;
                for (variable, mean) in &period.means {
                    match mean {
                        Some(mean) => writeln!(f, "  {}: {mean:.1} {}", variable.key, variable.unit)?,
                        None => writeln!(f, "  {}: no data", variable.key)?,
                    }
                }
            }
        }

        writeln!(f)?;
        heading(f, "DATA COVERAGE")?;
        let c = &self.coverage;
        writeln!(f, "Total years: {}", c.n_years)?;
        if let (Some(first), Some(last)) = (c.first_year, c.last_year) {
            writeln!(f, "First year: {first}, last year: {last}")?;
        }
        if c.missing_years.is_empty() {
            writeln!(f, "Missing years: none")?;
        } else {
            let years: Vec<String> = c.missing_years.iter().map(i32::to_string).collect();
            writeln!(f, "Missing years ({}): {}", years.len(), years.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "R² > 0.5 strong, 0.3-0.5 moderate, < 0.3 weak; p < 0.05 significant.")
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, "ROBUST TREND VALIDATION")?;
        writeln!(f, "metric,slope/decade,r2,p_ols,p_hac,p_mk,sen/decade,lb_p")?;
        for outcome in &self.trends {
            let Some(trend) = outcome.value() else {
                skipped(f, outcome)?;
                continue;
            };
            let Some(robust) = &trend.robust else {
                continue;
            };
            writeln!(
                f,
                "{},{:+.3},{:.3},{},{},{},{:+.3},{}",
                outcome.variable.key,
                trend.slope_per_decade(),
                trend.r_squared,
                p_value(trend.p_value),
                p_value(robust.hac_p_value),
                p_value(robust.kendall.p_value),
                robust.theil_sen.slope_per_decade(),
                p_value(robust.ljung_box.p_value),
            )?;
        }

        for outcome in &self.comparisons {
            if let Ok(cmp) = &outcome.result {
                if cmp.basis == RateBasis::Magnitude {
                    writeln!(
                        f,
                        "\nratio_{}_vs_{}={:.3}",
                        outcome.pair.first, outcome.pair.second, cmp.ratio
                    )?;
                }
            }
        }

        if let Some(outcome) = &self.backtest {
            writeln!(f)?;
            match &outcome.result {
                Ok(bt) => {
                    heading(
                        f,
                        &format!(
                            "FORECAST BACKTEST {} (1-step rolling-origin, {}-{})",
                            outcome.variable.key, bt.test_start_year, bt.test_end_year
                        ),
                    )?;
                    for score in &bt.scores {
                        writeln!(
                            f,
                            "{},MAE={:.3},RMSE={:.3}",
                            score.model, score.metrics.mae, score.metrics.rmse
                        )?;
                    }
                }
                Err(err) => writeln!(f, "backtest of {}: skipped ({err})", outcome.variable.key)?,
            }
        }

        if let Some(outcome) = &self.holt_preview {
            writeln!(f)?;
            match &outcome.result {
                Ok(points) => {
                    heading(f, &format!("HOLT POINT FORECASTS {}", outcome.variable.key))?;
                    for (year, value) in points {
                        writeln!(f, "{year},{value:.3}")?;
                    }
                }
                Err(err) => writeln!(f, "holt preview of {}: skipped ({err})", outcome.variable.key)?,
            }
        }
        Ok(())
    }
}

fn write_forecast(f: &mut Formatter<'_>, variable: &Variable, run: &crate::forecast::SeriesForecast) -> fmt::Result {
    let d = decimals(variable.unit);
    let best = run.backtest.score(run.model);
    writeln!(
        f,
        "{} ({}): {} selected, backtest {}-{} MAE {:.3} RMSE {:.3}",
        variable.key,
        variable.unit,
        run.model,
        run.backtest.test_start_year,
        run.backtest.test_end_year,
        best.map_or(f64::NAN, |m| m.mae),
        run.rmse,
    )?;
    for p in &run.points {
        writeln!(f, "  {} {:.d$} [{:.d$}, {:.d$}]", p.year, p.forecast, p.low, p.high)?;
    }
    Ok(())
}

impl Display for ForecastRun {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, "FORECASTS")?;
        for outcome in &self.forecasts {
            match &outcome.result {
                Ok(run) => write_forecast(f, &outcome.variable, run)?,
                Err(err) => writeln!(f, "{}: skipped ({err})", outcome.variable.key)?,
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "Bands are ±{Z_95}·RMSE·√h from the one-step backtest error, an approximation and not a model-based prediction interval."
        )
    }
}

/// Claim verification results ready for printing.
#[derive(Debug, Clone, Copy)]
pub struct VerificationReport<'a> {
    pub outcomes: &'a [CheckOutcome],
}

impl<'a> VerificationReport<'a> {
    pub fn new(outcomes: &'a [CheckOutcome]) -> Self {
        Self { outcomes }
    }

    pub fn summary(&self) -> VerificationSummary {
        VerificationSummary::of(self.outcomes)
    }
}

impl Display for VerificationReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, "CLAIM VERIFICATION")?;
        for o in self.outcomes {
            let status = if o.passed { "PASS" } else { "FAIL" };
            write!(
                f,
                "[{status}] {}: computed {}, expected {} (tolerance {})",
                o.label, o.computed, o.expected, o.tolerance
            )?;
            if let Some(value) = o.located_value {
                write!(f, ", value {value}")?;
            }
            if !o.passed && o.computed.is_finite() {
                write!(f, ", off by {:+.3}", o.difference())?;
            }
            if let Some(note) = &o.note {
                write!(f, " - {note}")?;
            }
            writeln!(f)?;
        }
        let summary = self.summary();
        writeln!(
            f,
            "\n{} passed, {} failed of {}",
            summary.passed,
            summary.failed,
            self.outcomes.len()
        )
    }
}
