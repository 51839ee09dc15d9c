//! Cross-habit insights: pair-wise correlation and completion trend.
//!
//! Correlation uses the phi coefficient over per-day binary completion
//! columns, with a chi-square significance test (df=1). Short histories
//! produce too many spurious pairs, so the matrix requires at least
//! [`MIN_CORRELATION_DAYS`] logged days and two active habits.

use serde::{Deserialize, Serialize};

use crate::habit::{Catalog, HabitKind};
use crate::ledger::Ledger;
use crate::stats::percentage;

/// Logged days required before correlations are reported.
pub const MIN_CORRELATION_DAYS: usize = 21;

/// Daily rates required before a trend line is fitted.
const MIN_TREND_DAYS: usize = 7;

/// Phi coefficient between two binary series of equal length.
/// Ranges -1 (perfect negative) to +1 (perfect positive); degenerate
/// contingency tables (a constant series) yield 0.
fn phi_coefficient(a: &[bool], b: &[bool]) -> f64 {
    let mut n11 = 0f64;
    let mut n10 = 0f64;
    let mut n01 = 0f64;
    let mut n00 = 0f64;
    for (&x, &y) in a.iter().zip(b) {
        match (x, y) {
            (true, true) => n11 += 1.0,
            (true, false) => n10 += 1.0,
            (false, true) => n01 += 1.0,
            (false, false) => n00 += 1.0,
        }
    }
    let numerator = n11 * n00 - n10 * n01;
    let denominator = ((n11 + n10) * (n01 + n00) * (n11 + n01) * (n10 + n00)).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Chi-square significance of a phi coefficient over `n` observations,
/// as a p-value bucket (df=1 critical values).
fn phi_p_value(phi: f64, n: usize) -> f64 {
    let chi_square = phi * phi * n as f64;
    if chi_square >= 10.83 {
        0.001
    } else if chi_square >= 6.63 {
        0.01
    } else if chi_square >= 3.84 {
        0.05
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    fn for_phi(phi: f64) -> Self {
        let abs = phi.abs();
        if abs >= 0.7 {
            CorrelationStrength::Strong
        } else if abs >= 0.5 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }
}

/// One statistically significant habit pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitCorrelation {
    pub habit_a: String,
    pub name_a: String,
    pub habit_b: String,
    pub name_b: String,
    /// Phi coefficient, rounded to two decimals.
    pub phi: f64,
    pub p_value: f64,
    pub direction: CorrelationDirection,
    pub strength: CorrelationStrength,
}

/// Full pair-wise correlation matrix over the active catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Active habit ids, in matrix row/column order.
    pub habit_ids: Vec<String>,
    /// Symmetric phi matrix with a unit diagonal.
    pub matrix: Vec<Vec<f64>>,
    /// Pairs with `p <= 0.05` and `|phi| >= 0.3`.
    pub significant: Vec<HabitCorrelation>,
}

/// Pair-wise completion correlations over the logged days.
///
/// Returns `None` with fewer than [`MIN_CORRELATION_DAYS`] logged days
/// or fewer than two active habits.
pub fn correlation_matrix(ledger: &Ledger, catalog: &Catalog) -> Option<CorrelationMatrix> {
    let habits: Vec<_> = catalog.iter_active().collect();
    if ledger.len() < MIN_CORRELATION_DAYS || habits.len() < 2 {
        return None;
    }

    let columns: Vec<Vec<bool>> = habits
        .iter()
        .map(|habit| {
            ledger
                .iter()
                .map(|(_, record)| record.is_completed(habit.kind, &habit.id))
                .collect()
        })
        .collect();

    let n = habits.len();
    let days = ledger.len();
    let mut matrix = vec![vec![0.0f64; n]; n];
    let mut significant = Vec::new();

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let phi = phi_coefficient(&columns[i], &columns[j]);
            matrix[i][j] = phi;
            matrix[j][i] = phi;

            let p_value = phi_p_value(phi, days);
            if p_value <= 0.05 && phi.abs() >= 0.3 {
                significant.push(HabitCorrelation {
                    habit_a: habits[i].id.clone(),
                    name_a: habits[i].name.clone(),
                    habit_b: habits[j].id.clone(),
                    name_b: habits[j].name.clone(),
                    phi: (phi * 100.0).round() / 100.0,
                    p_value,
                    direction: if phi > 0.0 {
                        CorrelationDirection::Positive
                    } else {
                        CorrelationDirection::Negative
                    },
                    strength: CorrelationStrength::for_phi(phi),
                });
            }
        }
    }

    Some(CorrelationMatrix {
        habit_ids: habits.iter().map(|h| h.id.clone()).collect(),
        matrix,
        significant,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

/// Linear-regression trend over daily completion rates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Trend {
    /// Regression slope in percentage points per day, two decimals.
    pub slope: f64,
    /// Projected change from the fitted start to end value.
    pub percent_change: i32,
    pub direction: TrendDirection,
    /// R-squared of the fit.
    pub confidence: f64,
    /// Fit explains enough variance over enough days to act on.
    pub reliable: bool,
    pub avg_rate: u32,
}

/// Overall completion rate for each logged day, ascending by date.
fn daily_rates(ledger: &Ledger, catalog: &Catalog) -> Vec<u32> {
    let total = catalog.total_active();
    ledger
        .iter()
        .map(|(_, record)| {
            let completed: usize = HabitKind::ALL
                .iter()
                .map(|kind| {
                    catalog
                        .active(*kind)
                        .iter()
                        .filter(|h| record.is_completed(*kind, &h.id))
                        .count()
                })
                .sum();
            percentage(completed, total)
        })
        .collect()
}

/// Fit a trend line over the logged days' completion rates.
///
/// Fewer than seven rates reports `InsufficientData`; the fit is marked
/// reliable only with r-squared >= 0.3 over at least fourteen days.
pub fn completion_trend(ledger: &Ledger, catalog: &Catalog) -> Trend {
    let values = daily_rates(ledger, catalog);
    let n = values.len();
    let avg_rate = if n == 0 {
        0
    } else {
        (values.iter().map(|&v| f64::from(v)).sum::<f64>() / n as f64).round() as u32
    };
    if n < MIN_TREND_DAYS {
        return Trend {
            slope: 0.0,
            percent_change: 0,
            direction: TrendDirection::InsufficientData,
            confidence: 0.0,
            reliable: false,
            avg_rate,
        };
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let x = i as f64;
        let y = f64::from(v);
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;

    let start_value = intercept;
    let end_value = slope * (nf - 1.0) + intercept;
    let percent_change = if start_value > 0.0 {
        ((end_value - start_value) / start_value * 100.0).round() as i32
    } else {
        0
    };

    let y_mean = sum_y / nf;
    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let y = f64::from(v);
        let predicted = slope * i as f64 + intercept;
        ss_total += (y - y_mean).powi(2);
        ss_residual += (y - predicted).powi(2);
    }
    let r_squared = if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else {
        0.0
    };

    Trend {
        slope: (slope * 100.0).round() / 100.0,
        percent_change,
        direction: if slope > 0.1 {
            TrendDirection::Improving
        } else if slope < -0.1 {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        },
        confidence: r_squared,
        reliable: r_squared >= 0.3 && n >= 14,
        avg_rate,
    }
}

/// Trailing moving average for chart smoothing, rounded per point.
pub fn moving_average(values: &[u32], window: usize) -> Vec<u32> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window - 1);
            let subset = &values[start..=i];
            let sum: u32 = subset.iter().sum();
            ((f64::from(sum)) / subset.len() as f64).round() as u32
        })
        .collect()
}
