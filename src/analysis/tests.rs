//! Hypothesis tests over rental counts
//!
//! Three independent, read-only checks: Shapiro-Wilk normality,
//! Welch's two-sample t-test, and one-way ANOVA. Each returns a tagged
//! (statistic, p-value) pair. Degenerate inputs (zero variance, empty
//! or undersized partitions) report "test undefined" instead of
//! panicking.
//!
//! The Shapiro-Wilk statistic and p-value follow Royston's AS R94
//! approximation, valid for 3 <= n <= 5000; p-values for the other
//! tests come from the statrs Student's t and F distributions.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::error::{EdaError, EdaResult};

/// Which kind of test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestKind {
    Normality,
    TwoSample,
    MultiGroup,
}

/// Tagged outcome of a statistical test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub kind: TestKind,
    pub name: String,
    pub statistic: f64,
    pub p_value: f64,
}

impl TestResult {
    /// Whether the null hypothesis is rejected at the 5% level
    pub fn is_significant(&self) -> bool {
        self.p_value < 0.05
    }

    /// For normality results: whether the sample is consistent with a
    /// normal distribution (p > 0.05). Informational only.
    pub fn consistent_with_normal(&self) -> bool {
        self.kind == TestKind::Normality && self.p_value > 0.05
    }
}

/// Shapiro-Wilk normality test on a single sample
pub fn shapiro_wilk(values: &[f64]) -> EdaResult<TestResult> {
    let n = values.len();
    if n < 3 {
        return Err(EdaError::Degenerate(
            "normality test needs at least 3 observations".to_string(),
        ));
    }
    if n > 5000 {
        return Err(EdaError::Degenerate(
            "normality approximation is only valid up to 5000 observations".to_string(),
        ));
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] <= 0.0 {
        return Err(EdaError::Degenerate(
            "zero variance sample, normality is undefined".to_string(),
        ));
    }

    let standard_normal = standard_normal()?;

    // Expected values of standard normal order statistics (Blom scores)
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| standard_normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let ssq_m: f64 = m.iter().map(|v| v * v).sum();
    let rsn = 1.0 / nf.sqrt();

    // Weights: normalized scores with polynomial corrections for the
    // two (one, for n <= 5) extreme coefficients.
    let mut a = vec![0.0; n];
    let c_n = m[n - 1] / ssq_m.sqrt();
    let a_n = c_n
        + poly(&[0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056], rsn);

    if n > 5 {
        let c_n1 = m[n - 2] / ssq_m.sqrt();
        let a_n1 = c_n1
            + poly(&[0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633], rsn);
        let phi = (ssq_m - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
        let scale = phi.sqrt();
        for i in 2..n - 2 {
            a[i] = m[i] / scale;
        }
        a[n - 1] = a_n;
        a[0] = -a_n;
        a[n - 2] = a_n1;
        a[1] = -a_n1;
    } else if n == 3 {
        // Exact weights for the smallest sample
        a[2] = (0.5f64).sqrt();
        a[0] = -a[2];
    } else {
        let phi = (ssq_m - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
        let scale = phi.sqrt();
        for i in 1..n - 1 {
            a[i] = m[i] / scale;
        }
        a[n - 1] = a_n;
        a[0] = -a_n;
    }

    let mean = x.iter().sum::<f64>() / nf;
    let numerator: f64 = a.iter().zip(x.iter()).map(|(ai, xi)| ai * xi).sum();
    let denominator: f64 = x.iter().map(|xi| (xi - mean).powi(2)).sum();
    let w = (numerator * numerator / denominator).min(1.0 - 1e-12);

    let p_value = shapiro_p_value(w, n, &standard_normal);

    Ok(TestResult {
        kind: TestKind::Normality,
        name: "Shapiro-Wilk".to_string(),
        statistic: w,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Royston's normalizing transformation of W to an approximate p-value
fn shapiro_p_value(w: f64, n: usize, standard_normal: &Normal) -> f64 {
    let nf = n as f64;
    if n == 3 {
        // Exact for n = 3
        let p = 6.0 / std::f64::consts::PI
            * (w.sqrt().asin() - (0.75f64).sqrt().asin());
        return p.clamp(0.0, 1.0);
    }

    let ln_one_minus_w = (1.0 - w).ln();
    let z = if n <= 11 {
        let gamma = -2.273 + 0.459 * nf;
        if ln_one_minus_w >= gamma {
            // W beyond the transform's domain: as non-normal as the
            // approximation can express
            return 0.0;
        }
        let mu = poly(&[0.5440, -0.39978, 0.025054, -0.0006714], nf);
        let sigma = poly(&[1.3822, -0.77857, 0.062767, -0.0020322], nf).exp();
        (-(gamma - ln_one_minus_w).ln() - mu) / sigma
    } else {
        let ln_n = nf.ln();
        let mu = poly(&[-1.5861, -0.31082, -0.083751, 0.0038915], ln_n);
        let sigma = poly(&[-0.4803, -0.082676, 0.0030302], ln_n).exp();
        (ln_one_minus_w - mu) / sigma
    };
    1.0 - standard_normal.cdf(z)
}

/// Welch's two-sample t-test, unequal variances assumed
pub fn welch_t_test(a: &[f64], b: &[f64]) -> EdaResult<TestResult> {
    if a.is_empty() || b.is_empty() {
        return Err(EdaError::Degenerate(
            "two-sample test needs both partitions non-empty".to_string(),
        ));
    }
    if a.len() < 2 || b.len() < 2 {
        return Err(EdaError::Degenerate(
            "two-sample test needs at least two observations per partition".to_string(),
        ));
    }

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a), mean(b));
    let (v1, v2) = (sample_variance(a, m1), sample_variance(b, m2));

    let se_sq = v1 / n1 + v2 / n2;
    if se_sq <= 0.0 {
        return Err(EdaError::Degenerate(
            "zero variance in both partitions, t-statistic is undefined".to_string(),
        ));
    }

    let t = (m1 - m2) / se_sq.sqrt();
    // Welch-Satterthwaite degrees of freedom
    let df = se_sq.powi(2)
        / ((v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0));

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|_| EdaError::Degenerate("degrees of freedom are invalid".to_string()))?;
    let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));

    Ok(TestResult {
        kind: TestKind::TwoSample,
        name: "Welch t-test".to_string(),
        statistic: t,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// One-way ANOVA over two or more groups
pub fn one_way_anova(groups: &[Vec<f64>]) -> EdaResult<TestResult> {
    if groups.len() < 2 {
        return Err(EdaError::Degenerate(
            "ANOVA needs at least two groups".to_string(),
        ));
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(EdaError::Degenerate(
            "ANOVA needs every group non-empty".to_string(),
        ));
    }

    let k = groups.len() as f64;
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let nf = total as f64;
    if total <= groups.len() {
        return Err(EdaError::Degenerate(
            "ANOVA needs more observations than groups".to_string(),
        ));
    }

    let grand_mean = groups.iter().flatten().sum::<f64>() / nf;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let gm = mean(group);
        ss_between += group.len() as f64 * (gm - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - gm).powi(2)).sum::<f64>();
    }

    let df_between = k - 1.0;
    let df_within = nf - k;
    let ms_within = ss_within / df_within;
    if ms_within <= 0.0 {
        return Err(EdaError::Degenerate(
            "zero within-group variance, F-statistic is undefined".to_string(),
        ));
    }

    let f = (ss_between / df_between) / ms_within;
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|_| EdaError::Degenerate("degrees of freedom are invalid".to_string()))?;
    let p_value = 1.0 - dist.cdf(f);

    Ok(TestResult {
        kind: TestKind::MultiGroup,
        name: "One-way ANOVA".to_string(),
        statistic: f,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

fn standard_normal() -> EdaResult<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|_| EdaError::Degenerate("standard normal unavailable".to_string()))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Evaluate a polynomial with ascending-power coefficients at `x`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapiro_on_normal_scores_accepts() {
        // A sample that IS the expected normal order statistics should
        // look as normal as a sample can look.
        let normal = standard_normal().unwrap();
        let n = 50;
        let values: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
            .collect();
        let result = shapiro_wilk(&values).unwrap();
        assert!(result.statistic > 0.98);
        assert!(result.statistic <= 1.0);
        assert!(result.p_value > 0.05);
        assert!(result.consistent_with_normal());
    }

    #[test]
    fn test_shapiro_on_heavy_tail_rejects() {
        // Exponential-ish growth is decidedly non-normal.
        let values: Vec<f64> = (0..80).map(|i| (i as f64 * 0.1).exp()).collect();
        let result = shapiro_wilk(&values).unwrap();
        assert!(result.statistic < 0.8);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_shapiro_zero_variance_is_degenerate() {
        let values = vec![7.0; 40];
        assert!(matches!(
            shapiro_wilk(&values),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_shapiro_tiny_sample_is_degenerate() {
        assert!(matches!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_welch_known_value() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![2.0, 3.0, 4.0, 5.0, 6.0];
        let result = welch_t_test(&a, &b).unwrap();
        // Equal variances and sizes: t = -1, df = 8.
        assert!((result.statistic - (-1.0)).abs() < 1e-10);
        assert!(result.p_value > 0.3 && result.p_value < 0.4);
    }

    #[test]
    fn test_welch_unbalanced_partition_sizes() {
        // Partition sizes mirroring a workingday split of 731 days.
        let a: Vec<f64> = (0..500).map(|i| 4500.0 + (i % 100) as f64 * 7.0).collect();
        let b: Vec<f64> = (0..231).map(|i| 4000.0 + (i % 80) as f64 * 9.0).collect();
        let result = welch_t_test(&a, &b).unwrap();
        assert!(result.statistic.is_finite());
        assert!((0.0..=1.0).contains(&result.p_value));
    }

    #[test]
    fn test_welch_empty_partition_is_degenerate() {
        assert!(matches!(
            welch_t_test(&[1.0, 2.0], &[]),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_welch_zero_variance_is_degenerate() {
        assert!(matches!(
            welch_t_test(&[3.0, 3.0, 3.0], &[3.0, 3.0, 3.0]),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_anova_known_value() {
        let groups = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 3.0, 4.0],
            vec![3.0, 4.0, 5.0],
        ];
        let result = one_way_anova(&groups).unwrap();
        // ssb = 6, ssw = 6, df = (2, 6): F = 3.
        assert!((result.statistic - 3.0).abs() < 1e-10);
        assert!(result.p_value > 0.1 && result.p_value < 0.15);
    }

    #[test]
    fn test_anova_identical_groups_is_degenerate() {
        let groups = vec![vec![5.0, 5.0], vec![5.0, 5.0], vec![5.0, 5.0]];
        assert!(matches!(
            one_way_anova(&groups),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_anova_empty_group_is_degenerate() {
        let groups = vec![vec![1.0, 2.0], vec![]];
        assert!(matches!(
            one_way_anova(&groups),
            Err(EdaError::Degenerate(_))
        ));
    }

    #[test]
    fn test_anova_separated_groups_reject() {
        let groups = vec![
            vec![1.0, 1.1, 0.9, 1.05],
            vec![10.0, 10.2, 9.8, 10.1],
            vec![20.0, 19.9, 20.1, 20.05],
        ];
        let result = one_way_anova(&groups).unwrap();
        assert!(result.statistic > 100.0);
        assert!(result.p_value < 0.001);
        assert!(result.is_significant());
    }
}
