//! The windowed ratio engine.

use perfcalc_core::types::TimeSeries;
use perfcalc_math::rolling::{rolling_apply, stats};

use super::cache::{BetaCache, Column};
use super::config::RatioConfig;
use super::metric::Metric;
use super::series::MetricSeries;
use super::table::{BenchmarkColumns, BenchmarkSource, ReturnsTable};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Minimum number of primary observations an engine accepts.
pub const MIN_OBSERVATIONS: usize = 2;

type Pair = (Option<f64>, Option<f64>);

/// Computes rolling risk and performance ratios for one instrument.
///
/// The engine owns a [`ReturnsTable`] built at construction and answers
/// every metric as a [`MetricSeries`] aligned to that table's rows. A
/// window of `w` rows yields missing values on the first `w - 1` rows;
/// a window of zero or of at least the table length yields a column with
/// no values at all.
///
/// Benchmark-relative metrics need either a benchmark series or a
/// risk-free rate in the [`RatioConfig`]; with only a rate, the benchmark
/// is synthesized by compounding it daily.
///
/// Beta columns are cached per window, and the cache is safe to populate
/// from several threads, so an engine can be shared behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::ratios::{RatioConfig, RatioEngine};
/// use perfcalc_core::types::{Date, TimeSeries};
///
/// let start = Date::from_ymd(2020, 1, 31).unwrap();
/// let navs = [100.0, 102.0, 101.0, 105.0, 107.0, 104.0, 110.0, 108.0];
/// let primary = TimeSeries::from_pairs(
///     navs.iter().enumerate().map(|(i, &v)| (start.add_months(i as i32).unwrap(), v)),
/// )
/// .unwrap();
///
/// let engine = RatioEngine::new(primary, None, RatioConfig::default()).unwrap();
/// let vol = engine.volatility(6);
///
/// assert!(vol.get(4).is_none());
/// assert!(vol.tail().unwrap() > 0.0);
/// ```
#[derive(Debug)]
pub struct RatioEngine {
    table: ReturnsTable,
    config: RatioConfig,
    beta_cache: BetaCache,
}

impl RatioEngine {
    /// Creates an engine over `primary`, optionally against `benchmark`.
    ///
    /// An empty benchmark series is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::Configuration` if the primary series has
    /// fewer than two observations or the config is invalid.
    pub fn new(
        primary: TimeSeries,
        benchmark: Option<TimeSeries>,
        config: RatioConfig,
    ) -> AnalyticsResult<Self> {
        config.validate()?;

        if primary.len() < MIN_OBSERVATIONS {
            return Err(AnalyticsError::configuration(format!(
                "primary series needs at least {MIN_OBSERVATIONS} points, got {}",
                primary.len()
            )));
        }

        let table = ReturnsTable::new(&primary);
        let table = match (benchmark.filter(|b| !b.is_empty()), config.risk_free_rate) {
            (Some(bench), _) => table.with_benchmark(&bench),
            (None, Some(rate)) => table.with_synthetic_benchmark(rate, config.periods()),
            (None, None) => table,
        };

        log::debug!(
            "ratio engine: {} rows, benchmark {:?}",
            table.len(),
            table.benchmark().map(BenchmarkColumns::source)
        );

        Ok(Self {
            table,
            config,
            beta_cache: BetaCache::new(),
        })
    }

    /// Returns the derived return columns.
    #[must_use]
    pub fn returns(&self) -> &ReturnsTable {
        &self.table
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &RatioConfig {
        &self.config
    }

    /// Returns true if benchmark-relative metrics are available.
    #[must_use]
    pub fn has_benchmark(&self) -> bool {
        self.table.benchmark().is_some()
    }

    /// Returns where the benchmark columns came from, if any.
    #[must_use]
    pub fn benchmark_source(&self) -> Option<BenchmarkSource> {
        self.table.benchmark().map(BenchmarkColumns::source)
    }

    /// Returns the number of windows with a cached beta column.
    #[must_use]
    pub fn cached_beta_windows(&self) -> usize {
        self.beta_cache.len()
    }

    /// Computes `metric` over `window` rows.
    pub fn compute(&self, metric: Metric, window: usize) -> AnalyticsResult<MetricSeries> {
        match metric {
            Metric::Volatility => Ok(self.volatility(window)),
            Metric::Drawdown => Ok(self.drawdown(window)),
            Metric::Beta => self.beta(window),
            Metric::Alpha => self.alpha(window),
            Metric::Treynor => self.treynor(window),
            Metric::Sharpe => self.sharpe(window),
            Metric::Sortino => self.sortino(window),
            Metric::UpsideCapture => self.upside_capture(window),
            Metric::DownsideCapture => self.downside_capture(window),
        }
    }

    /// Annualised sample standard deviation of periodic returns.
    #[must_use]
    pub fn volatility(&self, window: usize) -> MetricSeries {
        let scale = self.config.periods().sqrt();
        let column = rolling_apply(self.table.returns(), self.span(window), |w| {
            stats::sample_std(&stats::present(w)).map(|s| s * scale)
        });
        self.series(Metric::Volatility, column)
    }

    /// Decline of each level from the highest level in its window.
    #[must_use]
    pub fn drawdown(&self, window: usize) -> MetricSeries {
        let column = rolling_apply(self.table.values(), self.span(window), |w| {
            let last = *w.last()?;
            stats::max(w).map(|peak| last / peak - 1.0)
        });
        self.series(Metric::Drawdown, column)
    }

    /// Rolling sample covariance with the benchmark over benchmark variance.
    pub fn beta(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        let column = self.beta_column(Metric::Beta, window)?;
        Ok(self.series(Metric::Beta, column.as_ref().clone()))
    }

    /// Cumulative return in excess of the beta-implied cumulative return.
    ///
    /// `cum_p - (cum_b + β · (cum_p - cum_b))`, with beta at the same window.
    pub fn alpha(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        let beta = self.beta_column(Metric::Alpha, window)?;
        let bench = self.bench(Metric::Alpha)?;

        let column = self
            .table
            .cumulative_returns()
            .iter()
            .zip(bench.cumulative_returns())
            .zip(beta.iter())
            .map(|((&cum_p, &cum_b), &beta)| {
                let (cum_p, cum_b, beta) = (cum_p?, cum_b?, beta?);
                finite(cum_p - (cum_b + beta * (cum_p - cum_b)))
            })
            .collect();
        Ok(self.series(Metric::Alpha, column))
    }

    /// Periodic excess return per unit of beta.
    pub fn treynor(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        let beta = self.beta_column(Metric::Treynor, window)?;
        let bench = self.bench(Metric::Treynor)?;

        let column = self
            .table
            .returns()
            .iter()
            .zip(bench.returns())
            .zip(beta.iter())
            .map(|((&r_p, &r_b), &beta)| finite((r_p? - r_b?) / beta?))
            .collect();
        Ok(self.series(Metric::Treynor, column))
    }

    /// Annualised excess return per unit of annualised tracking volatility.
    pub fn sharpe(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        self.excess_ratio(Metric::Sharpe, window, |excess| excess)
    }

    /// Like [`sharpe`](Self::sharpe), but only shortfalls against the
    /// benchmark count towards the volatility.
    pub fn sortino(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        self.excess_ratio(Metric::Sortino, window, |excess| excess.min(0.0))
    }

    /// Primary growth over benchmark growth in periods the benchmark rose.
    pub fn upside_capture(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        self.capture(Metric::UpsideCapture, window, |r_b| r_b > 0.0, |g_p, g_b| {
            (1.0 + g_p) / (1.0 + g_b)
        })
    }

    /// Primary loss over benchmark loss in periods the benchmark fell.
    pub fn downside_capture(&self, window: usize) -> AnalyticsResult<MetricSeries> {
        self.capture(Metric::DownsideCapture, window, |r_b| r_b < 0.0, |g_p, g_b| {
            (1.0 - g_p) / (1.0 - g_b)
        })
    }

    /// Window length the rolling iterator should use.
    ///
    /// A window spanning the whole table never fills.
    fn span(&self, window: usize) -> usize {
        if window >= self.table.len() {
            0
        } else {
            window
        }
    }

    fn series(&self, metric: Metric, column: Vec<Option<f64>>) -> MetricSeries {
        MetricSeries::new(metric.name(), self.table.dates(), column)
    }

    fn bench(&self, metric: Metric) -> AnalyticsResult<&BenchmarkColumns> {
        self.table
            .benchmark()
            .ok_or_else(|| AnalyticsError::missing_benchmark(metric.name()))
    }

    /// Primary and benchmark returns side by side.
    fn return_pairs(&self, bench: &BenchmarkColumns) -> Vec<Pair> {
        self.table
            .returns()
            .iter()
            .copied()
            .zip(bench.returns().iter().copied())
            .collect()
    }

    fn beta_column(&self, metric: Metric, window: usize) -> AnalyticsResult<Column> {
        let bench = self.bench(metric)?;
        let span = self.span(window);
        Ok(self.beta_cache.get_or_compute(window, || {
            rolling_apply(&self.return_pairs(bench), span, |w| {
                let pairs = stats::present_pairs(w);
                let bench_returns: Vec<f64> = pairs.iter().map(|p| p.1).collect();
                let covariance = stats::sample_covariance(&pairs)?;
                let variance = stats::sample_variance(&bench_returns)?;
                Some(covariance / variance)
            })
        }))
    }

    /// Annualised mean excess over the annualised std of `deviation(excess)`.
    fn excess_ratio<F>(
        &self,
        metric: Metric,
        window: usize,
        deviation: F,
    ) -> AnalyticsResult<MetricSeries>
    where
        F: Fn(f64) -> f64,
    {
        let bench = self.bench(metric)?;
        let periods = self.config.periods();
        let scale = periods.sqrt();

        let column = rolling_apply(&self.return_pairs(bench), self.span(window), |w| {
            let pairs = stats::present_pairs(w);
            let primary: Vec<f64> = pairs.iter().map(|p| p.0).collect();
            let benchmark: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let deviations: Vec<f64> = pairs.iter().map(|(p, b)| deviation(p - b)).collect();

            let annual_p = (1.0 + stats::mean(&primary)?).powf(periods) - 1.0;
            let annual_b = (1.0 + stats::mean(&benchmark)?).powf(periods) - 1.0;
            let spread = stats::sample_std(&deviations)?;

            Some((annual_p - annual_b) / (spread * scale))
        });
        Ok(self.series(metric, column))
    }

    /// Compounds primary and benchmark returns over the rows `keep` selects
    /// (by benchmark return); unselected rows count as zero.
    fn capture<K, R>(
        &self,
        metric: Metric,
        window: usize,
        keep: K,
        ratio: R,
    ) -> AnalyticsResult<MetricSeries>
    where
        K: Fn(f64) -> bool,
        R: Fn(f64, f64) -> f64,
    {
        let bench = self.bench(metric)?;

        let masked: Vec<(f64, f64)> = self
            .return_pairs(bench)
            .into_iter()
            .map(|(r_p, r_b)| match r_b {
                Some(r_b) if keep(r_b) => (r_p.unwrap_or(0.0), r_b),
                _ => (0.0, 0.0),
            })
            .collect();

        let column = rolling_apply(&masked, self.span(window), |w| {
            let primary: Vec<f64> = w.iter().map(|p| p.0).collect();
            let benchmark: Vec<f64> = w.iter().map(|p| p.1).collect();
            Some(ratio(
                stats::compounded_growth(&primary),
                stats::compounded_growth(&benchmark),
            ))
        });
        Ok(self.series(metric, column))
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use perfcalc_core::types::Date;

    const MONTHLY_NAVS: [f64; 12] = [
        100.0, 102.0, 101.0, 105.0, 107.0, 104.0, 110.0, 108.0, 112.0, 115.0, 111.0, 118.0,
    ];

    fn monthly(values: &[f64]) -> TimeSeries {
        let start = Date::from_ymd(2020, 1, 31).unwrap();
        TimeSeries::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start.add_months(i as i32).unwrap(), v)),
        )
        .unwrap()
    }

    fn engine(benchmark: Option<&[f64]>, config: RatioConfig) -> RatioEngine {
        RatioEngine::new(monthly(&MONTHLY_NAVS), benchmark.map(monthly), config).unwrap()
    }

    #[test]
    fn test_rejects_short_primary() {
        let one = monthly(&[100.0]);
        let err = RatioEngine::new(one, None, RatioConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::Configuration { .. }));
    }

    #[test]
    fn test_rejects_zero_annualiser() {
        let err = RatioEngine::new(
            monthly(&MONTHLY_NAVS),
            None,
            RatioConfig::default().with_annualiser(0),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::Configuration { .. }));
    }

    #[test]
    fn test_volatility_window_alignment() {
        let vol = engine(None, RatioConfig::default()).volatility(6);

        assert_eq!(vol.len(), 12);
        for row in 0..5 {
            assert!(vol.get(row).is_none(), "row {row} should be missing");
        }
        for row in 5..12 {
            assert!(vol.get(row).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_volatility_value() {
        let engine = engine(None, RatioConfig::default().with_annualiser(12));
        let vol = engine.volatility(3);

        // Row 3 sees returns at rows 1..=3.
        let returns: Vec<f64> = engine.returns().returns()[1..=3]
            .iter()
            .map(|r| r.unwrap())
            .collect();
        let expected = stats::sample_std(&returns).unwrap() * 12f64.sqrt();
        assert_relative_eq!(vol.get(3).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_window_at_or_beyond_length_is_empty() {
        let engine = engine(None, RatioConfig::default());
        assert_eq!(engine.volatility(12).defined().count(), 0);
        assert_eq!(engine.volatility(500).defined().count(), 0);
        assert_eq!(engine.drawdown(0).defined().count(), 0);
        assert_eq!(engine.volatility(11).defined().count(), 2);
    }

    #[test]
    fn test_drawdown_non_positive_and_zero_at_peak() {
        let dd = engine(None, RatioConfig::default()).drawdown(4);

        for (_, value) in dd.defined() {
            assert!(value <= 0.0);
        }
        // 110 at row 6 is the running peak.
        assert_relative_eq!(dd.get(6).unwrap(), 0.0);
        // 108 against the 110 peak.
        assert_relative_eq!(dd.get(7).unwrap(), 108.0 / 110.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_against_self_is_one() {
        let engine = engine(Some(&MONTHLY_NAVS), RatioConfig::default());
        let beta = engine.beta(5).unwrap();

        assert!(beta.get(3).is_none());
        for row in 4..12 {
            assert_relative_eq!(beta.get(row).unwrap(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_beta_cache_reuse() {
        let engine = engine(Some(&MONTHLY_NAVS), RatioConfig::default());
        assert_eq!(engine.cached_beta_windows(), 0);

        let beta = engine.beta(4).unwrap();
        engine.alpha(4).unwrap();
        engine.treynor(4).unwrap();
        assert_eq!(engine.cached_beta_windows(), 1);
        assert_eq!(engine.beta(4).unwrap(), beta);

        engine.beta(6).unwrap();
        assert_eq!(engine.cached_beta_windows(), 2);
    }

    #[test]
    fn test_alpha_against_self_is_zero() {
        let engine = engine(Some(&MONTHLY_NAVS), RatioConfig::default());
        let alpha = engine.alpha(4).unwrap();

        assert_eq!(alpha.defined().count(), 9);
        for (_, value) in alpha.defined() {
            assert_relative_eq!(value, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_treynor_formula() {
        let bench = [50.0, 50.5, 51.5, 51.0, 52.0, 53.5, 53.0, 54.0, 55.5, 55.0, 56.0, 57.5];
        let engine = engine(Some(&bench), RatioConfig::default());
        let beta = engine.beta(5).unwrap();
        let treynor = engine.treynor(5).unwrap();

        let table = engine.returns();
        let b = table.benchmark().unwrap();
        for row in 4..12 {
            let expected = (table.returns()[row].unwrap() - b.returns()[row].unwrap())
                / beta.get(row).unwrap();
            assert_relative_eq!(treynor.get(row).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sharpe_against_risk_free_rate() {
        let engine = engine(None, RatioConfig::default().with_risk_free_rate(0.05));
        assert_eq!(engine.benchmark_source(), Some(BenchmarkSource::Synthetic));

        let sharpe = engine.sharpe(6).unwrap();
        for row in 0..5 {
            assert!(sharpe.get(row).is_none());
        }
        for row in 5..12 {
            assert!(sharpe.get(row).unwrap().is_finite());
        }
    }

    #[test]
    fn test_sortino_uses_shortfalls() {
        let engine = engine(None, RatioConfig::default().with_risk_free_rate(0.0));
        let sharpe = engine.sharpe(6).unwrap();
        let sortino = engine.sortino(6).unwrap();

        // Same numerator, smaller denominator.
        for row in 5..12 {
            let (sh, so) = (sharpe.get(row).unwrap(), sortino.get(row).unwrap());
            assert_eq!(sh.signum(), so.signum());
            assert!(so.abs() >= sh.abs());
        }
    }

    /// Seven month-ends against a benchmark that also prints on 2020-04-15,
    /// so the joined benchmark returns differ from a same-date benchmark.
    fn joined_engine() -> RatioEngine {
        let primary = monthly(&[100.0, 103.0, 101.0, 106.0, 104.0, 109.0, 112.0]);
        let month_ends = monthly(&[100.0, 101.0, 102.0, 100.0, 103.0, 104.0, 105.0]);
        let mut bench: Vec<(Date, f64)> = month_ends
            .points()
            .iter()
            .map(|p| (p.date, p.value))
            .collect();
        bench.push((Date::from_ymd(2020, 4, 15).unwrap(), 101.5));

        RatioEngine::new(
            primary,
            Some(TimeSeries::from_pairs(bench).unwrap()),
            RatioConfig::default().with_annualiser(12),
        )
        .unwrap()
    }

    #[test]
    fn test_sharpe_value() {
        let sharpe = joined_engine().sharpe(4).unwrap();

        assert!(sharpe.get(2).is_none());
        assert_relative_eq!(sharpe.get(5).unwrap(), 0.447_476_311_783_790_05, epsilon = 1e-10);
        assert_relative_eq!(sharpe.get(6).unwrap(), 1.556_274_315_324_607, epsilon = 1e-10);
    }

    #[test]
    fn test_sortino_value_with_positive_excess() {
        let engine = joined_engine();
        let sortino = engine.sortino(4).unwrap();

        // Row 6 excess returns are mixed; only the shortfall enters the spread.
        let table = engine.returns();
        let b = table.benchmark().unwrap();
        let excess: Vec<f64> = (3..=6)
            .map(|row| table.returns()[row].unwrap() - b.returns()[row].unwrap())
            .collect();
        assert_eq!(excess.iter().filter(|e| **e > 0.0).count(), 3);

        assert_relative_eq!(sortino.get(5).unwrap(), 1.006_715_587_027_309_5, epsilon = 1e-10);
        assert_relative_eq!(sortino.get(6).unwrap(), 3.082_882_941_341_815_7, epsilon = 1e-10);
    }

    #[test]
    fn test_alpha_value_against_joined_benchmark() {
        let engine = joined_engine();

        // Benchmark cumulative return carries the 2020-04-15 print.
        let b = engine.returns().benchmark().unwrap();
        let cum_b = b.cumulative_returns()[6].unwrap();
        let cum_p = engine.returns().cumulative_returns()[6].unwrap();
        assert_relative_eq!(cum_b, 0.049_544_826_671_005_79, epsilon = 1e-12);
        assert_relative_eq!(cum_p, 0.116_819_409_095_332_06, epsilon = 1e-12);

        let beta = engine.beta(4).unwrap();
        assert_relative_eq!(beta.get(6).unwrap(), -1.473_773_311_741_295_2, epsilon = 1e-10);

        let alpha = engine.alpha(4).unwrap();
        assert_relative_eq!(alpha.get(5).unwrap(), 0.124_809_165_446_187_34, epsilon = 1e-10);
        assert_relative_eq!(alpha.get(6).unwrap(), 0.166_422_066_559_838_32, epsilon = 1e-10);
    }

    #[test]
    fn test_capture_against_self_is_one() {
        let engine = engine(Some(&MONTHLY_NAVS), RatioConfig::default());
        let up = engine.upside_capture(4).unwrap();
        let down = engine.downside_capture(4).unwrap();

        assert_eq!(up.defined().count(), 9);
        for row in 3..12 {
            assert_relative_eq!(up.get(row).unwrap(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(down.get(row).unwrap(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_upside_capture_value() {
        let primary = [100.0, 110.0, 99.0, 108.9];
        let bench = [100.0, 105.0, 100.0, 101.0];
        let engine = RatioEngine::new(
            monthly(&primary),
            Some(monthly(&bench)),
            RatioConfig::default(),
        )
        .unwrap();

        // Benchmark up at rows 1 and 3: primary +10% twice, benchmark +5% and +1%.
        let up = engine.upside_capture(3).unwrap();
        let expected = (1.1 * 1.1) / (1.05 * 1.01);
        assert_relative_eq!(up.get(3).unwrap(), expected, epsilon = 1e-12);

        // Benchmark down only at row 2.
        let down = engine.downside_capture(3).unwrap();
        let g_b = 100.0 / 105.0 - 1.0;
        assert_relative_eq!(down.get(3).unwrap(), (1.0 + 0.1) / (1.0 - g_b), epsilon = 1e-12);
    }

    #[test]
    fn test_missing_benchmark() {
        let engine = engine(None, RatioConfig::default());
        assert!(!engine.has_benchmark());
        assert_eq!(engine.benchmark_source(), None);

        for metric in Metric::ALL {
            let result = engine.compute(metric, 4);
            if metric.requires_benchmark() {
                let err = result.unwrap_err();
                assert_eq!(err, AnalyticsError::missing_benchmark(metric.name()));
            } else {
                assert!(result.is_ok());
            }
        }
    }

    #[test]
    fn test_empty_benchmark_falls_back_to_rate() {
        let engine = RatioEngine::new(
            monthly(&MONTHLY_NAVS),
            Some(TimeSeries::default()),
            RatioConfig::default().with_risk_free_rate(0.02),
        )
        .unwrap();
        assert_eq!(engine.benchmark_source(), Some(BenchmarkSource::Synthetic));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RatioEngine>();
    }
}
