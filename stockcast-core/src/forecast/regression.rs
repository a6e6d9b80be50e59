//! Feature-regression strategy — the strongest cascade stage.
//!
//! Ridge regression over the standardized feature matrix, with the
//! regularization strength chosen by leave-one-out generalized cross
//! validation over a log-spaced alpha grid (SVD form). Multi-step
//! forecasts feed each prediction back through the rolling feature window,
//! so step k's feature vector depends on the synthetic closes from steps
//! 1..k-1. Bounds are predicted ± 1.2816 σ, the 80% two-sided normal
//! interval around the in-sample residual deviation.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ForecastMethod, PriceBar};
use crate::features::{FeatureMatrix, RollingWindow, FEATURE_COUNT};

use super::{FitError, ForecastStrategy, PricePrediction, Z_80};

#[derive(Debug, Clone)]
pub struct FeatureRegression {
    alphas: Vec<f64>,
    confidence: f64,
}

impl FeatureRegression {
    pub fn new(alphas: Vec<f64>, confidence: f64) -> Self {
        assert!(!alphas.is_empty(), "alpha grid must be non-empty");
        assert!(
            confidence > 0.0 && confidence <= 1.0,
            "confidence must be in (0, 1]"
        );
        Self { alphas, confidence }
    }

    /// 20-point log grid over [1e-3, 1e3].
    pub fn default_alpha_grid() -> Vec<f64> {
        (0..20)
            .map(|i| 10f64.powf(-3.0 + 6.0 * i as f64 / 19.0))
            .collect()
    }
}

impl Default for FeatureRegression {
    fn default() -> Self {
        Self::new(Self::default_alpha_grid(), 0.8)
    }
}

impl ForecastStrategy for FeatureRegression {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::FeatureRegression
    }

    fn min_bars(&self) -> usize {
        80
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn fit_predict(
        &self,
        bars: &[PriceBar],
        horizon: usize,
    ) -> Result<Vec<PricePrediction>, FitError> {
        let matrix = FeatureMatrix::build(bars);
        let pairs = matrix.training_pairs();
        let n = pairs.len();
        if n < FEATURE_COUNT + 2 {
            return Err(FitError::Degenerate(format!(
                "only {n} training rows after feature alignment"
            )));
        }

        // Standardize features with in-sample stats; center the target.
        let mut col_mean = [0.0; FEATURE_COUNT];
        let mut col_std = [0.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            let mean = pairs.iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64;
            let var = pairs
                .iter()
                .map(|(x, _)| (x[j] - mean) * (x[j] - mean))
                .sum::<f64>()
                / n as f64;
            col_mean[j] = mean;
            // A constant column standardizes to all-zero; divisor 1 keeps
            // the arithmetic finite.
            col_std[j] = if var > 0.0 { var.sqrt() } else { 1.0 };
        }
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

        let xs = DMatrix::from_fn(n, FEATURE_COUNT, |i, j| {
            (pairs[i].0[j] - col_mean[j]) / col_std[j]
        });
        let yc = DVector::from_fn(n, |i, _| pairs[i].1 - y_mean);

        let fit = RidgeFit::solve(&xs, &yc, &self.alphas)?;
        if !fit.sigma.is_finite() {
            return Err(FitError::Degenerate("non-finite residual deviation".into()));
        }

        // Seed the rolling window from the trailing closes and the last
        // feature row, then walk the horizon feeding predictions back in.
        let last_row = matrix
            .rows
            .last()
            .ok_or_else(|| FitError::Degenerate("empty feature matrix".into()))?;
        let closes: Vec<f64> = bars[bars.len() - 10..].iter().map(|b| b.close).collect();
        let mut window = RollingWindow::new(closes, last_row.ema12, last_row.ema26, last_row.vol_z);

        let mut predictions = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let x = window.features();
            let mut yhat = y_mean;
            for j in 0..FEATURE_COUNT {
                yhat += fit.beta[j] * (x[j] - col_mean[j]) / col_std[j];
            }
            if !yhat.is_finite() {
                return Err(FitError::Degenerate("non-finite prediction".into()));
            }
            predictions.push(PricePrediction::ordered(
                yhat,
                yhat - Z_80 * fit.sigma,
                yhat + Z_80 * fit.sigma,
            ));
            window.push(yhat);
        }

        Ok(predictions)
    }
}

/// Ridge solution at the GCV-selected alpha.
struct RidgeFit {
    beta: Vec<f64>,
    sigma: f64,
}

impl RidgeFit {
    /// Solve via SVD: for X = UΣVᵀ, β(α) = V diag(σᵢ/(σᵢ²+α)) Uᵀy, with
    /// GCV(α) = n·RSS(α) / (n − df(α))², df(α) = Σ σᵢ²/(σᵢ²+α).
    fn solve(xs: &DMatrix<f64>, yc: &DVector<f64>, alphas: &[f64]) -> Result<Self, FitError> {
        let n = xs.nrows();
        let svd = xs
            .clone()
            .try_svd(true, true, f64::EPSILON.sqrt(), 0)
            .ok_or_else(|| FitError::Singular("SVD did not converge".into()))?;
        let u = svd
            .u
            .as_ref()
            .ok_or_else(|| FitError::Singular("SVD produced no U factor".into()))?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| FitError::Singular("SVD produced no V factor".into()))?;
        let sv = &svd.singular_values;

        let d = u.transpose() * yc;

        let mut best: Option<(f64, f64)> = None; // (gcv, alpha)
        for &alpha in alphas {
            let mut df = 0.0;
            let mut shrunk = DVector::zeros(d.len());
            for i in 0..sv.len() {
                let s2 = sv[i] * sv[i];
                let shrink = s2 / (s2 + alpha);
                df += shrink;
                shrunk[i] = shrink * d[i];
            }
            let fitted = u * &shrunk;
            let rss = (yc - fitted).norm_squared();
            let denom = (n as f64 - df).max(1.0);
            let gcv = n as f64 * rss / (denom * denom);
            if best.map_or(true, |(g, _)| gcv < g) {
                best = Some((gcv, alpha));
            }
        }
        let (_, alpha) = best.ok_or_else(|| FitError::Singular("empty alpha grid".into()))?;

        let mut rotated = DVector::zeros(sv.len());
        for i in 0..sv.len() {
            rotated[i] = sv[i] * d[i] / (sv[i] * sv[i] + alpha);
        }
        let beta_vec = v_t.transpose() * rotated;
        let beta: Vec<f64> = beta_vec.iter().copied().collect();

        // In-sample residual deviation at the chosen alpha.
        let fitted = xs * &beta_vec;
        let rss = (yc - fitted).norm_squared();
        let sigma = (rss / n as f64).sqrt();

        Ok(Self { beta, sigma })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn trending_bars(n: usize) -> Vec<crate::domain::PriceBar> {
        let closes: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                let hash = (i as u64).wrapping_mul(2654435761) % 997;
                let noise = hash as f64 / 997.0 - 0.5;
                100.0 + t * 0.4 + (t * 0.3).sin() * 3.0 + noise * 1.5
            })
            .collect();
        make_bars(&closes)
    }

    #[test]
    fn produces_horizon_points_with_ordered_bounds() {
        let bars = trending_bars(120);
        let preds = FeatureRegression::default().fit_predict(&bars, 5).unwrap();
        assert_eq!(preds.len(), 5);
        for p in &preds {
            assert!(p.predicted.is_finite());
            assert!(p.lower <= p.predicted && p.predicted <= p.upper);
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let bars = trending_bars(100);
        let strategy = FeatureRegression::default();
        let a = strategy.fit_predict(&bars, 5).unwrap();
        let b = strategy.fit_predict(&bars, 5).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.predicted, y.predicted);
            assert_eq!(x.lower, y.lower);
            assert_eq!(x.upper, y.upper);
        }
    }

    #[test]
    fn predictions_stay_near_recent_prices() {
        // The model regresses next-day close on smooth features; on a
        // well-behaved series its 5-day path should stay within a loose
        // band of the last close.
        let bars = trending_bars(150);
        let last_close = bars.last().unwrap().close;
        let preds = FeatureRegression::default().fit_predict(&bars, 5).unwrap();
        for p in &preds {
            assert!(
                (p.predicted - last_close).abs() < last_close * 0.5,
                "prediction {} wandered from last close {last_close}",
                p.predicted
            );
        }
    }

    #[test]
    fn successive_steps_differ_on_trending_data() {
        // The recursive feature update must actually move the forecast:
        // identical points for every step would mean the feedback loop is
        // disconnected.
        let bars = trending_bars(120);
        let preds = FeatureRegression::default().fit_predict(&bars, 5).unwrap();
        let first = preds[0].predicted;
        assert!(preds.iter().skip(1).any(|p| p.predicted != first));
    }

    #[test]
    fn alpha_grid_spans_expected_range() {
        let grid = FeatureRegression::default_alpha_grid();
        assert_eq!(grid.len(), 20);
        assert!((grid[0] - 1e-3).abs() < 1e-12);
        assert!((grid[19] - 1e3).abs() < 1e-9);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }
}
