//! ARIMA(1,1,1) fallback strategy.
//!
//! Conditional least squares via Hannan-Rissanen: a long autoregression
//! proxies the innovations, then the ARMA(1,1) coefficients come from an
//! OLS of the differenced series on its own lag and the lagged innovation.
//! No stationarity or invertibility constraint is enforced on the
//! coefficients. Intervals use the integrated process's accumulated
//! psi-weights at 80% coverage.
//!
//! The method name stays "seasonal_arima" on the wire even though the
//! seasonal order is (0,0,0,0), matching the snapshot vocabulary consumers
//! already parse.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ForecastMethod, PriceBar};

use super::{FitError, ForecastStrategy, PricePrediction, Z_80};

/// Order of the long autoregression used to proxy innovations.
const LONG_AR_ORDER: usize = 10;

#[derive(Debug, Clone)]
pub struct SeasonalArima {
    confidence: f64,
}

impl SeasonalArima {
    pub fn new(confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence <= 1.0,
            "confidence must be in (0, 1]"
        );
        Self { confidence }
    }
}

impl Default for SeasonalArima {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl ForecastStrategy for SeasonalArima {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::SeasonalArima
    }

    fn min_bars(&self) -> usize {
        60
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn fit_predict(
        &self,
        bars: &[PriceBar],
        horizon: usize,
    ) -> Result<Vec<PricePrediction>, FitError> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        if closes.iter().any(|c| !c.is_finite()) {
            return Err(FitError::Degenerate("non-finite close in series".into()));
        }

        // d = 1: work on first differences.
        let w: Vec<f64> = closes.windows(2).map(|p| p[1] - p[0]).collect();
        let m = w.len();

        // Stage 1: long AR to estimate innovations.
        let innovations = long_ar_residuals(&w, LONG_AR_ORDER)?;

        // Stage 2: OLS of w[t] on [1, w[t-1], e[t-1]].
        let start = LONG_AR_ORDER + 1;
        let rows = m - start;
        let x = DMatrix::from_fn(rows, 3, |i, j| {
            let t = start + i;
            match j {
                0 => 1.0,
                1 => w[t - 1],
                _ => innovations[t - 1],
            }
        });
        let y = DVector::from_fn(rows, |i, _| w[start + i]);
        let beta = ols(&x, &y)?;
        let (c, phi, theta) = (beta[0], beta[1], beta[2]);
        if !phi.is_finite() || !theta.is_finite() {
            return Err(FitError::NonConvergence("non-finite ARMA coefficients".into()));
        }

        // Residual variance of the stage-2 fit.
        let fitted = &x * &beta;
        let resid = &y - fitted;
        let sigma2 = resid.norm_squared() / rows as f64;

        // Recursive point forecast: future innovations have expectation 0.
        let last_close = closes[closes.len() - 1];
        let mut w_prev = w[m - 1];
        let mut e_prev = resid[rows - 1];
        let mut level = last_close;
        let mut steps = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let w_hat = c + phi * w_prev + theta * e_prev;
            level += w_hat;
            steps.push(level);
            w_prev = w_hat;
            e_prev = 0.0;
        }

        // Interval: psi-weights of ARMA(1,1) are psi_0 = 1,
        // psi_j = (phi + theta) * phi^(j-1); the integrated (d = 1)
        // forecast accumulates them, so var(k) = sigma^2 * sum of the
        // squared cumulative weights.
        let mut cum_psi = 1.0;
        let mut var = 0.0;
        let mut predictions = Vec::with_capacity(horizon);
        for (k, &level) in steps.iter().enumerate() {
            var += cum_psi * cum_psi;
            let se = (sigma2 * var).sqrt();
            if !se.is_finite() || !level.is_finite() {
                return Err(FitError::NonConvergence("forecast diverged".into()));
            }
            predictions.push(PricePrediction::ordered(
                level,
                level - Z_80 * se,
                level + Z_80 * se,
            ));
            cum_psi += (phi + theta) * phi.powi(k as i32);
        }

        Ok(predictions)
    }
}

/// Residuals of an OLS long autoregression, aligned with the input (the
/// first `order` positions carry zero — no estimate exists there).
fn long_ar_residuals(w: &[f64], order: usize) -> Result<Vec<f64>, FitError> {
    let m = w.len();
    if m < order + 2 {
        return Err(FitError::Degenerate(format!(
            "differenced series too short for AR({order})"
        )));
    }
    let rows = m - order;
    let x = DMatrix::from_fn(rows, order + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            w[order + i - j]
        }
    });
    let y = DVector::from_fn(rows, |i, _| w[order + i]);
    let beta = ols(&x, &y)?;

    let fitted = &x * &beta;
    let mut residuals = vec![0.0; m];
    for i in 0..rows {
        residuals[order + i] = y[i] - fitted[i];
    }
    Ok(residuals)
}

/// OLS via normal equations: beta = (XᵀX)⁻¹ Xᵀy.
fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, FitError> {
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;
    let inv = xtx
        .try_inverse()
        .ok_or_else(|| FitError::Singular("normal equations not invertible".into()))?;
    Ok(inv * xty)
}
