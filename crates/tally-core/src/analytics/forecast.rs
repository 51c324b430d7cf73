//! One-step-ahead forecasting
//!
//! The series is smoothed with a 3-point moving average, fitted with
//! ordinary least squares over `x = 1..=n`, and extrapolated to `x = n + 1`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Forecast for the period after the last observed one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Last value of the smoothed series
    pub last_value: f64,
    /// Projected value for the next period, rounded to a whole number
    pub predicted_next: f64,
    /// Percentage change from `last_value` to `predicted_next`; 0 when
    /// `last_value` is 0
    pub growth_rate_percent: f64,
}

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// 3-point moving average.
///
/// Interior points become the mean of themselves and both neighbours. The
/// two boundary points stand in for their own missing neighbour and are kept
/// as observed, so a linear (or constant) series passes through unchanged.
pub fn smooth(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    (0..n)
        .map(|i| {
            if i == 0 || i + 1 == n {
                series[i]
            } else {
                (series[i - 1] + series[i] + series[i + 1]) / 3.0
            }
        })
        .collect()
}

/// Least-squares line through `(1, y1), (2, y2), ...`.
///
/// Returns `None` when the regression denominator is zero (fewer than two
/// points), where no slope is defined.
pub fn linear_fit(series: &[f64]) -> Option<LinearFit> {
    let n = series.len() as f64;
    let (sum_x, sum_y, sum_xx, sum_xy) = series.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxx, sxy), (i, &y)| {
            let x = (i + 1) as f64;
            (sx + x, sy + y, sxx + x * x, sxy + x * y)
        },
    );

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LinearFit { slope, intercept })
}

/// Forecast the value following `series`.
///
/// Fails with [`Error::InsufficientData`] on an empty series. A single point
/// forecasts itself with zero growth.
pub fn forecast(series: &[f64]) -> Result<ForecastResult> {
    if series.is_empty() {
        return Err(Error::InsufficientData(
            "forecast needs at least one data point".to_string(),
        ));
    }

    let smoothed = smooth(series);
    let last_value = smoothed[smoothed.len() - 1];

    let predicted_next = match linear_fit(&smoothed) {
        Some(fit) => fit.at((smoothed.len() + 1) as f64).round(),
        None => last_value,
    };

    let growth_rate_percent = if last_value != 0.0 {
        (predicted_next - last_value) / last_value * 100.0
    } else {
        0.0
    };

    tracing::trace!(
        points = series.len(),
        last_value,
        predicted_next,
        growth_rate_percent,
        "Forecast computed"
    );

    Ok(ForecastResult {
        last_value,
        predicted_next,
        growth_rate_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_smooth_constant_is_unchanged() {
        let series = vec![7.0; 6];
        assert_eq!(smooth(&series), series);
    }

    #[test]
    fn test_smooth_linear_is_unchanged() {
        let series = vec![10.0, 12.0, 14.0, 16.0, 18.0];
        assert_eq!(smooth(&series), series);
    }

    #[test]
    fn test_smooth_damps_spike() {
        let smoothed = smooth(&[3.0, 3.0, 30.0, 3.0, 3.0]);
        assert_eq!(smoothed[0], 3.0);
        assert!(approx(smoothed[1], 12.0));
        assert!(approx(smoothed[2], 12.0));
        assert!(approx(smoothed[3], 12.0));
        assert_eq!(smoothed[4], 3.0);
    }

    #[test]
    fn test_smooth_short_series() {
        assert!(smooth(&[]).is_empty());
        assert_eq!(smooth(&[4.0]), vec![4.0]);
        assert_eq!(smooth(&[4.0, 8.0]), vec![4.0, 8.0]);
    }

    #[test]
    fn test_linear_fit() {
        let fit = linear_fit(&[3.0, 5.0, 7.0]).unwrap();
        assert!(approx(fit.slope, 2.0));
        assert!(approx(fit.intercept, 1.0));
        assert!(linear_fit(&[9.0]).is_none());
    }

    #[test]
    fn test_forecast_linear_series() {
        let result = forecast(&[10.0, 12.0, 14.0, 16.0, 18.0]).unwrap();
        assert_eq!(result.predicted_next, 20.0);
        assert_eq!(result.last_value, 18.0);
        assert!((result.growth_rate_percent - 11.11).abs() < 0.01);
    }

    #[test]
    fn test_forecast_single_point() {
        let result = forecast(&[5.0]).unwrap();
        assert_eq!(result.predicted_next, 5.0);
        assert_eq!(result.growth_rate_percent, 0.0);
    }

    #[test]
    fn test_forecast_empty_fails() {
        assert!(matches!(forecast(&[]), Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_forecast_zero_last_value_has_zero_growth() {
        let result = forecast(&[6.0, 4.0, 2.0, 0.0]).unwrap();
        assert_eq!(result.last_value, 0.0);
        assert_eq!(result.growth_rate_percent, 0.0);
        assert!(result.growth_rate_percent.is_finite());
    }

    #[test]
    fn test_forecast_all_zero() {
        let result = forecast(&[0.0; 7]).unwrap();
        assert_eq!(result.predicted_next, 0.0);
        assert_eq!(result.growth_rate_percent, 0.0);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let series = [4.0, 9.0, 2.0, 11.0, 6.0, 8.0];
        assert_eq!(forecast(&series).unwrap(), forecast(&series).unwrap());
    }

    #[test]
    fn test_forecast_declining_series() {
        let result = forecast(&[20.0, 18.0, 16.0, 14.0]).unwrap();
        assert_eq!(result.predicted_next, 12.0);
        assert!((result.growth_rate_percent - (-14.2857)).abs() < 0.001);
    }
}
