use crate::domain::entities::series::DailySeries;

/// Exponentially weighted standard deviation of a daily series.
///
/// The estimator runs directly on price levels, not returns, for parity
/// with the existing production calculation. "Volatility of the price
/// level" rather than "volatility of returns" may be a latent semantics
/// issue upstream; it is preserved here rather than silently corrected.
///
/// Weights follow the adjust-for-bias convention: an observation of age `k`
/// carries weight `(1 - alpha)^k` with `alpha = 2 / (span + 1)`, and the
/// weight sums are renormalized at every step to account for finite history.
/// The variance uses the standard reliability correction
/// `W^2 / (W^2 - W2)` where `W` is the weight sum and `W2` the sum of
/// squared weights.
#[derive(Debug, Clone)]
pub struct EwVolatility {
    pub span: usize,
    pub min_periods: usize,
}

impl EwVolatility {
    pub fn new(span: usize, min_periods: usize) -> Self {
        EwVolatility { span, min_periods }
    }

    /// Compute the EW standard deviation at every day of the input index.
    ///
    /// An observation's weight depends on its calendar age, so a missing day
    /// adds nothing to the weighted sums but still ages every earlier
    /// observation by one decay step; on such days the output repeats the
    /// current estimate. Output is `None` until `min_periods` non-missing
    /// values have accumulated, and non-negative from then on. Never fails:
    /// empty and all-missing inputs produce all-`None` output on the same
    /// index.
    pub fn estimate(&self, prices: &DailySeries) -> DailySeries {
        let alpha = 2.0 / (self.span as f64 + 1.0);
        let decay = 1.0 - alpha;

        let mut w_sum = 0.0_f64; // sum of weights
        let mut w2_sum = 0.0_f64; // sum of squared weights
        let mut wx_sum = 0.0_f64; // weighted sum of values
        let mut wx2_sum = 0.0_f64; // weighted sum of squared values
        let mut valid = 0_usize;

        let values = prices
            .values()
            .iter()
            .map(|entry| {
                w_sum *= decay;
                w2_sum *= decay * decay;
                wx_sum *= decay;
                wx2_sum *= decay;
                if let Some(x) = entry {
                    w_sum += 1.0;
                    w2_sum += 1.0;
                    wx_sum += x;
                    wx2_sum += x * x;
                    valid += 1;
                }
                if valid < self.min_periods {
                    return None;
                }
                let denom = w_sum * w_sum - w2_sum;
                if denom <= 0.0 {
                    return None;
                }
                let mean = wx_sum / w_sum;
                // Floating-point cancellation can push the biased variance
                // fractionally below zero on near-constant series.
                let biased_var = (wx2_sum / w_sum - mean * mean).max(0.0);
                let var = biased_var * w_sum * w_sum / denom;
                Some(var.sqrt())
            })
            .collect();

        DailySeries::new(prices.first_day(), values)
    }
}
