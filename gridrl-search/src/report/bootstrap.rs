use rand::{rngs::SmallRng, Rng};

/// Bootstrap confidence interval of a mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,

    /// Sample mean.
    pub mean: f64,

    /// Upper bound.
    pub upper: f64,
}

fn mean(samples: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = samples.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Percentile bootstrap interval of the mean of `samples`.
///
/// Draws `resamples` resamples with replacement and takes the
/// `(1 - confidence) / 2` and `(1 + confidence) / 2` quantiles of their means.
/// An empty input yields NaN bounds.
pub fn bootstrap(samples: &[f64], resamples: usize, confidence: f64, rng: &mut SmallRng) -> ConfidenceInterval {
    let center = mean(samples.iter().copied());
    if samples.is_empty() || resamples == 0 {
        return ConfidenceInterval {
            lower: center,
            mean: center,
            upper: center,
        };
    }

    let n = samples.len();
    let mut means: Vec<f64> = (0..resamples)
        .map(|_| mean((0..n).map(|_| samples[rng.gen_range(0..n)])))
        .collect();
    means.sort_by(f64::total_cmp);

    let alpha = (1.0 - confidence.clamp(0.0, 1.0)) / 2.0;
    let at = |q: f64| means[((resamples - 1) as f64 * q).round() as usize];
    ConfidenceInterval {
        lower: at(alpha),
        mean: center,
        upper: at(1.0 - alpha),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn interval_brackets_the_mean() {
        let mut rng = SmallRng::seed_from_u64(0);
        let samples = [1.0, 2.0, 3.0, 4.0, 10.0];
        let ci = bootstrap(&samples, 500, 0.9, &mut rng);
        assert_eq!(ci.mean, 4.0);
        assert!(ci.lower <= ci.mean && ci.mean <= ci.upper);
        assert!(ci.lower >= 1.0 && ci.upper <= 10.0);
    }

    #[test]
    fn constant_samples_have_no_spread() {
        let mut rng = SmallRng::seed_from_u64(1);
        let ci = bootstrap(&[2.5; 4], 100, 0.95, &mut rng);
        assert_eq!((ci.lower, ci.mean, ci.upper), (2.5, 2.5, 2.5));
    }

    #[test]
    fn empty_samples_are_nan() {
        let mut rng = SmallRng::seed_from_u64(2);
        let ci = bootstrap(&[], 100, 0.95, &mut rng);
        assert!(ci.mean.is_nan() && ci.lower.is_nan() && ci.upper.is_nan());
    }
}
