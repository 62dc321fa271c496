pub const PLOT_PADDING_RATIO: f64 = 0.05;
pub const PLAYBACK_MARGIN_M: f64 = 0.25;

/// Smallest axis span used when a series is flat.
const MIN_SPAN: f64 = 1e-3;

/// Min and max of the finite values, or `None` if there are none.
pub fn finite_bounds<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Axis range around `[min, max]` with proportional padding on both ends.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let span = (max - min).max(MIN_SPAN);
    let pad = span * PLOT_PADDING_RATIO;
    let center = 0.5 * (min + max);
    let half = 0.5 * span + pad;
    (center - half, center + half)
}

pub fn series_range<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = finite_bounds(values).unwrap_or((0.0, 1.0));
    padded_range(lo, hi)
}

/// World extent shown by playback: farthest landing x and highest point, plus a margin.
pub fn playback_extent(raw_max_x: f64, raw_max_y: f64) -> (f64, f64) {
    let x = if raw_max_x.is_finite() { raw_max_x } else { 0.0 };
    let y = if raw_max_y.is_finite() { raw_max_y } else { 0.0 };
    (
        (x + PLAYBACK_MARGIN_M).max(PLAYBACK_MARGIN_M),
        (y + PLAYBACK_MARGIN_M).max(PLAYBACK_MARGIN_M),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    #[test]
    fn bounds_skip_non_finite_values() {
        let bounds = finite_bounds([3.0, f64::NAN, -1.0, f64::INFINITY, 2.0]);
        assert_eq!(bounds, Some((-1.0, 3.0)));
        assert_eq!(finite_bounds(Vec::<f64>::new()), None);
    }

    #[test]
    fn padding_is_proportional_to_span() {
        let (lo, hi) = padded_range(0.0, 10.0);
        assert_close(lo, -0.5, 1e-12);
        assert_close(hi, 10.5, 1e-12);
    }

    #[test]
    fn flat_series_still_gets_a_usable_range() {
        let (lo, hi) = series_range([4.0, 4.0, 4.0]);
        assert!(hi > lo);
        assert!(lo < 4.0 && hi > 4.0);
    }

    #[test]
    fn playback_extent_adds_margin() {
        let (x, y) = playback_extent(12.0, 3.5);
        assert_close(x, 12.25, 1e-12);
        assert_close(y, 3.75, 1e-12);

        let (x, _) = playback_extent(f64::NAN, 1.0);
        assert_close(x, PLAYBACK_MARGIN_M, 0.0);
    }
}
