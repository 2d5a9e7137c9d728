//! Weighted random choice as a pure function of `(weights, draw)`.

/// Pick an index from `weights` using a uniform `draw` in `[0, 1)`.
///
/// The draw is scaled by the total weight and the result is the first index
/// whose cumulative upper bound exceeds it, so equal weights resolve in input
/// order.  Zero, negative and non-finite weights are never chosen.  A draw
/// that lands past the last bound through rounding selects the last positive
/// weight.
///
/// Returns `None` if no weight is positive.
///
/// ```
/// use cf_transition::weighted_choice;
///
/// let row = [0.25, 0.0, 0.75];
/// assert_eq!(weighted_choice(&row, 0.0),  Some(0));
/// assert_eq!(weighted_choice(&row, 0.25), Some(2)); // bound of 0 is exclusive
/// assert_eq!(weighted_choice(&row, 0.99), Some(2));
/// assert_eq!(weighted_choice(&[0.0, 0.0], 0.5), None);
/// ```
pub fn weighted_choice(weights: &[f64], draw: f64) -> Option<usize> {
    let usable = |w: f64| w.is_finite() && w > 0.0;

    let total: f64 = weights.iter().copied().filter(|&w| usable(w)).sum();
    if total <= 0.0 {
        return None;
    }

    let target = draw.clamp(0.0, 1.0) * total;
    let mut upper = 0.0;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !usable(w) {
            continue;
        }
        upper += w;
        last = Some(i);
        if target < upper {
            return Some(i);
        }
    }
    last
}
