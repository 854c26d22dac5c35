use std::cmp::Ordering;

///
/// Average-method rank of every value divided by the number of values, so results fall in
/// `(0, 1]`. Ties share the mean of the ranks they span. NaN values are left unranked (NaN).
///
/// ```
/// use nbhd_quant::percentile_rank;
///
/// assert_eq!(percentile_rank(&[10.0, 20.0, 20.0, 5.0]), vec![0.5, 0.875, 0.875, 0.25]);
/// ```
///
pub fn percentile_rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut ranks = vec![f64::NAN; n];

    let mut order: Vec<usize> = (0..n).filter(|&i| !values[i].is_nan()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // ranks are 1-based; positions i..=j share their mean
        let shared = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = shared / n as f64;
        }
        i = j + 1;
    }

    ranks
}
