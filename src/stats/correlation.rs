use ndarray::Array2;

/// Pearson correlation over the rows where both columns have a value.
/// NaN when fewer than two such rows exist or either side has no variance.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return f64::NAN;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric correlation matrix over the given columns.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Array2<f64> {
    let k = columns.len();
    let mut matrix = Array2::<f64>::from_elem((k, k), f64::NAN);

    for i in 0..k {
        for j in i..k {
            let r = pearson_pairwise(&columns[i], &columns[j]);
            // The diagonal is exactly one wherever the column has spread.
            let r = if i == j && r.is_finite() { 1.0 } else { r };
            matrix[[i, j]] = r;
            matrix[[j, i]] = r;
        }
    }

    matrix
}
