//! Spectral ordering of a connected graph.
//!
//! Vertices are sorted by their entry in the Fiedler vector, the eigenvector
//! of the second-smallest eigenvalue of the graph Laplacian `L = D - A`.
//! Strongly connected vertices get nearby entries, which is what keeps line
//! crossings low in the two-column diagram.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Smallest component the eigen solve is attempted on. Below this every
/// ordering is equivalent, so discovery order is returned.
pub const MIN_SPECTRAL_SIZE: usize = 3;

const MAX_SWEEPS: usize = 100;
const OFF_DIAGONAL_TOL: f64 = 1e-20;
/// Fiedler entries closer than this are treated as ties.
const TIE_SCALE: f64 = 1e9;

/// Orders the vertices of one connected component.
///
/// `component` lists the vertices in discovery order; ties in the Fiedler
/// vector keep that order.
pub fn spectral_ordering<N, E>(graph: &UnGraph<N, E>, component: &[NodeIndex]) -> Vec<NodeIndex> {
    let size = component.len();
    if size < MIN_SPECTRAL_SIZE {
        return component.to_vec();
    }

    let laplacian = laplacian_matrix(graph, component);
    let (values, vectors) = symmetric_eigen(laplacian);
    let mut by_value: Vec<usize> = (0..size).collect();
    by_value.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    let fiedler_col = by_value[1];
    let mut fiedler: Vec<f64> = (0..size).map(|row| vectors[row][fiedler_col]).collect();
    normalize_sign(&mut fiedler);

    let mut order: Vec<(i64, usize)> = fiedler
        .iter()
        .enumerate()
        .map(|(idx, value)| ((value * TIE_SCALE).round() as i64, idx))
        .collect();
    order.sort();
    tracing::trace!(size, lambda2 = values[fiedler_col], "spectral ordering");
    order.into_iter().map(|(_, idx)| component[idx]).collect()
}

pub(crate) fn laplacian_matrix<N, E>(
    graph: &UnGraph<N, E>,
    component: &[NodeIndex],
) -> Vec<Vec<f64>> {
    let size = component.len();
    let position: HashMap<NodeIndex, usize> = component
        .iter()
        .enumerate()
        .map(|(idx, ix)| (*ix, idx))
        .collect();
    let mut matrix = vec![vec![0.0; size]; size];
    for (row, ix) in component.iter().enumerate() {
        for neighbor in graph.neighbors(*ix) {
            let Some(col) = position.get(&neighbor).copied() else {
                continue;
            };
            if col == row {
                continue;
            }
            matrix[row][col] -= 1.0;
            matrix[row][row] += 1.0;
        }
    }
    matrix
}

/// Cyclic Jacobi eigen solver for a dense symmetric matrix.
///
/// Returns the eigenvalues and a matrix whose column `k` is the unit
/// eigenvector of eigenvalue `k`.
pub(crate) fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v = vec![vec![0.0; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[p][q] * a[p][q];
            }
        }
        if off < OFF_DIAGONAL_TOL {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p][q];
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
                for row in v.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}

/// Eigenvectors are only defined up to sign; pin the first significant
/// entry to be positive so repeated runs agree.
fn normalize_sign(vector: &mut [f64]) {
    let pivot = vector.iter().copied().find(|value| value.abs() > 1e-9);
    if pivot.is_some_and(|value| value < 0.0) {
        for value in vector.iter_mut() {
            *value = -*value;
        }
    }
}
