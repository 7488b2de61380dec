use serde::Serialize;
use tracing::{debug, info, trace};

use super::haversine::haversine_km;
use crate::domain::types::Branch;

/// Square haversine distance matrix in kilometers, indexed by branch position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Builds the matrix for branches in the given order.
    ///
    /// Each pair is computed once and mirrored, so the result is exactly symmetric
    /// with a zero diagonal.
    pub fn from_branches(branches: &[Branch]) -> Self {
        let coords: Vec<(f64, f64)> = branches.iter().map(Branch::coords).collect();
        let dm = Self::from_coords(&coords);
        info!("Created {}x{} distance matrix", dm.size(), dm.size());
        dm
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        let n = coords.len();
        let mut rows = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let km = haversine_km(coords[i], coords[j]);
                rows[i][j] = km;
                rows[j][i] = km;
            }
        }

        Self { rows }
    }

    /// Wraps an explicit matrix. Returns `None` unless every row has `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return None;
        }
        Some(Self { rows })
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| ((i + 1)..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|d| d.is_finite())
    }

    /// Sum of legs along `order`; `closed` adds the leg from the last index back to the first.
    pub fn tour_length(&self, order: &[usize], closed: bool) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        let open: f64 = order.windows(2).map(|w| self.get(w[0], w[1])).sum();
        if closed {
            open + self.get(order[order.len() - 1], order[0])
        } else {
            open
        }
    }

    pub fn log_rows(&self) {
        debug!("Distance matrix:");
        for row in &self.rows {
            trace!("{:?}", row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Branch> {
        vec![
            Branch::new(1, "Gulshan", 23.8103, 90.4125),
            Branch::new(2, "Motijheel", 23.7925, 90.4078),
            Branch::new(3, "Mohammadpur", 23.8041, 90.3643),
            Branch::new(4, "Uttara", 23.8759, 90.3795),
        ]
    }

    #[test]
    fn test_symmetric_with_zero_diagonal() {
        let dm = DistanceMatrix::from_branches(&sample());
        assert_eq!(dm.size(), 4);
        assert!(dm.is_symmetric(0.0));
        for i in 0..dm.size() {
            assert_eq!(dm.get(i, i), 0.0);
            for j in 0..dm.size() {
                assert!(dm.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        assert_eq!(DistanceMatrix::from_branches(&[]).size(), 0);

        let single = DistanceMatrix::from_branches(&sample()[..1]);
        assert_eq!(single.size(), 1);
        assert_eq!(single.get(0, 0), 0.0);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let branches = sample();
        assert_eq!(
            DistanceMatrix::from_branches(&branches),
            DistanceMatrix::from_branches(&branches)
        );
    }

    #[test]
    fn test_tour_length() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .unwrap();
        assert_eq!(dm.tour_length(&[0, 1, 2], false), 4.0);
        assert_eq!(dm.tour_length(&[0, 1, 2], true), 6.0);
        assert_eq!(dm.tour_length(&[2], true), 0.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_none());
    }
}
