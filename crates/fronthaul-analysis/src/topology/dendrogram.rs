//! Average-linkage (UPGMA) agglomerative clustering.
//!
//! Leaves are numbered `0..n`; the cluster created by merge `k` is
//! numbered `n + k`. Merge heights are non-decreasing.

use serde::Serialize;

use crate::stats;

/// One agglomeration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub height: f64,
    pub size: usize,
}

/// Full merge history over `n` leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dendrogram {
    leaves: usize,
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Build the dendrogram from a square distance matrix.
    ///
    /// Ties on the closest pair go to the lowest `(row, column)` position
    /// among active clusters.
    pub fn average_linkage(distances: &[Vec<f64>]) -> Self {
        let n = distances.len();
        let mut d: Vec<Vec<f64>> = distances.to_vec();
        let mut active: Vec<bool> = vec![true; n];
        let mut sizes: Vec<usize> = vec![1; n];
        let mut ids: Vec<usize> = (0..n).collect();
        let mut merges = Vec::with_capacity(n.saturating_sub(1));

        for step in 0..n.saturating_sub(1) {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in 0..n {
                if !active[i] {
                    continue;
                }
                for j in i + 1..n {
                    if !active[j] {
                        continue;
                    }
                    if best.map_or(true, |(_, _, h)| d[i][j] < h) {
                        best = Some((i, j, d[i][j]));
                    }
                }
            }
            let Some((i, j, height)) = best else { break };

            let (si, sj) = (sizes[i], sizes[j]);
            let merged = si + sj;
            merges.push(Merge {
                left: ids[i],
                right: ids[j],
                height,
                size: merged,
            });

            for k in 0..n {
                if active[k] && k != i && k != j {
                    let v = (si as f64 * d[i][k] + sj as f64 * d[j][k]) / merged as f64;
                    d[i][k] = v;
                    d[k][i] = v;
                }
            }
            active[j] = false;
            sizes[i] = merged;
            ids[i] = n + step;
        }

        Self { leaves: n, merges }
    }

    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Flat labels after applying the first `n - k` merges (`k` clamped to
    /// `[1, n]`).
    pub fn cut_clusters(&self, k: usize) -> Vec<usize> {
        let k = k.clamp(1, self.leaves.max(1));
        let take = self.leaves.saturating_sub(k);
        self.labels(|step, _| step < take)
    }

    /// Flat labels after applying every merge with height ≤ `threshold`.
    pub fn cut_distance(&self, threshold: f64) -> Vec<usize> {
        self.labels(|_, m| m.height <= threshold)
    }

    /// Union-find over the applied merges; a label is the root node id.
    fn labels(&self, applied: impl Fn(usize, &Merge) -> bool) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.leaves + self.merges.len()).collect();
        for (step, m) in self.merges.iter().enumerate() {
            if applied(step, m) {
                let node = self.leaves + step;
                let l = find(&mut parent, m.left);
                let r = find(&mut parent, m.right);
                parent[l] = node;
                parent[r] = node;
            }
        }
        (0..self.leaves).map(|leaf| find(&mut parent, leaf)).collect()
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Upper-triangle distances, row-major.
pub fn condensed(distances: &[Vec<f64>]) -> Vec<f64> {
    let n = distances.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            out.push(distances[i][j]);
        }
    }
    out
}

/// `median + 0.5 * std` of the condensed distances (population std).
/// `None` with fewer than two cells.
pub fn auto_threshold(distances: &[Vec<f64>]) -> Option<f64> {
    let c = condensed(distances);
    if c.is_empty() {
        return None;
    }
    Some(stats::median(&c) + 0.5 * stats::population_std(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cells() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.1, 0.8],
            vec![0.1, 0.0, 0.7],
            vec![0.8, 0.7, 0.0],
        ]
    }

    #[test]
    fn average_linkage_merges_closest_first() {
        let dg = Dendrogram::average_linkage(&three_cells());
        let m = dg.merges();
        assert_eq!(m.len(), 2);
        assert_eq!((m[0].left, m[0].right, m[0].size), (0, 1, 2));
        assert!((m[0].height - 0.1).abs() < 1e-12);
        assert_eq!((m[1].left, m[1].right, m[1].size), (3, 2, 3));
        assert!((m[1].height - 0.75).abs() < 1e-12);
    }

    #[test]
    fn cut_by_count() {
        let dg = Dendrogram::average_linkage(&three_cells());
        let labels = dg.cut_clusters(2);
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
        let one = dg.cut_clusters(1);
        assert!(one.iter().all(|&l| l == one[0]));
        let all = dg.cut_clusters(10);
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn cut_by_distance() {
        let dg = Dendrogram::average_linkage(&three_cells());
        let labels = dg.cut_distance(0.3);
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert_eq!(dg.cut_distance(0.05), vec![0, 1, 2]);
    }

    #[test]
    fn auto_threshold_uses_median_plus_half_std() {
        let t = auto_threshold(&three_cells()).unwrap();
        let c = [0.1, 0.8, 0.7];
        let mean = (0.1 + 0.8 + 0.7) / 3.0;
        let std = (c.iter().map(|v: &f64| (v - mean).powi(2)).sum::<f64>() / 3.0).sqrt();
        assert!((t - (0.7 + 0.5 * std)).abs() < 1e-12);
        assert!(auto_threshold(&[vec![0.0]]).is_none());
    }

    #[test]
    fn heights_are_monotone() {
        let d = vec![
            vec![0.0, 0.2, 0.5, 0.9],
            vec![0.2, 0.0, 0.4, 0.6],
            vec![0.5, 0.4, 0.0, 0.3],
            vec![0.9, 0.6, 0.3, 0.0],
        ];
        let dg = Dendrogram::average_linkage(&d);
        for w in dg.merges().windows(2) {
            assert!(w[0].height <= w[1].height);
        }
    }
}
