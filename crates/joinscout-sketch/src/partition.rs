//! Set-size partitioning for the containment index.
//!
//! Querying a partition uses its upper size bound as the indexed size, so
//! every smaller set in the partition is treated as larger than it is. The
//! expected number of false positives this causes for a partition covering
//! sizes `l..=u` is `sum_i count_i * (size_u - size_i) / size_u`; the
//! partitioning minimizes the sum of that cost over all partitions.

/// Prefix sums over `(sizes, counts)` so the cost of any range is O(1).
struct CostTable<'a> {
    sizes: &'a [usize],
    cum_counts: Vec<f64>,
    cum_weighted: Vec<f64>,
}

impl<'a> CostTable<'a> {
    fn new(sizes: &'a [usize], counts: &[usize]) -> Self {
        let mut cum_counts = Vec::with_capacity(sizes.len() + 1);
        let mut cum_weighted = Vec::with_capacity(sizes.len() + 1);
        cum_counts.push(0.0);
        cum_weighted.push(0.0);
        for (size, count) in sizes.iter().zip(counts) {
            let count = *count as f64;
            cum_counts.push(cum_counts[cum_counts.len() - 1] + count);
            cum_weighted.push(cum_weighted[cum_weighted.len() - 1] + count * *size as f64);
        }
        Self {
            sizes,
            cum_counts,
            cum_weighted,
        }
    }

    /// Expected false positives for the range `lower..=upper` (indices).
    fn false_positives(&self, lower: usize, upper: usize) -> f64 {
        let top = self.sizes[upper] as f64;
        let count = self.cum_counts[upper + 1] - self.cum_counts[lower];
        let weighted = self.cum_weighted[upper + 1] - self.cum_weighted[lower];
        (top * count - weighted) / top
    }
}

/// Splits ascending distinct `sizes` (with their `counts`) into at most
/// `num_part` contiguous `(lower, upper)` size ranges.
///
/// With fewer distinct sizes than partitions, each size gets its own range.
pub(crate) fn optimal_partitions(
    sizes: &[usize],
    counts: &[usize],
    num_part: usize,
) -> Vec<(usize, usize)> {
    let n = sizes.len();
    if n == 0 {
        return Vec::new();
    }
    if num_part < 2 {
        return vec![(sizes[0], sizes[n - 1])];
    }
    if num_part >= n {
        return sizes.iter().map(|&size| (size, size)).collect();
    }

    let costs = CostTable::new(sizes, counts);

    // best[p][u]: minimal cost of splitting sizes[0..=u] into p + 1 ranges.
    // split[p][u]: last index of the p-th range in that optimum.
    let mut best = vec![vec![f64::INFINITY; n]; num_part];
    let mut split = vec![vec![0usize; n]; num_part];
    for u in 0..n {
        best[0][u] = costs.false_positives(0, u);
    }
    for p in 1..num_part {
        for u in p..n {
            for j in (p - 1)..u {
                let cost = best[p - 1][j] + costs.false_positives(j + 1, u);
                if cost < best[p][u] {
                    best[p][u] = cost;
                    split[p][u] = j;
                }
            }
        }
    }

    let mut partitions = Vec::with_capacity(num_part);
    let mut upper = n - 1;
    for p in (1..num_part).rev() {
        let j = split[p][upper];
        partitions.push((sizes[j + 1], sizes[upper]));
        upper = j;
    }
    partitions.push((sizes[0], sizes[upper]));
    partitions.reverse();
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covers_all(partitions: &[(usize, usize)], sizes: &[usize]) -> bool {
        sizes.iter().all(|size| {
            partitions
                .iter()
                .filter(|(lower, upper)| lower <= size && size <= upper)
                .count()
                == 1
        })
    }

    #[test]
    fn one_partition_spans_everything() {
        assert_eq!(optimal_partitions(&[1, 5, 9], &[1, 1, 1], 1), vec![(1, 9)]);
    }

    #[test]
    fn few_sizes_get_their_own_partition() {
        assert_eq!(
            optimal_partitions(&[3, 7], &[4, 1], 16),
            vec![(3, 3), (7, 7)]
        );
        assert!(optimal_partitions(&[], &[], 4).is_empty());
    }

    #[test]
    fn splits_at_the_large_gap() {
        let sizes = [1, 2, 3, 100, 101, 102];
        let counts = [10, 10, 10, 10, 10, 10];
        let partitions = optimal_partitions(&sizes, &counts, 2);
        assert_eq!(partitions, vec![(1, 3), (100, 102)]);
    }

    #[test]
    fn partitions_are_contiguous_and_complete() {
        let sizes: Vec<usize> = (1..=40).map(|i| i * i).collect();
        let counts: Vec<usize> = (1..=40).map(|i| 41 - i).collect();
        let partitions = optimal_partitions(&sizes, &counts, 6);
        assert_eq!(partitions.len(), 6);
        assert!(covers_all(&partitions, &sizes));
        assert!(partitions.windows(2).all(|w| w[0].1 < w[1].0));
    }
}
