use alloc::vec::Vec;

/// Groups values according to their paired keys.
///
/// Each `(key, value)` pair in `pairs` contributes `value` to the group
/// associated with `key`. The returned groups are ordered by ascending key
/// and no group is ever empty. For example, the pairs
/// `[(0, 1), (1, 2), (1, 3), (0, 4), (2, 5)]` produce
/// `[[1, 4], [2, 3], [5]]`.
///
/// Empty input produces zero groups.
///
/// # Note
/// We currently use a stable sort, so values within a group retain their
/// relative input order. Callers shouldn't rely on this.
pub fn group_by<K: Ord + Copy, V: Copy>(pairs: &[(K, V)]) -> Vec<Vec<V>> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|pair| pair.0);

    let mut groups: Vec<Vec<V>> = Vec::new();
    let mut current_key: Option<K> = None;
    for (key, value) in sorted {
        if current_key != Some(key) {
            groups.push(Vec::new());
            current_key = Some(key);
        }
        // groups can't be empty here, we just pushed if the key changed
        if let Some(group) = groups.last_mut() {
            group.push(value);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn group_by_simple() {
        let pairs = [(0_usize, 1_usize), (1, 2), (1, 3), (0, 4), (2, 5)];
        let groups = group_by(&pairs);
        assert_eq!(groups, vec![vec![1, 4], vec![2, 3], vec![5]]);
    }

    #[test]
    fn group_by_empty() {
        let pairs: [(usize, usize); 0] = [];
        let groups = group_by(&pairs);
        assert!(groups.is_empty());
    }

    #[test]
    fn group_by_sparse_keys() {
        // keys don't need to be contiguous, and the groups come back sorted
        let pairs = [(40_usize, 0_usize), (7, 1), (40, 2), (3, 3), (7, 4), (7, 5)];
        let groups = group_by(&pairs);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], vec![3]);
        let mut second = groups[1].clone();
        second.sort();
        assert_eq!(second, vec![1, 4, 5]);
        let mut third = groups[2].clone();
        third.sort();
        assert_eq!(third, vec![0, 2]);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, pairs.len());
    }
}
