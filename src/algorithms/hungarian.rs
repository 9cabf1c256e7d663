//! Rectangular assignment solver (Hungarian method with potentials).
//!
//! Minimizes total cost over an `n × m` matrix with `n <= m`, assigning every
//! row to a distinct column. Runs in `O(n² m)`.

/// Returns the column chosen for each row.
///
/// `costs` must be rectangular with at least as many columns as rows and
/// contain only finite values.
pub fn solve(costs: &[Vec<f64>]) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }
    let m = costs[0].len();
    debug_assert!(n <= m, "more rows than columns");
    debug_assert!(costs.iter().all(|row| row.len() == m), "ragged cost matrix");

    // 1-based potentials; column 0 is a virtual column used to seed each row.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    // owner[j] = row (1-based) matched to column j, 0 if free
    let mut owner = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = costs[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Augment along the alternating path back to the virtual column.
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=m {
        if owner[j] != 0 {
            assignment[owner[j] - 1] = j - 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(costs: &[Vec<f64>], cols: &[usize]) -> f64 {
        cols.iter().enumerate().map(|(i, &j)| costs[i][j]).sum()
    }

    #[test]
    fn empty_matrix() {
        assert!(solve(&[]).is_empty());
    }

    #[test]
    fn square_minimum() {
        let costs = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let cols = solve(&costs);
        assert_eq!(total(&costs, &cols), 5.0);
    }

    #[test]
    fn rectangular_uses_distinct_columns() {
        let costs = vec![vec![5.0, 1.0, 9.0, 2.0], vec![5.0, 1.0, 9.0, 3.0]];
        let cols = solve(&costs);
        assert_ne!(cols[0], cols[1]);
        assert_eq!(total(&costs, &cols), 3.0);
    }

    #[test]
    fn negative_costs_maximize_values() {
        // Maximize [[10, 2], [8, 9]] -> 10 + 9
        let costs = vec![vec![-10.0, -2.0], vec![-8.0, -9.0]];
        assert_eq!(solve(&costs), vec![0, 1]);
    }

    #[test]
    fn single_row_picks_cheapest() {
        let costs = vec![vec![3.0, -1.0, 0.0]];
        assert_eq!(solve(&costs), vec![1]);
    }
}
