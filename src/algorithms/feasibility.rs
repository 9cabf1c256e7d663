//! Bipartite feasibility of a period's assignment problem.
//!
//! Agents and resources form the two sides of an undirected graph with an
//! edge per feasible pair. A complete assignment exists iff the maximum
//! matching covers every agent.

use std::collections::BTreeSet;

use petgraph::algo::maximum_matching;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{MatchingError, Result};
use crate::matrix::AssignmentMatrix;
use crate::ResourceId;

/// Size of a maximum matching between rows and resources.
///
/// # Arguments
///
/// * `columns` - Feasible resources of each row
/// * `resource_count` - Size of the resource pool
/// * `blocked` - Resources that may not be used
pub fn max_matching_size(
    columns: &[Vec<ResourceId>],
    resource_count: usize,
    blocked: &BTreeSet<ResourceId>,
) -> usize {
    let mut graph = UnGraph::<(), ()>::with_capacity(columns.len() + resource_count, 0);
    let rows: Vec<NodeIndex> = columns.iter().map(|_| graph.add_node(())).collect();
    let resources: Vec<NodeIndex> = (0..resource_count).map(|_| graph.add_node(())).collect();

    for (row, cols) in rows.iter().zip(columns) {
        for &r in cols.iter().filter(|r| !blocked.contains(r)) {
            if let Some(&node) = resources.get(r) {
                graph.add_edge(*row, node, ());
            }
        }
    }

    maximum_matching(&graph).len()
}

/// Fails with [`MatchingError::AssignmentInfeasible`] unless every row of
/// `matrix` can be matched at once.
pub fn ensure_complete(matrix: &AssignmentMatrix) -> Result<()> {
    let agents = matrix.rows();
    let matched = max_matching_size(
        &matrix.feasible_columns(),
        matrix.resource_count(),
        &BTreeSet::new(),
    );
    if matched < agents {
        return Err(MatchingError::AssignmentInfeasible { agents, matched });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_options_are_complete() {
        let cols = vec![vec![0], vec![1], vec![2]];
        assert_eq!(max_matching_size(&cols, 3, &BTreeSet::new()), 3);
    }

    #[test]
    fn shared_single_option_is_not() {
        let cols = vec![vec![0], vec![0], vec![0, 1]];
        assert_eq!(max_matching_size(&cols, 2, &BTreeSet::new()), 2);
    }

    #[test]
    fn blocked_resources_are_ignored() {
        let cols = vec![vec![0, 1], vec![1]];
        let blocked = BTreeSet::from([1]);
        assert_eq!(max_matching_size(&cols, 2, &blocked), 1);
    }

    #[test]
    fn requires_augmenting_path() {
        // Greedy row order would give row 0 resource 0 and strand row 1.
        let cols = vec![vec![0, 1], vec![0]];
        assert_eq!(max_matching_size(&cols, 2, &BTreeSet::new()), 2);
    }
}
