use crate::{DisjointSubsets, Subsets};
use std::mem;

/// Partitions the subsets into colors such that the subsets of any single color are disjoint.
///
/// Subsets are visited in ascending order, and a subset is assigned to the first color in
/// which none of its indices have been claimed yet. Within each color, labels are therefore
/// sorted in ascending order. The label of a subset is its position in `subsets`.
pub fn sequential_greedy_coloring(subsets: &Subsets) -> Vec<DisjointSubsets> {
    let mut colors = Vec::new();
    let mut postponed_subset_indices = Vec::new();
    let mut current_subset_indices: Vec<_> = (0..subsets.len()).collect();

    // Index of the last color to claim any given index. The table grows as larger
    // indices are encountered.
    let mut last_visited_color: Vec<Option<usize>> = Vec::new();

    let mut color_idx = 0;
    while !current_subset_indices.is_empty() {
        let mut color_subsets = Subsets::new();
        let mut color_labels = Vec::new();
        for &subset_idx in &current_subset_indices {
            let subset = subsets
                .get(subset_idx)
                .expect("Subset index is always in bounds");
            let is_blocked = subset
                .iter()
                .any(|&idx| last_visited_color.get(idx).copied().flatten() == Some(color_idx));
            if is_blocked {
                postponed_subset_indices.push(subset_idx);
            } else {
                for &idx in subset {
                    if idx >= last_visited_color.len() {
                        // Amortize resizes by growing more than strictly needed
                        last_visited_color.resize(2 * idx + 1, None);
                    }
                    last_visited_color[idx] = Some(color_idx);
                }
                color_subsets.push(subset);
                color_labels.push(subset_idx);
            }
        }

        debug_assert!(DisjointSubsets::try_from_disjoint_subsets(color_subsets.clone(), color_labels.clone()).is_ok());
        log::trace!("Color {} holds {} subsets", color_idx, color_labels.len());
        colors.push(DisjointSubsets::from_disjoint_subsets_unchecked(color_subsets, color_labels));

        mem::swap(&mut postponed_subset_indices, &mut current_subset_indices);
        postponed_subset_indices.clear();
        color_idx += 1;
    }

    colors
}
