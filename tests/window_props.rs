//! Property tests for window partitioning

use proptest::prelude::*;
use windowr::tensor::MAX_DIMS;
use windowr::window::{Dimension, Window};

fn dimension_strategy() -> impl Strategy<Value = Dimension> {
    (0usize..8, 0usize..40, 1usize..5)
        .prop_map(|(start, len, step)| Dimension::new(start, start + len, step))
}

fn window_strategy() -> impl Strategy<Value = Window> {
    prop::collection::vec(dimension_strategy(), 1..=MAX_DIMS)
        .prop_map(|dims| Window::from_dimensions(dims))
}

fn positions(dim: Dimension) -> Vec<usize> {
    (dim.start()..dim.end()).step_by(dim.step()).collect()
}

proptest! {
    #[test]
    fn prop_split_covers_window_exactly(
        window in window_strategy(),
        axis in 0usize..MAX_DIMS,
        parts in 1usize..16,
    ) {
        let split = window.split(axis, parts);
        prop_assert!(!split.is_empty());
        prop_assert!(split.len() <= parts);

        let mut covered = Vec::new();
        for sub in &split {
            prop_assert!(sub.is_sub_window_of(&window));
            for other in 0..MAX_DIMS {
                if other != axis {
                    prop_assert_eq!(sub.get(other), window.get(other));
                }
            }
            covered.extend(positions(sub.get(axis)));
        }
        // In order, no gaps, no overlaps
        prop_assert_eq!(covered, positions(window.get(axis)));
    }

    #[test]
    fn prop_split_parts_are_balanced(
        window in window_strategy(),
        axis in 0usize..MAX_DIMS,
        parts in 1usize..16,
    ) {
        let sizes: Vec<usize> = window
            .split(axis, parts)
            .iter()
            .map(|sub| sub.num_iterations(axis))
            .collect();
        let max = sizes.iter().copied().max().unwrap_or(0);
        let min = sizes.iter().copied().min().unwrap_or(0);
        prop_assert!(max - min <= 1, "sizes {:?}", sizes);
    }

    #[test]
    fn prop_split_window_parts_are_sub_windows(
        window in window_strategy(),
        axis in 0usize..MAX_DIMS,
        total in 1usize..16,
    ) {
        let mut iterations = 0;
        for id in 0..total {
            let sub = window.split_window(axis, id, total);
            prop_assert!(sub.is_sub_window_of(&window));
            iterations += sub.num_iterations(axis);
        }
        prop_assert_eq!(iterations, window.num_iterations(axis));
    }
}
