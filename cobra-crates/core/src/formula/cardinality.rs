use itertools::Itertools;

use super::CardinalityKind;

/// Expands a cardinality constraint over `items` into clauses of `(item, is_positive)` pairs.
///
/// * `AtLeast(k)`: one positive clause per subset of size `n - k + 1`.
/// * `AtMost(k)`: one negative clause per subset of size `k + 1`.
/// * `Exactly(k)`: the `AtMost` clauses followed by the `AtLeast` clauses.
///
/// Subsets are enumerated in lexicographic order of their indices, so expanding the same
/// constraint twice yields the same clauses. `AtLeast(k)` with `k > n` cannot be satisfied and
/// expands to a single empty clause.
pub(crate) fn cardinality_clauses<T: Copy>(
    kind: CardinalityKind,
    bound: u32,
    items: &[T],
) -> Vec<Vec<(T, bool)>> {
    let n = items.len();
    let k = bound as usize;
    let mut clauses = vec![];

    if matches!(kind, CardinalityKind::AtMost | CardinalityKind::Exactly) && k < n {
        clauses.extend(
            items
                .iter()
                .copied()
                .combinations(k + 1)
                .map(|subset| subset.into_iter().map(|item| (item, false)).collect()),
        );
    }

    if matches!(kind, CardinalityKind::AtLeast | CardinalityKind::Exactly) && k > 0 {
        if k > n {
            clauses.push(vec![]);
        } else {
            clauses.extend(
                items
                    .iter()
                    .copied()
                    .combinations(n - k + 1)
                    .map(|subset| subset.into_iter().map(|item| (item, true)).collect()),
            );
        }
    }

    clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(clauses: &[Vec<(usize, bool)>], assignment: &[bool]) -> bool {
        clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&(item, is_positive)| assignment[item] == is_positive)
        })
    }

    #[test]
    fn expansion_agrees_with_counting_for_all_small_cases() {
        for n in 0..=5_usize {
            let items = (0..n).collect::<Vec<_>>();
            for bound in 0..=(n as u32 + 1) {
                for kind in [
                    CardinalityKind::AtLeast,
                    CardinalityKind::AtMost,
                    CardinalityKind::Exactly,
                ] {
                    let clauses = cardinality_clauses(kind, bound, &items);
                    for bits in 0..(1_u32 << n) {
                        let assignment = (0..n).map(|i| (bits >> i) & 1 == 1).collect::<Vec<_>>();
                        let count = assignment.iter().filter(|&&value| value).count();
                        assert_eq!(
                            satisfies(&clauses, &assignment),
                            kind.holds(count, bound),
                            "{kind:?}({bound}) over {n} items with assignment {assignment:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn exactly_lists_at_most_clauses_before_at_least_clauses() {
        let clauses = cardinality_clauses(CardinalityKind::Exactly, 1, &['a', 'b', 'c']);

        assert_eq!(
            clauses,
            vec![
                vec![('a', false), ('b', false)],
                vec![('a', false), ('c', false)],
                vec![('b', false), ('c', false)],
                vec![('a', true), ('b', true), ('c', true)],
            ]
        );
    }

    #[test]
    fn bounds_equal_to_the_number_of_items_use_singleton_subsets() {
        let at_least = cardinality_clauses(CardinalityKind::AtLeast, 2, &[0, 1]);
        let at_most_none = cardinality_clauses(CardinalityKind::AtMost, 2, &[0, 1]);

        assert_eq!(at_least, vec![vec![(0, true)], vec![(1, true)]]);
        assert!(at_most_none.is_empty());
    }
}
