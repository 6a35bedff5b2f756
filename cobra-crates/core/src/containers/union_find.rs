/// Disjoint sets over `0..n` where every element additionally carries a parity relative to the
/// representative of its set.
///
/// The parity is what lets the same structure group variables that are forced *equal* (parity
/// `false`) as well as variables that are forced *opposite* (parity `true`). Callers which only
/// care about connectivity always pass `false`.
///
/// The representative of a set is always its smallest element, which keeps the partition
/// reproducible independently of the order of the unions.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    parity: Vec<bool>,
}

impl UnionFind {
    pub fn new(size: usize) -> UnionFind {
        UnionFind {
            parent: (0..size).collect(),
            parity: vec![false; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of `element` together with the parity of `element` relative to
    /// it.
    pub fn find(&mut self, element: usize) -> (usize, bool) {
        let mut path = vec![];
        let mut current = element;
        while self.parent[current] != current {
            path.push(current);
            current = self.parent[current];
        }
        let root = current;

        // Compress the path, accumulating parities from the top down.
        let mut accumulated = false;
        for &node in path.iter().rev() {
            accumulated ^= self.parity[node];
            self.parity[node] = accumulated;
            self.parent[node] = root;
        }

        (root, self.parity[element] && element != root)
    }

    /// Records that `lhs` and `rhs` differ by `parity`.
    ///
    /// Returns `false` if the two were already in the same set with a conflicting parity, in which
    /// case nothing changes.
    pub fn union(&mut self, lhs: usize, rhs: usize, parity: bool) -> bool {
        let (lhs_root, lhs_parity) = self.find(lhs);
        let (rhs_root, rhs_parity) = self.find(rhs);

        if lhs_root == rhs_root {
            return lhs_parity ^ rhs_parity == parity;
        }

        let (root, child) = if lhs_root < rhs_root {
            (lhs_root, rhs_root)
        } else {
            (rhs_root, lhs_root)
        };
        self.parent[child] = root;
        self.parity[child] = lhs_parity ^ rhs_parity ^ parity;
        true
    }

    pub fn same_set(&mut self, lhs: usize, rhs: usize) -> bool {
        self.find(lhs).0 == self.find(rhs).0
    }

    /// The representative of every element, in element order.
    pub fn representatives(&mut self) -> Vec<usize> {
        (0..self.len()).map(|element| self.find(element).0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::UnionFind;

    #[test]
    fn smallest_element_represents_the_set() {
        let mut union_find = UnionFind::new(5);
        let _ = union_find.union(4, 2, false);
        let _ = union_find.union(2, 3, false);

        assert_eq!(union_find.representatives(), vec![0, 1, 2, 2, 2]);
    }

    #[test]
    fn parities_compose_along_paths() {
        let mut union_find = UnionFind::new(4);
        assert!(union_find.union(0, 1, true));
        assert!(union_find.union(1, 2, true));
        assert!(union_find.union(3, 2, false));

        assert_eq!(union_find.find(2), (0, false));
        assert_eq!(union_find.find(3), (0, false));
        assert_eq!(union_find.find(1), (0, true));
    }

    #[test]
    fn conflicting_parity_is_rejected() {
        let mut union_find = UnionFind::new(3);
        assert!(union_find.union(0, 1, false));
        assert!(union_find.union(1, 2, false));

        assert!(!union_find.union(0, 2, true));
        assert!(union_find.union(0, 2, false));
    }
}
