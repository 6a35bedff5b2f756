use crate::basic_types::Literal;
use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::containers::UnionFind;

/// Classes of variables that take equal or opposite values in every model.
///
/// Each class is listed by increasing variable; its first variable appears positively and every
/// other literal has the polarity that makes it equal to the first. Only classes with at least
/// two variables are kept, and fixed variables are never part of a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableEquivalences {
    classes: Vec<Vec<Literal>>,
}

impl VariableEquivalences {
    /// Collects the classes of a union-find over variable indices (`id - 1`), restricted to the
    /// `included` variables.
    pub(crate) fn from_union_find(union_find: &mut UnionFind, included: &[bool]) -> Self {
        let mut classes: Vec<Vec<Literal>> = vec![];
        let mut class_of_root: Vec<Option<usize>> = vec![None; union_find.len()];

        for index in 0..union_find.len() {
            if !included[index] {
                continue;
            }
            let (root, parity) = union_find.find(index);
            let literal = Literal::new(Variable::new(index as u32 + 1), !parity);
            match class_of_root[root] {
                Some(class) => classes[class].push(literal),
                None => {
                    class_of_root[root] = Some(classes.len());
                    classes.push(vec![literal]);
                }
            }
        }

        // The smallest member of a class is its root, so classes start with a positive literal.
        classes.retain(|class| class.len() > 1);
        VariableEquivalences { classes }
    }

    /// Reads the equivalences off an explicit list of models.
    pub(crate) fn from_models<'a>(
        num_variables: usize,
        models: impl IntoIterator<Item = &'a Model> + Clone,
    ) -> Self {
        let mut union_find = UnionFind::new(num_variables);
        let mut included = vec![true; num_variables];
        let mut models_iter = models.clone().into_iter().peekable();

        let Some(first) = models_iter.peek().copied() else {
            return VariableEquivalences::default();
        };

        // A variable is fixed when all models agree with the first one.
        for variable in Variable::all(num_variables) {
            let value = first.value(variable);
            included[variable.id() as usize - 1] = models
                .clone()
                .into_iter()
                .any(|model| model.value(variable) != value);
        }

        for lhs in Variable::all(num_variables) {
            let lhs_index = lhs.id() as usize - 1;
            if !included[lhs_index] || union_find.find(lhs_index).0 != lhs_index {
                continue;
            }
            for rhs in Variable::all(num_variables).skip(lhs.id() as usize) {
                let rhs_index = rhs.id() as usize - 1;
                if !included[rhs_index] || union_find.find(rhs_index).0 != rhs_index {
                    continue;
                }
                let parity = first.value(lhs) != first.value(rhs);
                if models
                    .clone()
                    .into_iter()
                    .all(|model| (model.value(lhs) != model.value(rhs)) == parity)
                {
                    let _ = union_find.union(lhs_index, rhs_index, parity);
                }
            }
        }

        VariableEquivalences::from_union_find(&mut union_find, &included)
    }

    pub fn classes(&self) -> &[Vec<Literal>] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// The literal of the smallest variable equivalent to `variable`, with the polarity
    /// `variable` has relative to it. `None` if `variable` is in no class.
    pub fn representative(&self, variable: Variable) -> Option<Literal> {
        self.classes.iter().find_map(|class| {
            let member = class.iter().find(|literal| literal.variable() == variable)?;
            Some(Literal::new(class[0].variable(), member.is_positive()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_and_opposite_variables_share_a_class() {
        // x1 == x3, x2 == !x1, x4 fixed true, x5 free.
        let models = [
            Model::from_fn(5, |v| [true, false, true, true, false][v.id() as usize - 1]),
            Model::from_fn(5, |v| [false, true, false, true, false][v.id() as usize - 1]),
            Model::from_fn(5, |v| [true, false, true, true, true][v.id() as usize - 1]),
        ];

        let equivalences = VariableEquivalences::from_models(5, &models);

        let x = |id: u32, positive: bool| Literal::new(Variable::new(id), positive);
        assert_eq!(
            equivalences.classes(),
            &[vec![x(1, true), x(2, false), x(3, true)]]
        );
        assert_eq!(
            equivalences.representative(Variable::new(2)),
            Some(x(1, false))
        );
        assert_eq!(equivalences.representative(Variable::new(4)), None);
    }

    #[test]
    fn no_models_means_no_classes() {
        let equivalences = VariableEquivalences::from_models(3, &[]);

        assert_eq!(equivalences.num_classes(), 0);
    }
}
