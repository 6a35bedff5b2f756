use crate::basic_types::Variable;
use crate::cobra_assert_simple;
use crate::containers::StorageKey;
use crate::solvers::Solver;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableStatus {
    Free,
    FixedFalse,
    FixedTrue,
}

/// A partition of the variables into groups whose members take the same value in every model
/// of the current knowledge.
///
/// All variables fixed to true form one group, as do all variables fixed to false. Free
/// variables share a group when the solver finds them equivalent. Replacing a variable by
/// another one of its group anywhere in a formula does not change which models satisfy it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableGroups {
    statuses: Vec<VariableStatus>,
    groups: Vec<u32>,
}

impl VariableGroups {
    /// Classifies the variables against the current constraints of `solver`, which must be
    /// satisfiable.
    pub fn compute(solver: &mut dyn Solver, num_variables: usize) -> VariableGroups {
        cobra_assert_simple!(
            solver.satisfiable(),
            "variable groups of an unsatisfiable knowledge"
        );

        let model = solver.assignment();
        let statuses = Variable::all(num_variables)
            .map(|variable| {
                if model.value(variable) {
                    if solver.must_be_true(variable) {
                        VariableStatus::FixedTrue
                    } else {
                        VariableStatus::Free
                    }
                } else if solver.must_be_false(variable) {
                    VariableStatus::FixedFalse
                } else {
                    VariableStatus::Free
                }
            })
            .collect::<Vec<_>>();

        let mut groups = (0..num_variables as u32).collect::<Vec<_>>();

        for fixed in [VariableStatus::FixedFalse, VariableStatus::FixedTrue] {
            let members = (0..num_variables)
                .filter(|&index| statuses[index] == fixed)
                .collect::<Vec<_>>();
            if let Some(&first) = members.first() {
                for index in members {
                    groups[index] = first as u32;
                }
            }
        }

        for class in solver.variable_equivalences().classes() {
            for polarity in [true, false] {
                let members = class
                    .iter()
                    .filter(|literal| literal.is_positive() == polarity)
                    .map(|literal| literal.variable().index())
                    .collect::<Vec<_>>();
                if let Some(&first) = members.first() {
                    for index in members {
                        groups[index] = first as u32;
                    }
                }
            }
        }

        VariableGroups { statuses, groups }
    }

    /// Every variable free and in a group of its own.
    pub fn singletons(num_variables: usize) -> VariableGroups {
        VariableGroups {
            statuses: vec![VariableStatus::Free; num_variables],
            groups: (0..num_variables as u32).collect(),
        }
    }

    pub fn status(&self, variable: Variable) -> VariableStatus {
        self.statuses[variable.index()]
    }

    /// The group of `variable`, named by the index of its smallest member.
    pub fn group(&self, variable: Variable) -> u32 {
        self.groups[variable.index()]
    }

    pub fn same_group(&self, lhs: Variable, rhs: Variable) -> bool {
        self.group(lhs) == self.group(rhs)
    }

    pub fn num_groups(&self) -> usize {
        self.groups
            .iter()
            .enumerate()
            .filter(|&(index, &group)| index as u32 == group)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaArena;
    use crate::solvers::create_solver;
    use crate::solvers::SolverBackend;

    #[test]
    fn fixed_and_equivalent_variables_are_grouped() {
        let mut arena = FormulaArena::default();
        let variables = (0..6)
            .map(|index| arena.new_variable(format!("x{index}")))
            .collect::<Vec<_>>();
        let leaves = variables
            .iter()
            .map(|&variable| arena.variable(variable))
            .collect::<Vec<_>>();
        // x0 and x1 are true, x2 is false, x3 == x4, x5 is free.
        let not_x2 = arena.not(leaves[2]);
        let x3_is_x4 = arena.equivalent(leaves[3], leaves[4]);
        let restriction = arena.and(vec![leaves[0], leaves[1], not_x2, x3_is_x4]);

        for backend in [SolverBackend::Oracle, SolverBackend::BruteForce] {
            let mut solver = create_solver(&arena, restriction, backend);

            let groups = VariableGroups::compute(solver.as_mut(), arena.num_variables());

            assert_eq!(groups.status(variables[0]), VariableStatus::FixedTrue);
            assert_eq!(groups.status(variables[2]), VariableStatus::FixedFalse);
            assert_eq!(groups.status(variables[5]), VariableStatus::Free);
            assert!(groups.same_group(variables[0], variables[1]));
            assert!(groups.same_group(variables[3], variables[4]));
            assert!(!groups.same_group(variables[2], variables[5]));
            assert_eq!(groups.num_groups(), 4);
        }
    }

    #[test]
    fn opposite_variables_stay_apart() {
        let mut arena = FormulaArena::default();
        let a = arena.new_variable("a");
        let b = arena.new_variable("b");
        let a_leaf = arena.variable(a);
        let b_leaf = arena.variable(b);
        let not_b = arena.not(b_leaf);
        let restriction = arena.equivalent(a_leaf, not_b);
        let mut solver = create_solver(&arena, restriction, SolverBackend::Oracle);

        let groups = VariableGroups::compute(solver.as_mut(), arena.num_variables());

        assert!(!groups.same_group(a, b));
        assert_eq!(groups.num_groups(), 2);
    }
}
