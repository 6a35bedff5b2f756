use log::trace;

use super::SatOracle;
use super::SatResult;
use crate::basic_types::Clause;
use crate::basic_types::Literal;
use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::cobra_assert_moderate;
use crate::cobra_assert_simple;
use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the search performed by a [`CdclOracle`].
    OracleStatistics {
        num_solves: usize,
        num_decisions: usize,
        num_conflicts: usize,
        num_propagations: usize,
        num_learned_clauses: usize,
    }
);

const ACTIVITY_DECAY: f64 = 0.95;
const ACTIVITY_RESCALE_THRESHOLD: f64 = 1e100;

/// A conflict-driven clause-learning SAT solver.
///
/// Clauses are watched by their first two literals; conflicts are analysed to the first unique
/// implication point and the learned clause is kept for all later calls. Assumptions are decided
/// first, one per decision level. Decisions pick the unassigned variable with the highest
/// activity (lowest id on ties) and try it false first, so the search is fully deterministic.
#[derive(Clone, Debug)]
pub struct CdclOracle {
    clauses: Vec<Vec<Literal>>,
    /// The clauses watching a literal, indexed by [`Literal::code`]
    watch_lists: Vec<Vec<usize>>,
    /// Indexed by variable id; id 0 is unused
    values: Vec<Option<bool>>,
    levels: Vec<usize>,
    reasons: Vec<Option<usize>>,
    activity: Vec<f64>,
    activity_increment: f64,
    trail: Vec<Literal>,
    trail_delimiter: Vec<usize>,
    propagation_head: usize,
    /// Set once the clauses are unsatisfiable without any assumptions
    root_conflict: bool,
    statistics: OracleStatistics,
}

impl Default for CdclOracle {
    fn default() -> Self {
        CdclOracle {
            clauses: vec![],
            watch_lists: vec![vec![], vec![]],
            values: vec![None],
            levels: vec![0],
            reasons: vec![None],
            activity: vec![0.0],
            activity_increment: 1.0,
            trail: vec![],
            trail_delimiter: vec![],
            propagation_head: 0,
            root_conflict: false,
            statistics: OracleStatistics::default(),
        }
    }
}

fn literal_value(values: &[Option<bool>], literal: Literal) -> Option<bool> {
    values[literal.variable().id() as usize].map(|value| value == literal.is_positive())
}

impl CdclOracle {
    pub fn statistics(&self) -> OracleStatistics {
        self.statistics
    }

    fn num_variables(&self) -> usize {
        self.values.len() - 1
    }

    fn decision_level(&self) -> usize {
        self.trail_delimiter.len()
    }

    fn value(&self, literal: Literal) -> Option<bool> {
        literal_value(&self.values, literal)
    }

    fn ensure_variable(&mut self, variable: Variable) {
        let id = variable.id() as usize;
        if id < self.values.len() {
            return;
        }
        self.values.resize(id + 1, None);
        self.levels.resize(id + 1, 0);
        self.reasons.resize(id + 1, None);
        self.activity.resize(id + 1, 0.0);
        self.watch_lists.resize(2 * (id + 1), vec![]);
    }

    fn assign(&mut self, literal: Literal, reason: Option<usize>) {
        let id = literal.variable().id() as usize;
        cobra_assert_moderate!(self.values[id].is_none());
        self.values[id] = Some(literal.is_positive());
        self.levels[id] = self.decision_level();
        self.reasons[id] = reason;
        self.trail.push(literal);
    }

    fn new_decision_level(&mut self) {
        self.trail_delimiter.push(self.trail.len());
    }

    fn backtrack(&mut self, level: usize) {
        if self.decision_level() <= level {
            return;
        }
        let new_trail_len = self.trail_delimiter[level];
        for literal in self.trail.drain(new_trail_len..) {
            let id = literal.variable().id() as usize;
            self.values[id] = None;
            self.reasons[id] = None;
        }
        self.trail_delimiter.truncate(level);
        self.propagation_head = self.trail.len();
    }

    fn watch(&mut self, clause_index: usize) {
        let clause = &self.clauses[clause_index];
        let (first, second) = (clause[0], clause[1]);
        self.watch_lists[first.code()].push(clause_index);
        self.watch_lists[second.code()].push(clause_index);
    }

    /// Propagates the trail to a fixpoint. Returns the index of a conflicting clause, if any.
    fn propagate(&mut self) -> Option<usize> {
        while self.propagation_head < self.trail.len() {
            let false_literal = !self.trail[self.propagation_head];
            self.propagation_head += 1;

            let watchers = std::mem::take(&mut self.watch_lists[false_literal.code()]);
            let mut kept = Vec::with_capacity(watchers.len());
            let mut conflict = None;

            for (position, &clause_index) in watchers.iter().enumerate() {
                let clause = &mut self.clauses[clause_index];
                if clause[0] == false_literal {
                    clause.swap(0, 1);
                }
                let other = clause[0];

                if literal_value(&self.values, other) == Some(true) {
                    kept.push(clause_index);
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&index| literal_value(&self.values, clause[index]) != Some(false));
                if let Some(index) = replacement {
                    clause.swap(1, index);
                    self.watch_lists[clause[1].code()].push(clause_index);
                    continue;
                }

                kept.push(clause_index);
                if literal_value(&self.values, other) == Some(false) {
                    kept.extend_from_slice(&watchers[position + 1..]);
                    conflict = Some(clause_index);
                    break;
                }

                self.statistics.num_propagations += 1;
                self.assign(other, Some(clause_index));
            }

            self.watch_lists[false_literal.code()] = kept;
            if conflict.is_some() {
                return conflict;
            }
        }
        None
    }

    /// Analyses a conflict at the current decision level. Returns the learned clause, with the
    /// asserting literal first and a literal of the backjump level second, and the level to
    /// backjump to.
    fn analyse(&mut self, conflict: usize) -> (Vec<Literal>, usize) {
        let current_level = self.decision_level();
        let mut seen = vec![false; self.values.len()];
        let mut learned = vec![];
        let mut open_at_current_level = 0;
        let mut clause_index = conflict;
        let mut pivot = None;
        let mut trail_index = self.trail.len();

        let asserting = loop {
            for literal in self.clauses[clause_index].clone() {
                let id = literal.variable().id() as usize;
                if Some(literal) == pivot || seen[id] || self.levels[id] == 0 {
                    continue;
                }
                seen[id] = true;
                self.bump_activity(id);
                if self.levels[id] == current_level {
                    open_at_current_level += 1;
                } else {
                    learned.push(literal);
                }
            }

            let next = loop {
                trail_index -= 1;
                let literal = self.trail[trail_index];
                if seen[literal.variable().id() as usize] {
                    break literal;
                }
            };
            seen[next.variable().id() as usize] = false;
            open_at_current_level -= 1;

            if open_at_current_level == 0 {
                break !next;
            }
            pivot = Some(next);
            clause_index = self.reasons[next.variable().id() as usize]
                .expect("implied literals at the conflict level have a reason");
        };

        learned.insert(0, asserting);

        let mut backjump_level = 0;
        for index in 1..learned.len() {
            let level = self.levels[learned[index].variable().id() as usize];
            if level > backjump_level {
                backjump_level = level;
                learned.swap(1, index);
            }
        }

        (learned, backjump_level)
    }

    fn bump_activity(&mut self, id: usize) {
        self.activity[id] += self.activity_increment;
        if self.activity[id] > ACTIVITY_RESCALE_THRESHOLD {
            for activity in self.activity.iter_mut() {
                *activity /= ACTIVITY_RESCALE_THRESHOLD;
            }
            self.activity_increment /= ACTIVITY_RESCALE_THRESHOLD;
        }
    }

    fn learn(&mut self, learned: Vec<Literal>) {
        self.statistics.num_learned_clauses += 1;
        let asserting = learned[0];
        if learned.len() == 1 {
            self.assign(asserting, None);
            return;
        }
        self.clauses.push(learned);
        let clause_index = self.clauses.len() - 1;
        self.watch(clause_index);
        self.assign(asserting, Some(clause_index));
    }

    fn pick_branching_variable(&self) -> Option<Variable> {
        let mut best: Option<usize> = None;
        for id in 1..self.values.len() {
            if self.values[id].is_some() {
                continue;
            }
            if best.map_or(true, |best| self.activity[id] > self.activity[best]) {
                best = Some(id);
            }
        }
        best.map(|id| Variable::new(id as u32))
    }

    fn extract_model(&self) -> Model {
        Model::from_fn(self.num_variables(), |variable| {
            self.values[variable.id() as usize] == Some(true)
        })
    }
}

impl SatOracle for CdclOracle {
    fn reserve_variables(&mut self, num_variables: usize) {
        if num_variables > 0 {
            self.ensure_variable(Variable::new(num_variables as u32));
        }
    }

    fn add_clause(&mut self, clause: &Clause) {
        self.backtrack(0);
        if self.root_conflict || clause.is_tautology() {
            return;
        }
        for literal in clause.literals() {
            self.ensure_variable(literal.variable());
        }
        if clause
            .literals()
            .iter()
            .any(|&literal| self.value(literal) == Some(true))
        {
            return;
        }

        // Literals false at the root stay false, so they can be dropped.
        let literals = clause
            .literals()
            .iter()
            .copied()
            .filter(|&literal| self.value(literal).is_none())
            .collect::<Vec<_>>();

        match literals.len() {
            0 => self.root_conflict = true,
            1 => {
                self.assign(literals[0], None);
                if self.propagate().is_some() {
                    self.root_conflict = true;
                }
            }
            _ => {
                self.clauses.push(literals);
                self.watch(self.clauses.len() - 1);
            }
        }
    }

    fn solve(&mut self, assumptions: &[Literal]) -> SatResult {
        self.statistics.num_solves += 1;
        self.backtrack(0);
        for assumption in assumptions {
            self.ensure_variable(assumption.variable());
        }
        if self.root_conflict || self.propagate().is_some() {
            self.root_conflict = true;
            return SatResult::Unsatisfiable;
        }

        loop {
            if let Some(conflict) = self.propagate() {
                self.statistics.num_conflicts += 1;
                if self.decision_level() == 0 {
                    self.root_conflict = true;
                    return SatResult::Unsatisfiable;
                }
                let (learned, backjump_level) = self.analyse(conflict);
                self.backtrack(backjump_level);
                self.learn(learned);
                self.activity_increment /= ACTIVITY_DECAY;
                continue;
            }

            if let Some(&assumption) = assumptions.get(self.decision_level()) {
                match self.value(assumption) {
                    Some(false) => {
                        trace!("assumption {assumption} is refuted");
                        self.backtrack(0);
                        return SatResult::Unsatisfiable;
                    }
                    Some(true) => self.new_decision_level(),
                    None => {
                        self.new_decision_level();
                        self.assign(assumption, None);
                    }
                }
                continue;
            }

            match self.pick_branching_variable() {
                Some(variable) => {
                    self.statistics.num_decisions += 1;
                    self.new_decision_level();
                    self.assign(Literal::negative(variable), None);
                }
                None => {
                    let model = self.extract_model();
                    cobra_assert_simple!(self
                        .clauses
                        .iter()
                        .all(|clause| clause.iter().any(|&literal| model.literal_value(literal))));
                    self.backtrack(0);
                    return SatResult::Satisfiable(model);
                }
            }
        }
    }
}
