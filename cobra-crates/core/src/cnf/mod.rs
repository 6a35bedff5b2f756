//! Compilation of formulas to conjunctive normal form.
//!
//! Every non-leaf formula node gets an auxiliary variable standing for its truth value, defined
//! by the Tseitin clauses of its operator. The auxiliary variable of a node, and its defining
//! clauses, are computed once per [`TseitinEncoder`] and reused whenever the node occurs again,
//! so shared subformulas are encoded once.
mod cnf_formula;
mod tseitin;

pub use cnf_formula::to_cnf;
pub use cnf_formula::CnfFormula;
pub use tseitin::ClauseSink;
pub use tseitin::EncodingKey;
pub use tseitin::TseitinEncoder;
