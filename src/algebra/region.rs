// Regions: immutable conjunctions of linear constraints

use std::fmt;
use std::ops::BitAnd;
use std::sync::Arc;

use super::expression::Expression;
use super::variable::{VarId, Variable};

/// How a constrained expression relates to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// expression >= 0
    GreaterEqual,
    /// expression == 0
    Equal,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::GreaterEqual => f.write_str(">="),
            Relation::Equal => f.write_str("=="),
        }
    }
}

/// A single `expression >= 0` or `expression == 0`.
#[derive(Debug, Clone)]
pub struct Constraint {
    expression: Expression,
    relation: Relation,
}

impl Constraint {
    pub fn new(expression: Expression, relation: Relation) -> Self {
        Self {
            expression,
            relation,
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Checks a constant-only constraint; `None` if variables remain.
    pub fn holds_trivially(&self, tolerance: f64) -> Option<bool> {
        if !self.expression.is_constant() {
            return None;
        }
        let value = self.expression.constant();
        Some(match self.relation {
            Relation::GreaterEqual => value >= -tolerance,
            Relation::Equal => value.abs() <= tolerance,
        })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 0", self.expression, self.relation)
    }
}

/// Feasible set described by a conjunction of constraints.
///
/// The empty region admits every point. Conjunction (`&`) concatenates
/// constraint lists; disjunction needs fresh indicator variables and lives on
/// [`Model`](super::Model).
#[derive(Debug, Clone, Default)]
pub struct Region {
    constraints: Vec<Constraint>,
}

impl Region {
    /// The trivially true region.
    pub fn new() -> Self {
        Self::default()
    }

    /// The region no point satisfies (`-1 >= 0`).
    pub fn infeasible() -> Self {
        Self::single(Constraint::new(
            Expression::from_constant(-1.0),
            Relation::GreaterEqual,
        ))
    }

    pub fn single(constraint: Constraint) -> Self {
        Self {
            constraints: vec![constraint],
        }
    }

    pub fn from_constraints(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// Conjunction of every region in `regions`.
    pub fn all<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = Region>,
    {
        Self {
            constraints: regions
                .into_iter()
                .flat_map(|region| region.constraints)
                .collect(),
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn and(&self, other: &Region) -> Region {
        let mut constraints = Vec::with_capacity(self.len() + other.len());
        constraints.extend(self.constraints.iter().cloned());
        constraints.extend(other.constraints.iter().cloned());
        Region { constraints }
    }
}

impl BitAnd for Region {
    type Output = Region;

    fn bitand(mut self, rhs: Region) -> Region {
        self.constraints.extend(rhs.constraints);
        self
    }
}

impl BitAnd<&Region> for Region {
    type Output = Region;

    fn bitand(mut self, rhs: &Region) -> Region {
        self.constraints.extend(rhs.constraints.iter().cloned());
        self
    }
}

impl BitAnd<Region> for &Region {
    type Output = Region;

    fn bitand(self, rhs: Region) -> Region {
        self.and(&rhs)
    }
}

impl BitAnd<&Region> for &Region {
    type Output = Region;

    fn bitand(self, rhs: &Region) -> Region {
        self.and(rhs)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Region(")?;
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", constraint)?;
        }
        f.write_str(")")
    }
}

/// Creation-order identity of a definitional region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(u64);

impl DefinitionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

struct DefinitionData {
    id: DefinitionId,
    region: Region,
    /// Variables created together with this region
    owned: Vec<VarId>,
}

/// Region an expression drags along wherever it is used.
///
/// Shared by every expression derived from the construct that created it and
/// compiled at most once per solve.
#[derive(Clone)]
pub struct Definition(Arc<DefinitionData>);

impl Definition {
    pub(crate) fn new(id: DefinitionId, region: Region, owned: Vec<VarId>) -> Self {
        Self(Arc::new(DefinitionData { id, region, owned }))
    }

    pub fn id(&self) -> DefinitionId {
        self.0.id
    }

    pub fn region(&self) -> &Region {
        &self.0.region
    }

    /// True for the variables this region was introduced to define.
    pub fn owns(&self, var: &Variable) -> bool {
        self.0.owned.contains(&var.id())
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Definition#{}({} constraints)", self.0.id.0, self.0.region.len())
    }
}
