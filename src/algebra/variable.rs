// Variables: the leaves of every expression

use std::fmt;
use std::sync::Arc;

/// Creation-order identity of a variable within its [`Model`](super::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Numeric domain of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Continuous,
    Integer,
    /// 0/1 valued; bounds are always `[0, 1]`
    Boolean,
}

/// Who created a variable.
///
/// Only `Decision` variables are listed by [`Assignment::variables`](crate::Assignment::variables);
/// the others are artifacts of abs, disjunction and categorical encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Decision,
    Slack,
    Indicator,
    Categorical,
}

/// Builder describing a variable before it is added to a model.
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    name: String,
    domain: Domain,
    lower: Option<f64>,
    upper: Option<f64>,
}

impl VariableDefinition {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self::with_domain(name, Domain::Continuous)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::with_domain(name, Domain::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_domain(name, Domain::Boolean)
    }

    pub fn with_domain(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            lower: None,
            upper: None,
        }
    }

    /// Lower bound; ignored for boolean variables.
    pub fn min(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    /// Upper bound; ignored for boolean variables.
    pub fn max(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.min(lower).max(upper)
    }

    pub fn non_negative(self) -> Self {
        self.min(0.0)
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
struct VariableData {
    id: VarId,
    name: String,
    unique_name: String,
    domain: Domain,
    lower: Option<f64>,
    upper: Option<f64>,
    role: Role,
}

/// Handle to an immutable model variable.
///
/// Clones share identity. Two variables with the same display name are still
/// distinct; compare [`Variable::id`] to test identity.
#[derive(Clone)]
pub struct Variable(Arc<VariableData>);

impl Variable {
    pub(crate) fn new(
        id: VarId,
        unique_name: String,
        definition: VariableDefinition,
        role: Role,
    ) -> Self {
        let (lower, upper) = match definition.domain {
            Domain::Boolean => (Some(0.0), Some(1.0)),
            _ => (definition.lower, definition.upper),
        };

        Self(Arc::new(VariableData {
            id,
            name: definition.name,
            unique_name,
            domain: definition.domain,
            lower,
            upper,
            role,
        }))
    }

    pub fn id(&self) -> VarId {
        self.0.id
    }

    /// Display name as given by the caller
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name disambiguated within the owning model, used for backend columns
    pub fn unique_name(&self) -> &str {
        &self.0.unique_name
    }

    pub fn domain(&self) -> Domain {
        self.0.domain
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.0.lower
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.0.upper
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_internal(&self) -> bool {
        self.0.role != Role::Decision
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({}#{})", self.0.name, self.0.id.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_forces_unit_bounds() {
        let definition = VariableDefinition::boolean("b").bounds(-5.0, 5.0);
        let b = Variable::new(VarId::new(1), "b".to_string(), definition, Role::Decision);
        assert_eq!(b.lower_bound(), Some(0.0));
        assert_eq!(b.upper_bound(), Some(1.0));
    }

    #[test]
    fn test_unbounded_by_default() {
        let x = Variable::new(
            VarId::new(2),
            "x".to_string(),
            VariableDefinition::continuous("x"),
            Role::Decision,
        );
        assert_eq!(x.lower_bound(), None);
        assert_eq!(x.upper_bound(), None);
        assert!(!x.is_internal());
        assert_eq!(format!("{:?}", x), "Variable(x#2)");
    }

    #[test]
    fn test_clone_shares_identity() {
        let x = Variable::new(
            VarId::new(3),
            "x".to_string(),
            VariableDefinition::integer("x").non_negative(),
            Role::Slack,
        );
        let y = x.clone();
        assert_eq!(x.id(), y.id());
        assert!(y.is_internal());
        assert_eq!(y.lower_bound(), Some(0.0));
    }
}
