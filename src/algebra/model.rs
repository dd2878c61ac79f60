// Model context: owns the counters behind variable identity and builds every
// construct that needs fresh variables (abs, disjunction, categoricals)

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::categorical::Categorical;
use super::error::{ModelError, Result};
use super::expression::Expression;
use super::region::{Constraint, Definition, DefinitionId, Region, Relation};
use super::variable::{Role, VarId, Variable, VariableDefinition};

/// How disjunctions size the constant that switches a region off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BigM {
    /// Per constraint, from the declared bounds of its variables.
    #[default]
    Auto,
    /// The same constant for every relaxed constraint. Too small silently
    /// cuts off feasible points; too large hurts numerical conditioning.
    Fixed(f64),
}

/// Model-building context.
///
/// Every variable gets a creation-order id from the model that created it;
/// variables from different models must not be mixed in one region.
#[derive(Debug, Default)]
pub struct Model {
    next_variable: u64,
    next_definition: u64,
    names: HashMap<String, usize>,
    big_m: BigM,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_big_m(mut self, big_m: BigM) -> Self {
        self.big_m = big_m;
        self
    }

    pub fn big_m(&self) -> BigM {
        self.big_m
    }

    /// Number of variables created so far, internal ones included.
    pub fn num_variables(&self) -> u64 {
        self.next_variable
    }

    pub fn add(&mut self, definition: VariableDefinition) -> Variable {
        self.create(definition, Role::Decision)
    }

    /// Unbounded continuous variable.
    pub fn continuous(&mut self, name: impl Into<String>) -> Variable {
        self.add(VariableDefinition::continuous(name))
    }

    /// Unbounded integer variable.
    pub fn integer(&mut self, name: impl Into<String>) -> Variable {
        self.add(VariableDefinition::integer(name))
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> Variable {
        self.add(VariableDefinition::boolean(name))
    }

    fn create(&mut self, definition: VariableDefinition, role: Role) -> Variable {
        self.next_variable += 1;
        let seen = self.names.entry(definition.name().to_string()).or_insert(0);
        *seen += 1;
        let unique_name = if *seen == 1 {
            definition.name().to_string()
        } else {
            format!("{}#{}", definition.name(), seen)
        };
        Variable::new(VarId::new(self.next_variable), unique_name, definition, role)
    }

    fn define(&mut self, region: Region, owned: &[&Variable]) -> Definition {
        self.next_definition += 1;
        trace!(definition = self.next_definition, %region, "new definitional region");
        let owned = owned.iter().map(|var| var.id()).collect();
        Definition::new(DefinitionId::new(self.next_definition), region, owned)
    }

    /// `|expression|`, valid where it is minimized or bounded from above.
    ///
    /// Introduces slacks `z_neg, z_pos >= 0` with `expression = z_pos - z_neg`
    /// and returns `z_neg + z_pos`. Solving rejects models that maximize it,
    /// bound it from below or use it inside another abs, since the slacks
    /// could then both grow.
    pub fn abs(&mut self, expression: impl Into<Expression>) -> Expression {
        let expression = expression.into();
        let z_neg = self.create(VariableDefinition::continuous("z_neg").min(0.0), Role::Slack);
        let z_pos = self.create(VariableDefinition::continuous("z_pos").min(0.0), Role::Slack);

        let definition = self.define((expression + &z_neg - &z_pos).eq(0.0), &[&z_neg, &z_pos]);
        (Expression::from(&z_neg) + &z_pos).with_definition(definition)
    }

    /// At least one of `regions` holds, sized with the model's [`BigM`].
    pub fn any<I>(&mut self, regions: I) -> Result<Region>
    where
        I: IntoIterator<Item = Region>,
    {
        let big_m = self.big_m;
        self.any_with(regions, big_m)
    }

    /// `a | b`.
    pub fn or(&mut self, a: Region, b: Region) -> Result<Region> {
        self.any([a, b])
    }

    /// Disjunction through indicator relaxation.
    ///
    /// Region `i` gets a boolean `m_i`; each of its constraints `e >= 0`
    /// becomes `e + M * m_i >= 0` (equalities are split into two
    /// inequalities first), and `sum(m) <= n - 1` keeps at least one region
    /// unrelaxed.
    pub fn any_with<I>(&mut self, regions: I, big_m: BigM) -> Result<Region>
    where
        I: IntoIterator<Item = Region>,
    {
        if let BigM::Fixed(value) = big_m {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidBigM(value));
            }
        }

        let regions: Vec<Region> = regions.into_iter().collect();
        match regions.as_slice() {
            [] => return Ok(Region::infeasible()),
            [only] => return Ok(only.clone()),
            _ => {}
        }

        let mut relaxed = Vec::new();
        let mut indicators = Vec::with_capacity(regions.len());
        for region in &regions {
            let indicator = self.create(VariableDefinition::boolean("m"), Role::Indicator);
            for constraint in region.constraints() {
                let expression = constraint.expression();
                let halves = match constraint.relation() {
                    Relation::GreaterEqual => vec![expression.clone()],
                    Relation::Equal => vec![expression.clone(), -expression],
                };
                for half in halves {
                    let magnitude = match big_m {
                        BigM::Fixed(value) => value,
                        BigM::Auto => (-half.lower_bound()?).max(0.0),
                    };
                    relaxed.push(Constraint::new(
                        half + magnitude * &indicator,
                        Relation::GreaterEqual,
                    ));
                }
            }
            indicators.push(indicator);
        }

        let selector = (regions.len() - 1) as f64 - indicators.iter().sum::<Expression>();
        relaxed.push(Constraint::new(selector, Relation::GreaterEqual));

        debug!(
            regions = regions.len(),
            constraints = relaxed.len(),
            ?big_m,
            "built disjunction"
        );
        Ok(Region::from_constraints(relaxed))
    }

    /// Each case is `(condition, consequence)`; at least one condition holds
    /// together with its consequence.
    pub fn switch<I>(&mut self, cases: I) -> Result<Region>
    where
        I: IntoIterator<Item = (Region, Region)>,
    {
        let branches: Vec<Region> = cases
            .into_iter()
            .map(|(condition, consequence)| condition & consequence)
            .collect();
        self.any(branches)
    }

    /// Categorical over `labels`, in the given order.
    pub fn categorical<L, I>(&mut self, name: impl Into<String>, labels: I) -> Result<Categorical<L>>
    where
        L: Clone + PartialEq + fmt::Debug,
        I: IntoIterator<Item = L>,
    {
        let name = name.into();
        let labels: Vec<L> = labels.into_iter().collect();
        if labels.is_empty() {
            return Err(ModelError::EmptyCategorical(name));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(ModelError::DuplicateLabel {
                    categorical: name,
                    label: format!("{:?}", label),
                });
            }
        }

        let options: Vec<(L, Variable)> = labels
            .into_iter()
            .map(|label| {
                let definition = VariableDefinition::boolean(format!("{}[{:?}]", name, label));
                let var = self.create(definition, Role::Categorical);
                (label, var)
            })
            .collect();

        let one_hot = options
            .iter()
            .map(|(_, var)| var)
            .sum::<Expression>()
            .eq(1.0);
        let indicators: Vec<&Variable> = options.iter().map(|(_, var)| var).collect();
        let definition = self.define(one_hot, &indicators);
        Ok(Categorical::new(name, options, definition))
    }

    /// `a != b`: some label is selected in `a` and not in `b`.
    pub fn distinct<L>(&mut self, a: &Categorical<L>, b: &Categorical<L>) -> Result<Region>
    where
        L: Clone + PartialEq + fmt::Debug,
    {
        let branches: Vec<Region> = a
            .paired(b)?
            .into_iter()
            .map(|(mine, theirs)| mine.eq(1.0) & theirs.eq(0.0))
            .collect();
        self.any(branches)
    }
}
