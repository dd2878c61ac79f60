// Linear expressions and the operator algebra over them

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use super::error::{ModelError, Result};
use super::quotient::QuotientExpression;
use super::region::{Constraint, Definition, Region, Relation};
use super::variable::Variable;

/// Comparison requested by the caller.
///
/// Only non-strict comparisons exist; `"<"` and `">"` are rejected when
/// parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl FromStr for Comparison {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<=" => Ok(Comparison::LessEqual),
            ">=" => Ok(Comparison::GreaterEqual),
            "==" | "=" => Ok(Comparison::Equal),
            op @ ("<" | ">") => Err(ModelError::StrictInequality(op.to_string())),
            other => Err(ModelError::UnknownRelation(other.to_string())),
        }
    }
}

/// Immutable linear combination of variables plus a constant.
///
/// Besides its terms an expression carries the definitional regions of every
/// derived construct it was built from (abs slacks, categorical one-hot
/// sums). They follow the expression through arithmetic and are compiled
/// together with any model that references it.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    terms: Vec<(Variable, f64)>,
    constant: f64,
    definitions: Vec<Definition>,
}

impl Expression {
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single term: coeff * var.
    pub fn term(var: &Variable, coeff: f64) -> Self {
        Self {
            terms: vec![(var.clone(), coeff)],
            ..Default::default()
        }
    }

    pub fn terms(&self) -> &[(Variable, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Coefficient of `var`, zero when absent.
    pub fn coefficient(&self, var: &Variable) -> f64 {
        self.terms
            .iter()
            .find(|(v, _)| v.id() == var.id())
            .map_or(0.0, |(_, c)| *c)
    }

    /// True when no variable has a nonzero coefficient.
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|(_, c)| *c == 0.0)
    }

    pub fn scale(&self, by: f64) -> Self {
        Self {
            terms: self.terms.iter().map(|(v, c)| (v.clone(), c * by)).collect(),
            constant: self.constant * by,
            definitions: self.definitions.clone(),
        }
    }

    pub(crate) fn with_definition(mut self, definition: Definition) -> Self {
        self.attach(definition);
        self
    }

    fn attach(&mut self, definition: Definition) {
        if !self.definitions.iter().any(|d| d.id() == definition.id()) {
            self.definitions.push(definition);
        }
    }

    /// Adds `sign * rhs` in place, merging coefficients by variable identity.
    fn absorb(&mut self, rhs: Expression, sign: f64) {
        for (var, coeff) in rhs.terms {
            match self.terms.iter_mut().find(|(v, _)| v.id() == var.id()) {
                Some((_, existing)) => *existing += sign * coeff,
                None => self.terms.push((var, sign * coeff)),
            }
        }
        self.constant += sign * rhs.constant;
        for definition in rhs.definitions {
            self.attach(definition);
        }
    }

    /// `self <= rhs`, stored as `rhs - self >= 0`.
    pub fn leq<R: Into<Expression>>(&self, rhs: R) -> Region {
        Region::single(Constraint::new(rhs.into() - self, Relation::GreaterEqual))
    }

    /// `self >= rhs`, stored as `self - rhs >= 0`.
    pub fn geq<R: Into<Expression>>(&self, rhs: R) -> Region {
        Region::single(Constraint::new(self - rhs.into(), Relation::GreaterEqual))
    }

    /// `self == rhs`, stored as `self - rhs == 0`.
    pub fn eq<R: Into<Expression>>(&self, rhs: R) -> Region {
        Region::single(Constraint::new(self - rhs.into(), Relation::Equal))
    }

    pub fn compare<R: Into<Expression>>(&self, comparison: Comparison, rhs: R) -> Region {
        match comparison {
            Comparison::LessEqual => self.leq(rhs),
            Comparison::GreaterEqual => self.geq(rhs),
            Comparison::Equal => self.eq(rhs),
        }
    }

    /// Value at a point, `None` if `lookup` misses any variable.
    pub fn evaluate<F>(&self, lookup: F) -> Option<f64>
    where
        F: Fn(&Variable) -> Option<f64>,
    {
        self.terms
            .iter()
            .try_fold(self.constant, |acc, (var, coeff)| {
                Some(acc + coeff * lookup(var)?)
            })
    }

    /// Smallest value the expression can take given only its variables'
    /// declared bounds.
    pub fn lower_bound(&self) -> Result<f64> {
        let mut bound = self.constant;
        for (var, coeff) in &self.terms {
            let (limit, side) = if *coeff > 0.0 {
                (var.lower_bound(), "lower")
            } else if *coeff < 0.0 {
                (var.upper_bound(), "upper")
            } else {
                continue;
            };
            match limit {
                Some(value) => bound += coeff * value,
                None => {
                    return Err(ModelError::UnsizableDisjunction {
                        expression: self.to_string(),
                        variable: var.unique_name().to_string(),
                        side,
                    })
                }
            }
        }
        Ok(bound)
    }

    /// Describes the first non-finite coefficient or constant, if any.
    pub(crate) fn non_finite(&self) -> Option<String> {
        if !self.constant.is_finite() {
            return Some(format!("constant {} in {}", self.constant, self));
        }
        self.terms
            .iter()
            .find(|(_, c)| !c.is_finite())
            .map(|(v, c)| format!("coefficient {} on '{}'", c, v.unique_name()))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (var, coeff) in self.terms.iter().filter(|(_, c)| *c != 0.0) {
            let sign = if *coeff < 0.0 { "-" } else { "+" };
            if first {
                if *coeff < 0.0 {
                    f.write_str("-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            let magnitude = coeff.abs();
            if magnitude != 1.0 {
                write!(f, "{} ", magnitude)?;
            }
            write!(f, "{}", var)?;
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant > 0.0 {
            write!(f, " + {}", self.constant)
        } else if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)
        } else {
            Ok(())
        }
    }
}

impl From<f64> for Expression {
    fn from(constant: f64) -> Self {
        Expression::from_constant(constant)
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Expression {
            terms: vec![(var, 1.0)],
            ..Default::default()
        }
    }
}

impl From<&Variable> for Expression {
    fn from(var: &Variable) -> Self {
        Expression::term(var, 1.0)
    }
}

impl From<&Expression> for Expression {
    fn from(expr: &Expression) -> Self {
        expr.clone()
    }
}

impl<T: Into<Expression>> Sum<T> for Expression {
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Expression::default(), |mut acc, item| {
            acc.absorb(item.into(), 1.0);
            acc
        })
    }
}

macro_rules! impl_linear_ops {
    ($($t:ty),+) => {$(
        impl<R: Into<Expression>> Add<R> for $t {
            type Output = Expression;

            fn add(self, rhs: R) -> Expression {
                let mut out = Expression::from(self);
                out.absorb(rhs.into(), 1.0);
                out
            }
        }

        impl<R: Into<Expression>> Sub<R> for $t {
            type Output = Expression;

            fn sub(self, rhs: R) -> Expression {
                let mut out = Expression::from(self);
                out.absorb(rhs.into(), -1.0);
                out
            }
        }

        impl Mul<f64> for $t {
            type Output = Expression;

            fn mul(self, rhs: f64) -> Expression {
                Expression::from(self).scale(rhs)
            }
        }

        impl Div<f64> for $t {
            type Output = Expression;

            fn div(self, rhs: f64) -> Expression {
                Expression::from(self).scale(1.0 / rhs)
            }
        }

        impl Neg for $t {
            type Output = Expression;

            fn neg(self) -> Expression {
                Expression::from(self).scale(-1.0)
            }
        }

        impl Add<$t> for f64 {
            type Output = Expression;

            fn add(self, rhs: $t) -> Expression {
                Expression::from(rhs) + self
            }
        }

        impl Sub<$t> for f64 {
            type Output = Expression;

            fn sub(self, rhs: $t) -> Expression {
                Expression::from(rhs).scale(-1.0) + self
            }
        }

        impl Mul<$t> for f64 {
            type Output = Expression;

            fn mul(self, rhs: $t) -> Expression {
                Expression::from(rhs).scale(self)
            }
        }
    )+};
}

impl_linear_ops!(Expression, &Expression, Variable, &Variable);

// Division by anything non-scalar is not linear; it is deferred to comparison time.
macro_rules! impl_quotient_ops {
    ($lhs:ty => $($rhs:ty),+) => {$(
        impl Div<$rhs> for $lhs {
            type Output = QuotientExpression;

            fn div(self, rhs: $rhs) -> QuotientExpression {
                QuotientExpression::new(self, rhs)
            }
        }
    )+};
}

impl_quotient_ops!(Expression => Expression, &Expression, Variable, &Variable);
impl_quotient_ops!(&Expression => Expression, &Expression, Variable, &Variable);
impl_quotient_ops!(Variable => Expression, &Expression, Variable, &Variable);
impl_quotient_ops!(&Variable => Expression, &Expression, Variable, &Variable);
impl_quotient_ops!(f64 => Expression, &Expression, Variable, &Variable);
