// Ratios of expressions, linearized by cross-multiplication

use std::ops::{Div, Mul};

use super::expression::Expression;
use super::region::Region;

/// `numerator / denominator`, only comparable against constants.
///
/// Comparisons multiply through by the denominator, which is exact only when
/// the denominator is strictly positive over the feasible region. That is
/// not checked: give the denominator a positive domain (or constrain it)
/// yourself.
#[derive(Debug, Clone)]
pub struct QuotientExpression {
    numerator: Expression,
    denominator: Expression,
}

impl QuotientExpression {
    pub fn new(numerator: impl Into<Expression>, denominator: impl Into<Expression>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    pub fn numerator(&self) -> &Expression {
        &self.numerator
    }

    pub fn denominator(&self) -> &Expression {
        &self.denominator
    }

    /// `a/b <= k` becomes `b*k - a >= 0`.
    pub fn leq(&self, bound: f64) -> Region {
        self.numerator.leq(self.denominator.scale(bound))
    }

    /// `a/b >= k` becomes `a - b*k >= 0`.
    pub fn geq(&self, bound: f64) -> Region {
        self.numerator.geq(self.denominator.scale(bound))
    }

    /// `a/b == k` becomes `b*k - a == 0`.
    pub fn eq(&self, bound: f64) -> Region {
        self.denominator.scale(bound).eq(&self.numerator)
    }
}

// Scaling goes to the numerator so the denominator keeps its sign.
impl Mul<f64> for QuotientExpression {
    type Output = QuotientExpression;

    fn mul(self, rhs: f64) -> QuotientExpression {
        QuotientExpression {
            numerator: self.numerator.scale(rhs),
            denominator: self.denominator,
        }
    }
}

impl Mul<QuotientExpression> for f64 {
    type Output = QuotientExpression;

    fn mul(self, rhs: QuotientExpression) -> QuotientExpression {
        rhs * self
    }
}

impl Div<f64> for QuotientExpression {
    type Output = QuotientExpression;

    fn div(self, rhs: f64) -> QuotientExpression {
        QuotientExpression {
            numerator: self.numerator.scale(1.0 / rhs),
            denominator: self.denominator,
        }
    }
}
