#![cfg(feature = "microlp")]

use letsmodel::{
    BigM, Expression, Model, ModelError, Region, SolveError, SolverBackend, SolverConfig,
    VariableDefinition,
};
use letsmodel::{OptimizationType, SolutionStatus};
use tracing_subscriber::EnvFilter;

const TOLERANCE: f64 = 1e-6;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("LETSMODEL_TRACE"))
        .with_test_writer()
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE * (1.0 + expected.abs()),
        "expected {expected}, got {actual}"
    );
}

fn microlp() -> SolverConfig {
    SolverConfig::default().with_backend(SolverBackend::MicroLp)
}

/// `x + 3y <= 10 & 3x + y <= 10` over the non-negative quadrant.
fn diamond(model: &mut Model, integer: bool) -> (Region, letsmodel::Variable, letsmodel::Variable) {
    let define = |name: &str| {
        if integer {
            VariableDefinition::integer(name).non_negative()
        } else {
            VariableDefinition::continuous(name).non_negative()
        }
    };
    let x = model.add(define("x"));
    let y = model.add(define("y"));
    let region = (&x + 3.0 * &y).leq(10.0) & (3.0 * &x + &y).leq(10.0);
    (region, x, y)
}

#[test]
fn test_1d_constraint() {
    init_tracing();
    let mut model = Model::new();
    let x = model.continuous("x");
    let region = Expression::from(&x).geq(3.0) & Expression::from(&x).leq(5.0);

    let solution = region.maximize(&x).unwrap();
    assert_close(solution[&x], 5.0);
    assert_eq!(solution.status(), SolutionStatus::Optimal);

    let solution = region.minimize(&x).unwrap();
    assert_close(solution[&x], 3.0);
}

#[test]
fn test_1d_equality() {
    let mut model = Model::new();
    let x = model.continuous("x");
    let solution = Expression::from(&x).eq(7.0).maximize(&x).unwrap();
    assert_close(solution[&x], 7.0);
}

#[test]
fn test_simple_lp() {
    init_tracing();
    let mut model = Model::new();
    let (region, x, y) = diamond(&mut model, false);

    let solution = region.maximize(&x + &y).unwrap();
    assert_close(solution[&x], 2.5);
    assert_close(solution[&y], 2.5);
    assert_close(solution.objective_value(), 5.0);

    let solution = region.maximize(5.0 * &x + &y).unwrap();
    assert_close(solution[&x], 10.0 / 3.0);
    assert_close(solution[&y], 0.0);
}

#[test]
fn test_same_name_variables_are_distinct() {
    let mut model = Model::new();
    let x1 = model.add(VariableDefinition::continuous("x").non_negative());
    let x2 = model.add(VariableDefinition::continuous("x").non_negative());
    assert_eq!(x1.to_string(), x2.to_string());
    assert_ne!(x1.id(), x2.id());

    let region = (&x1 + 3.0 * &x2).leq(10.0) & (3.0 * &x1 + &x2).leq(10.0);
    let solution = region.maximize(5.0 * &x1 + &x2).unwrap();
    assert_close(solution[&x1], 10.0 / 3.0);
    assert_close(solution[&x2], 0.0);
}

#[test]
fn test_simple_integer() {
    let mut model = Model::new();
    let (region, x, y) = diamond(&mut model, true);

    // (2, 2) and (3, 1) are both optimal
    let solution = region.maximize(&x + &y).unwrap();
    assert_close(solution.objective_value(), 4.0);

    let solution = region.maximize(5.0 * &x + &y).unwrap();
    assert_close(solution[&x], 3.0);
    assert_close(solution[&y], 1.0);
}

#[test]
fn test_quotient() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").non_negative());
    let y = model.add(VariableDefinition::continuous("y").non_negative());

    let region = (1.0 / &y / 2.0).geq(1.0) & (&y / (1.0 - &x) * 10.0).leq(10.0);
    let solution = region.maximize(&x + 2.0 * &y).unwrap();
    assert_close(solution[&x], 0.5);
    assert_close(solution[&y], 0.5);
}

#[test]
fn test_or() {
    init_tracing();
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 100.0));
    let y = model.add(VariableDefinition::continuous("y").bounds(0.0, 100.0));

    let wide = Expression::from(&x).leq(10.0) & Expression::from(&y).leq(1.0);
    let tall = Expression::from(&x).leq(3.0) & Expression::from(&y).leq(9.0);
    let region = model.or(wide, tall).unwrap();

    let solution = region.maximize(&x + &y).unwrap();
    assert_close(solution[&x], 3.0);
    assert_close(solution[&y], 9.0);

    let solution = region.maximize(2.0 * &x + &y).unwrap();
    assert_close(solution[&x], 10.0);
    assert_close(solution[&y], 1.0);
}

#[test]
fn test_or_equality() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 100.0));
    let region = model
        .or(Expression::from(&x).eq(3.0), Expression::from(&x).eq(5.0))
        .unwrap();

    assert_close(region.maximize(&x).unwrap()[&x], 5.0);
    assert_close(region.minimize(&x).unwrap()[&x], 3.0);
}

#[test]
fn test_chained_disjunction() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 100.0));
    let inner = model
        .or(Expression::from(&x).eq(3.0), Expression::from(&x).eq(5.0))
        .unwrap();
    // sized from the inner indicators' [0, 1] bounds
    let region = model.or(inner, Expression::from(&x).eq(7.0)).unwrap();

    assert_close(region.maximize(&x).unwrap()[&x], 7.0);
    assert_close(region.minimize(&x).unwrap()[&x], 3.0);

    let middle = &region & Expression::from(&x).geq(4.0) & Expression::from(&x).leq(6.0);
    assert_close(middle.maximize(&x).unwrap()[&x], 5.0);
    assert_close(middle.minimize(&x).unwrap()[&x], 5.0);
}

#[test]
fn test_fixed_big_m_disjunction() {
    let mut model = Model::new().with_big_m(BigM::Fixed(1e3));
    let x = model.continuous("x");
    let either = model
        .or(Expression::from(&x).leq(1.0), Expression::from(&x).geq(5.0))
        .unwrap();
    let region = either & Expression::from(&x).leq(4.0) & Expression::from(&x).geq(-10.0);

    let solution = region.maximize(&x).unwrap();
    assert_close(solution[&x], 1.0);
}

#[test]
fn test_abs() {
    let mut model = Model::new();
    let (region, x, y) = diamond(&mut model, false);

    let distance = model.abs(&x - 7.0);
    let solution = region.minimize(&distance).unwrap();
    assert_close(solution[&x], 10.0 / 3.0);
    assert_close(solution[&y], 0.0);
    assert_close(solution.objective_value(), 7.0 - 10.0 / 3.0);

    let distance = model.abs(&y - 7.0);
    let solution = region.minimize(&distance).unwrap();
    assert_close(solution[&x], 0.0);
    assert_close(solution[&y], 10.0 / 3.0);

    let objective = model.abs(&x - 7.0) + model.abs(&y - 7.0);
    let solution = region.minimize(&objective).unwrap();
    assert_close(solution[&x], 2.5);
    assert_close(solution[&y], 2.5);
}

#[test]
fn test_abs_against_lower_bound() {
    let mut model = Model::new();
    let z = model.add(VariableDefinition::continuous("z").bounds(0.0, 100.0));
    let distance = model.abs(&z - 1.0);

    let solution = Expression::from(&z).geq(5.0).minimize(&distance).unwrap();
    assert_close(solution[&z], 5.0);
    assert_close(solution.evaluate(&distance).unwrap(), 4.0);
}

#[test]
fn test_abs_upper_bounded_in_constraint() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 10.0));
    let distance = model.abs(&x - 4.0);

    let solution = distance.leq(1.5).maximize(&x).unwrap();
    assert_close(solution[&x], 5.5);
}

#[test]
fn test_categorical() {
    let mut model = Model::new();
    let x = model.categorical("x", ["A", "B", "C"]).unwrap();
    let y = model.categorical("y", ["A", "B", "C"]).unwrap();

    let region = x.is(&"C").unwrap() & x.same_as(&y).unwrap();
    let solution = region.minimize(1.0).unwrap();

    assert_eq!(solution.label(&x), Some(&"C"));
    assert_eq!(solution.label(&y), Some(&"C"));
    // internal indicators never show up as decision variables
    assert_eq!(solution.variables().count(), 0);
}

#[test]
fn test_categorical_exclusion() {
    let mut model = Model::new();
    let x = model.categorical("x", ["A", "B", "C"]).unwrap();

    let region = x.is_not(&"A").unwrap() & x.is_not(&"C").unwrap();
    let solution = region.minimize(1.0).unwrap();
    assert_eq!(solution.label(&x), Some(&"B"));

    let selected: f64 = x.variables().map(|var| solution[var]).sum();
    assert_close(selected, 1.0);
}

#[test]
fn test_categorical_checkerboard() {
    init_tracing();
    let n = 4;
    let mut model = Model::new();
    let mut board = Vec::with_capacity(n);
    for _ in 0..n {
        let mut row = Vec::with_capacity(n);
        for _ in 0..n {
            row.push(model.categorical("x", [1, 0]).unwrap());
        }
        board.push(row);
    }

    let mut constraints = Vec::new();
    for col in 0..n {
        for row in 0..n - 1 {
            constraints.push(model.distinct(&board[row][col], &board[row + 1][col]).unwrap());
        }
    }
    for col in 0..n - 1 {
        for row in 0..n {
            constraints.push(model.distinct(&board[row][col], &board[row][col + 1]).unwrap());
        }
    }

    let solution = Region::all(constraints).minimize(1.0).unwrap();
    let cells: Vec<Vec<i32>> = board
        .iter()
        .map(|row| row.iter().map(|cell| *solution.label(cell).unwrap()).collect())
        .collect();

    let even = vec![
        vec![0, 1, 0, 1],
        vec![1, 0, 1, 0],
        vec![0, 1, 0, 1],
        vec![1, 0, 1, 0],
    ];
    let odd = vec![
        vec![1, 0, 1, 0],
        vec![0, 1, 0, 1],
        vec![1, 0, 1, 0],
        vec![0, 1, 0, 1],
    ];
    assert!(cells == even || cells == odd, "not a checkerboard: {cells:?}");
}

#[test]
fn test_switch() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 10.0));
    let y = model.add(VariableDefinition::continuous("y").bounds(0.0, 10.0));

    let region = model
        .switch([
            (Expression::from(&y).leq(5.0), Expression::from(&x).leq(10.0)),
            (Expression::from(&y).leq(10.0), Expression::from(&x).leq(5.0)),
        ])
        .unwrap();

    let objective = model.abs(&x - 9.0) + model.abs(&y - 10.0);
    let solution = region.minimize(&objective).unwrap();
    assert_close(solution[&x], 5.0);
    assert_close(solution[&y], 10.0);

    let objective = model.abs(&x - 10.0) + model.abs(&y - 9.0);
    let solution = region.minimize(&objective).unwrap();
    assert_close(solution[&x], 10.0);
    assert_close(solution[&y], 5.0);
}

#[test]
fn test_conjunction_order_does_not_matter() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").non_negative());
    let y = model.add(VariableDefinition::continuous("y").non_negative());
    let a = (&x + 3.0 * &y).leq(10.0);
    let b = (3.0 * &x + &y).leq(10.0);
    let c = Expression::from(&x).leq(2.0);
    let objective = &x + &y;

    let left = ((&a & &b) & &c).maximize(&objective).unwrap();
    let right = (&a & (&b & &c)).maximize(&objective).unwrap();
    let swapped = (&c & &b & &a).maximize(&objective).unwrap();

    assert_close(left.objective_value(), right.objective_value());
    assert_close(left.objective_value(), swapped.objective_value());
}

#[test]
fn test_solving_twice_is_idempotent() {
    let mut model = Model::new();
    let (region, x, y) = diamond(&mut model, true);
    let objective = 5.0 * &x + &y;

    let first = region.maximize(&objective).unwrap();
    let second = region.maximize(&objective).unwrap();
    assert_close(first.objective_value(), second.objective_value());
    assert_eq!(first.backend(), second.backend());
}

#[test]
fn test_objective_constant_reported() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 2.0));
    let solution = Region::new()
        .solve(&x + 10.0, OptimizationType::Maximize, &microlp())
        .unwrap();
    assert_close(solution.objective_value(), 12.0);
    assert_eq!(solution.backend(), "microlp");
}

#[test]
fn test_unbounded() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").non_negative());
    let err = Expression::from(&x).geq(1.0).maximize(&x).unwrap_err();
    assert!(matches!(err, SolveError::Unbounded), "{err:?}");
}

#[test]
fn test_infeasible() {
    let mut model = Model::new();
    let x = model.continuous("x");
    let region = Expression::from(&x).geq(5.0) & Expression::from(&x).leq(3.0);
    let err = region.minimize(&x).unwrap_err();
    assert!(matches!(err, SolveError::Infeasible), "{err:?}");
}

#[test]
fn test_abs_in_maximization_rejected() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 10.0));
    let distance = model.abs(&x - 3.0);
    let err = Region::new().maximize(&distance).unwrap_err();
    assert!(
        matches!(err, SolveError::Model(ModelError::AbsMisuse { .. })),
        "{err:?}"
    );
}

#[test]
fn test_abs_of_abs_rejected() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(3.0, 3.0));
    let inner = model.abs(&x - 3.0);
    let outer = model.abs(&inner - 1.0);

    let err = Region::new().minimize(&outer).unwrap_err();
    assert!(
        matches!(err, SolveError::Model(ModelError::AbsMisuse { .. })),
        "{err:?}"
    );
}

#[test]
fn test_non_finite_abs_argument_rejected() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 1.0));
    let distance = model.abs(&x * f64::NAN);

    let err = Region::new().minimize(&distance).unwrap_err();
    assert!(
        matches!(err, SolveError::Model(ModelError::MalformedOperand(_))),
        "{err:?}"
    );
}

#[test]
fn test_unsizable_disjunction() {
    let mut model = Model::new();
    let x = model.continuous("x");
    let err = model
        .or(Expression::from(&x).leq(1.0), Expression::from(&x).geq(2.0))
        .unwrap_err();
    assert!(matches!(err, ModelError::UnsizableDisjunction { .. }));
}

#[test]
fn test_missing_backend_reported() {
    let mut model = Model::new();
    let x = model.add(VariableDefinition::continuous("x").bounds(0.0, 1.0));
    let config = SolverConfig::default().with_backend(SolverBackend::Highs);
    let result = Region::new().solve(&x, OptimizationType::Maximize, &config);
    if cfg!(feature = "highs") {
        assert_close(result.unwrap()[&x], 1.0);
    } else {
        assert!(matches!(result, Err(SolveError::Solver(_))));
    }
}
