//! Tree-walking evaluation of model code over namespaces.
//!
//! The [`Evaluator`] runs parsed expressions and statements against two
//! layers of bindings: the variables supplied by the caller, which take
//! precedence, and the resolved namespace of the code.
//!
//! Two modes share one code path:
//! - [`Mode::Numeric`] drops every dimension on lookup and computes plain
//!   SI magnitudes
//! - [`Mode::Checked`] keeps dimensions, so inconsistent sums, comparisons
//!   and function arguments fail with a dimension mismatch

use modelcode_core::{Comparison, Dimension, DimensionMismatchError, EvalError, Value};
use modelcode_parser::{
    AssignStmt, BinaryExpr, BinaryOp, CallExpr, Expr, LiteralKind, Stmt, UnaryExpr, UnaryOp,
};
use tracing::trace;

use crate::{Namespace, VariableUnits};

type Result<T> = std::result::Result<T, EvalError>;

/// How dimensions are treated during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Dimensions are dropped; values are SI magnitudes.
    Numeric,
    /// Dimensions are propagated and checked.
    Checked,
}

/// Evaluates expressions against variables layered over a namespace.
pub(crate) struct Evaluator<'a> {
    namespace: &'a Namespace,
    variables: &'a Namespace,
    mode: Mode,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(namespace: &'a Namespace, variables: &'a Namespace, mode: Mode) -> Self {
        Self {
            namespace,
            variables,
            mode,
        }
    }

    /// Evaluate an expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn evaluate(&self, expr: &Expr<'_>) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => Ok(match lit.kind {
                LiteralKind::Int(v) => Value::scalar(v as f64),
                LiteralKind::Float(v) => Value::scalar(v),
                LiteralKind::Bool(b) => Value::Bool(b),
            }),
            Expr::Ident(ident) => self.lookup(ident.name),
            Expr::Paren(paren) => self.evaluate(paren.expr),
            Expr::Unary(unary) => self.evaluate_unary(unary),
            Expr::Binary(binary) => self.evaluate_binary(binary),
            Expr::Call(call) => self.evaluate_call(call),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        let value = self
            .variables
            .get(name)
            .or_else(|| self.namespace.get(name))
            .ok_or_else(|| EvalError::Undefined {
                name: name.to_string(),
            })?;
        Ok(match self.mode {
            Mode::Numeric => value.without_dimension(),
            Mode::Checked => value.as_ref().clone(),
        })
    }

    fn evaluate_unary(&self, unary: &UnaryExpr<'_>) -> Result<Value> {
        let operand = self.evaluate(unary.operand)?;
        match unary.op {
            UnaryOp::Neg => operand.neg(),
            UnaryOp::Plus => match operand {
                Value::Function(f) => Err(EvalError::type_error(
                    "unary +",
                    format!("function '{}' used as a number", f.name()),
                )),
                other => Ok(other),
            },
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy()?)),
        }
    }

    fn evaluate_binary(&self, binary: &BinaryExpr<'_>) -> Result<Value> {
        if binary.op.is_logical() {
            return self.evaluate_logical(binary);
        }
        let lhs = self.evaluate(binary.left)?;
        let rhs = self.evaluate(binary.right)?;
        apply_binary(binary.op, &lhs, &rhs)
    }

    /// `and` / `or`. Numeric evaluation short-circuits; checked evaluation
    /// visits both operands so every branch is unit checked.
    fn evaluate_logical(&self, binary: &BinaryExpr<'_>) -> Result<Value> {
        let lhs = self.evaluate(binary.left)?.is_truthy()?;
        let decided = match binary.op {
            BinaryOp::And => !lhs,
            _ => lhs,
        };
        if decided && self.mode == Mode::Numeric {
            return Ok(Value::Bool(lhs));
        }
        let rhs = self.evaluate(binary.right)?.is_truthy()?;
        Ok(Value::Bool(if decided { lhs } else { rhs }))
    }

    fn evaluate_call(&self, call: &CallExpr<'_>) -> Result<Value> {
        let callee = self.lookup(call.callee.name)?;
        let Value::Function(function) = callee else {
            return Err(EvalError::NotCallable {
                name: call.callee.name.to_string(),
            });
        };
        let args = call
            .args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>>>()?;
        trace!(function = function.name(), args = args.len(), "call");
        function.call(&args)
    }

    /// Run one statement, returning the name and new value of an assignment.
    pub(crate) fn execute(&self, stmt: &Stmt<'_>) -> Result<Option<(String, Value)>> {
        match stmt {
            Stmt::Expr(expr) => {
                self.evaluate(expr.expr)?;
                Ok(None)
            }
            Stmt::Assign(assign) => {
                let value = self.assigned_value(assign)?;
                Ok(Some((assign.target.name.to_string(), value)))
            }
        }
    }

    fn assigned_value(&self, assign: &AssignStmt<'_>) -> Result<Value> {
        let rhs = self.evaluate(assign.value)?;
        match assign.op.binary_op() {
            None => Ok(rhs),
            Some(op) => {
                let current = self.lookup(assign.target.name)?;
                apply_binary(op, &current, &rhs)
            }
        }
    }
}

fn apply_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    match op {
        BinaryOp::Add => lhs.add(rhs),
        BinaryOp::Sub => lhs.sub(rhs),
        BinaryOp::Mul => lhs.mul(rhs),
        BinaryOp::Div => lhs.div(rhs),
        BinaryOp::Mod => lhs.rem(rhs),
        BinaryOp::Pow => lhs.pow(rhs),
        BinaryOp::Equal => lhs.compare(Comparison::Equal, rhs),
        BinaryOp::NotEqual => lhs.compare(Comparison::NotEqual, rhs),
        BinaryOp::Less => lhs.compare(Comparison::Less, rhs),
        BinaryOp::LessEqual => lhs.compare(Comparison::LessEqual, rhs),
        BinaryOp::Greater => lhs.compare(Comparison::Greater, rhs),
        BinaryOp::GreaterEqual => lhs.compare(Comparison::GreaterEqual, rhs),
        BinaryOp::And | BinaryOp::Or => Ok(Value::Bool(lhs.is_truthy()? && rhs.is_truthy()?)),
    }
}

/// Check the dimensions of one statement against the variables' units.
///
/// `=`, `+=` and `-=` need a right-hand side with the target's dimension;
/// `*=` and `/=` need a dimensionless one. Returns the offending target
/// name when the target is not a variable.
pub(crate) fn check_statement(
    namespace: &Namespace,
    stand_ins: &Namespace,
    units: &VariableUnits,
    stmt: &Stmt<'_>,
) -> std::result::Result<(), StatementCheck> {
    let evaluator = Evaluator::new(namespace, stand_ins, Mode::Checked);
    let assign = match stmt {
        Stmt::Expr(expr) => {
            evaluator.evaluate(expr.expr)?;
            return Ok(());
        }
        Stmt::Assign(assign) => assign,
    };
    let target = assign.target.name;
    let Some(&target_dim) = units.get(target) else {
        return Err(StatementCheck::UnknownTarget(target.to_string()));
    };
    let rhs_dim = evaluator
        .evaluate(assign.value)?
        .dimension()
        .unwrap_or(Dimension::DIMENSIONLESS);

    let (expected, message) = match assign.op.binary_op() {
        Some(BinaryOp::Mul | BinaryOp::Div) => {
            (Dimension::DIMENSIONLESS, format!("Scaling factor in '{}'", assign.op))
        }
        _ => (target_dim, format!("Assignment to {target}")),
    };
    if rhs_dim != expected {
        return Err(EvalError::from(DimensionMismatchError::new(message, rhs_dim, expected)).into());
    }
    Ok(())
}

/// Failure of a statement unit check.
pub(crate) enum StatementCheck {
    /// Evaluation failed, including dimension mismatches.
    Eval(EvalError),
    /// The assignment target is not a variable.
    UnknownTarget(String),
}

impl From<EvalError> for StatementCheck {
    fn from(error: EvalError) -> Self {
        StatementCheck::Eval(error)
    }
}
