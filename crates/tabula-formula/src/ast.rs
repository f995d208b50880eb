//! Formula Abstract Syntax Tree types
//!
//! The [`Display`](std::fmt::Display) impl is the canonical serialization:
//! no whitespace, shortest number form, and only the parentheses needed to
//! reproduce the same tree.

use std::fmt;
use tabula_core::Position;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Reference to a cell inside the grid
    CellRef(Position),
    /// Syntactically valid reference that points outside the grid
    OutOfRange(String),
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn is_additive(&self) -> bool {
        matches!(self, BinaryOperator::Add | BinaryOperator::Subtract)
    }

    /// Whether a binary child with operator `child` needs parentheses on the left
    fn wraps_left(&self, child: BinaryOperator) -> bool {
        !self.is_additive() && child.is_additive()
    }

    /// Whether a binary child with operator `child` needs parentheses on the right
    fn wraps_right(&self, child: BinaryOperator) -> bool {
        match self {
            BinaryOperator::Add => false,
            BinaryOperator::Subtract | BinaryOperator::Multiply => child.is_additive(),
            BinaryOperator::Divide => true,
        }
    }
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

impl Expr {
    /// Collect every in-grid reference in the tree, in source order
    pub fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) | Expr::OutOfRange(_) => {}
            Expr::CellRef(pos) => out.push(*pos),
            Expr::UnaryOp { operand, .. } => operand.collect_references(out),
            Expr::BinaryOp { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }

    fn binary_op(&self) -> Option<BinaryOperator> {
        match self {
            Expr::BinaryOp { op, .. } => Some(*op),
            _ => None,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::CellRef(pos) => write!(f, "{}", pos),
            Expr::OutOfRange(text) => f.write_str(text),
            Expr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, operand.binary_op().is_some())
            }
            Expr::BinaryOp { op, left, right } => {
                let wrap_left = left.binary_op().is_some_and(|child| op.wraps_left(child));
                let wrap_right = right.binary_op().is_some_and(|child| op.wraps_right(child));
                write_operand(f, left, wrap_left)?;
                write!(f, "{}", op.symbol())?;
                write_operand(f, right, wrap_right)
            }
        }
    }
}
