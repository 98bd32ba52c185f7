//! Canonical text for the integer expressions used as sizes and subscripts.
//!
//! Expressions are parsed with `syn` (the arithmetic subset shared by Rust and C++)
//! and normalized into a polynomial with integer coefficients.
//! Whatever cannot be expressed as a polynomial (division by a non-constant, subscripts)
//! is kept as an opaque atom, itself printed in canonical form.
//!
//! Every call parses its input with `syn::parse_str`. With the `span-locations` feature of
//! `proc-macro2`, each parsed text is also appended to a thread-local source map that is never
//! freed, so memory grows with the total length of the expressions parsed on a thread.
//! Callers run these functions once per item of a format, not once per rendered line.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use quote::ToTokens;
use syn::{BinOp, Expr, Lit, UnOp};

use crate::error::ExprError;

/// Returns the canonical text of `expr`.
///
/// ```
/// # use iotemplate_cpp::expr::simplify;
/// assert_eq!(simplify("i + 1 - (1)").unwrap(), "i");
/// assert_eq!(simplify("2 * (N + 1) - N").unwrap(), "N + 2");
/// ```
pub fn simplify(expr: &str) -> Result<String, ExprError> {
    canonicalize(&parse(expr)?)
}

/// Returns the canonical text of an already parsed expression.
pub fn canonicalize(expr: &Expr) -> Result<String, ExprError> {
    Ok(Lower { root: expr }.expr(expr)?.to_string())
}

/// Names of the variables `expr` depends on, after simplification.
pub fn free_vars(expr: &str) -> Result<BTreeSet<String>, ExprError> {
    let parsed = parse(expr)?;
    Ok(Lower { root: &parsed }.expr(&parsed)?.vars())
}

/// If `expr` is `var + offset`, with `offset` not depending on `var`, returns `offset`.
pub fn offset_from(expr: &str, var: &str) -> Result<Option<String>, ExprError> {
    let parsed = parse(expr)?;
    let mut poly = Lower { root: &parsed }.expr(&parsed)?;

    let monomial = vec![Atom::var(var)];
    if poly.terms.get(&monomial) != Some(&1) {
        return Ok(None);
    }
    poly.terms.remove(&monomial);

    if poly.vars().contains(var) {
        Ok(None)
    } else {
        Ok(Some(poly.to_string()))
    }
}

fn parse(expr: &str) -> Result<Expr, ExprError> {
    syn::parse_str(expr).map_err(|e| ExprError::Parse {
        expr: expr.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Atom {
    text: String,
    /// Whether the text contains a binary operator, and needs parentheses inside a product.
    compound: bool,
    vars: BTreeSet<String>,
}

impl Atom {
    fn var(name: &str) -> Atom {
        Atom {
            text: name.to_string(),
            compound: false,
            vars: std::iter::once(name.to_string()).collect(),
        }
    }
}

/// Sorted product of atoms. The empty product is the constant term.
type Monomial = Vec<Atom>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Poly {
    /// Non-zero coefficients only.
    terms: BTreeMap<Monomial, i64>,
}

impl Poly {
    fn constant(value: i64) -> Poly {
        let mut terms = BTreeMap::new();
        if value != 0 {
            terms.insert(Monomial::new(), value);
        }
        Poly { terms }
    }

    fn atom(atom: Atom) -> Poly {
        let mut terms = BTreeMap::new();
        terms.insert(vec![atom], 1);
        Poly { terms }
    }

    fn as_constant(&self) -> Option<i64> {
        match self.terms.len() {
            0 => Some(0),
            1 => self.terms.get(&Monomial::new()).copied(),
            _ => None,
        }
    }

    fn add(mut self, other: Poly) -> Option<Poly> {
        for (monomial, coef) in other.terms {
            let sum = self.terms.entry(monomial).or_insert(0);
            *sum = sum.checked_add(coef)?;
        }
        self.terms.retain(|_, coef| *coef != 0);
        Some(self)
    }

    fn scale(self, factor: i64) -> Option<Poly> {
        let mut terms = BTreeMap::new();
        if factor != 0 {
            for (monomial, coef) in self.terms {
                terms.insert(monomial, coef.checked_mul(factor)?);
            }
        }
        Some(Poly { terms })
    }

    fn mul(&self, other: &Poly) -> Option<Poly> {
        let mut product = Poly::default();
        for (left, a) in &self.terms {
            for (right, b) in &other.terms {
                let mut monomial: Monomial = left.iter().chain(right).cloned().collect();
                monomial.sort();
                let mut terms = BTreeMap::new();
                terms.insert(monomial, a.checked_mul(*b)?);
                product = product.add(Poly { terms })?;
            }
        }
        Some(product)
    }

    fn vars(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flatten()
            .flat_map(|atom| atom.vars.iter().cloned())
            .collect()
    }

    /// Can be used as an operand of `/` or `%` without parentheses.
    fn is_simple(&self) -> bool {
        match self.terms.iter().next() {
            None => true,
            Some((monomial, coef)) if self.terms.len() == 1 => match monomial.as_slice() {
                [] => *coef > 0,
                [atom] => *coef == 1 && !atom.compound,
                _ => false,
            },
            Some(_) => false,
        }
    }

    fn operand(&self) -> String {
        if self.is_simple() {
            self.to_string()
        } else {
            format!("({})", self)
        }
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constant = self.terms.get_key_value(&Monomial::new());
        let terms = self
            .terms
            .iter()
            .filter(|(monomial, _)| !monomial.is_empty())
            .chain(constant);

        let mut first = true;
        for (monomial, &coef) in terms {
            match (first, coef < 0) {
                (true, true) => f.write_str("-")?,
                (true, false) => (),
                (false, true) => f.write_str(" - ")?,
                (false, false) => f.write_str(" + ")?,
            }
            first = false;

            let abs = coef.unsigned_abs();
            if monomial.is_empty() {
                write!(f, "{}", abs)?;
                continue;
            }

            let product = abs != 1 || monomial.len() > 1;
            if abs != 1 {
                write!(f, "{} * ", abs)?;
            }
            for (k, atom) in monomial.iter().enumerate() {
                if k > 0 {
                    f.write_str(" * ")?;
                }
                if product && atom.compound {
                    write!(f, "({})", atom.text)?;
                } else {
                    f.write_str(&atom.text)?;
                }
            }
        }

        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum DivOp {
    Div,
    Rem,
}

struct Lower<'a> {
    root: &'a Expr,
}

impl Lower<'_> {
    fn source(&self) -> String {
        self.root.to_token_stream().to_string()
    }

    fn unsupported(&self, message: &str) -> ExprError {
        ExprError::Parse {
            expr: self.source(),
            message: message.to_string(),
        }
    }

    fn checked(&self, poly: Option<Poly>) -> Result<Poly, ExprError> {
        poly.ok_or_else(|| ExprError::Overflow {
            expr: self.source(),
        })
    }

    fn expr(&self, expr: &Expr) -> Result<Poly, ExprError> {
        match expr {
            Expr::Lit(lit) => match &lit.lit {
                Lit::Int(int) => int
                    .base10_parse::<i64>()
                    .map(Poly::constant)
                    .map_err(|e| self.unsupported(&e.to_string())),
                _ => Err(self.unsupported("expected an integer literal")),
            },
            Expr::Path(_) | Expr::Index(_) => Ok(Poly::atom(self.place(expr)?)),
            Expr::Paren(paren) => self.expr(&paren.expr),
            Expr::Group(group) => self.expr(&group.expr),
            Expr::Unary(unary) => match unary.op {
                UnOp::Neg(_) => self.checked(self.expr(&unary.expr)?.scale(-1)),
                _ => Err(self.unsupported("unsupported unary operator")),
            },
            Expr::Binary(binary) => {
                let left = self.expr(&binary.left)?;
                let right = self.expr(&binary.right)?;
                match binary.op {
                    BinOp::Add(_) => self.checked(left.add(right)),
                    BinOp::Sub(_) => {
                        let right = self.checked(right.scale(-1))?;
                        self.checked(left.add(right))
                    }
                    BinOp::Mul(_) => self.checked(left.mul(&right)),
                    BinOp::Div(_) => self.div(left, right, DivOp::Div),
                    BinOp::Rem(_) => self.div(left, right, DivOp::Rem),
                    _ => Err(self.unsupported("unsupported binary operator")),
                }
            }
            _ => Err(self.unsupported("unsupported expression")),
        }
    }

    /// A variable, possibly subscripted.
    fn place(&self, expr: &Expr) -> Result<Atom, ExprError> {
        match expr {
            Expr::Path(path) => match path.path.get_ident() {
                Some(ident) => Ok(Atom::var(&ident.to_string())),
                None => Err(self.unsupported("expected a variable name")),
            },
            Expr::Index(index) => {
                let array = self.place(&index.expr)?;
                let subscript = self.expr(&index.index)?;
                Ok(Atom {
                    text: format!("{}[{}]", array.text, subscript),
                    compound: false,
                    vars: array.vars.into_iter().chain(subscript.vars()).collect(),
                })
            }
            Expr::Paren(paren) => self.place(&paren.expr),
            _ => Err(self.unsupported("only variables can be subscripted")),
        }
    }

    fn div(&self, left: Poly, right: Poly, op: DivOp) -> Result<Poly, ExprError> {
        match (left.as_constant(), right.as_constant()) {
            (_, Some(0)) => Err(ExprError::DivisionByZero {
                expr: self.source(),
            }),
            (Some(a), Some(b)) => {
                // Truncating division, as in C++.
                let value = match op {
                    DivOp::Div => a.checked_div(b),
                    DivOp::Rem => a.checked_rem(b),
                };
                self.checked(value.map(Poly::constant))
            }
            (_, Some(1)) => match op {
                DivOp::Div => Ok(left),
                DivOp::Rem => Ok(Poly::default()),
            },
            _ => {
                let symbol = match op {
                    DivOp::Div => "/",
                    DivOp::Rem => "%",
                };
                Ok(Poly::atom(Atom {
                    text: format!("{} {} {}", left.operand(), symbol, right.operand()),
                    compound: true,
                    vars: left.vars().into_iter().chain(right.vars()).collect(),
                }))
            }
        }
    }
}
