//! Statement inputs.
//!
//! Inputs are written in prefix form: `forward + :len "2` moves forward by `:len + 2`, and
//! `if and < xcor 10 > xcor 0 {` tests `0 < xcor < 10`. Every operator takes exactly two inputs,
//! so no parentheses or precedence rules are needed.

use crate::{
    error::EvalError,
    lexer::{number, Lexeme, Token},
    store::VariableStore,
    turtle::PenState,
    value::Value,
};

/// The state that inputs are allowed to read.
#[derive(Copy, Clone)]
pub struct Ctx<'s> {
    pub store: &'s VariableStore,
    pub pen: &'s PenState,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    And,
    Or,
}

impl BinOp {
    pub fn from_token(tok: Token) -> Option<BinOp> {
        Some(match tok {
            Token::Plus => BinOp::Add,
            Token::Minus => BinOp::Sub,
            Token::Star => BinOp::Mul,
            Token::Slash => BinOp::Div,
            Token::Eq => BinOp::Eq,
            Token::Ne => BinOp::Ne,
            Token::Lt => BinOp::Lt,
            Token::Gt => BinOp::Gt,
            Token::And => BinOp::And,
            Token::Or => BinOp::Or,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    pub fn eval(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        let mismatch = |expected, arg| EvalError::TypeMismatch {
            proc: self.name().to_owned(),
            expected,
            arg,
        };
        let num = |v: Value| f64::try_from(v).map_err(|arg| mismatch("number", arg));
        let boolean = |v: Value| bool::try_from(v).map_err(|arg| mismatch("boolean", arg));

        Ok(match self {
            BinOp::Add => Value::Num(num(lhs)? + num(rhs)?),
            BinOp::Sub => Value::Num(num(lhs)? - num(rhs)?),
            BinOp::Mul => Value::Num(num(lhs)? * num(rhs)?),
            BinOp::Div => {
                let (l, r) = (num(lhs)?, num(rhs)?);
                if r == 0.0 {
                    return Err(EvalError::DivideByZero {
                        proc: self.name().to_owned(),
                        lhs: l,
                    });
                }
                Value::Num(l / r)
            }
            BinOp::Lt => Value::Bool(num(lhs)? < num(rhs)?),
            BinOp::Gt => Value::Bool(num(lhs)? > num(rhs)?),
            BinOp::Eq | BinOp::Ne => {
                if lhs.kind() != rhs.kind() {
                    return Err(mismatch(lhs.kind(), rhs));
                }
                Value::Bool((lhs == rhs) == (*self == BinOp::Eq))
            }
            BinOp::And => Value::Bool(boolean(lhs)? && boolean(rhs)?),
            BinOp::Or => Value::Bool(boolean(lhs)? || boolean(rhs)?),
        })
    }
}

/// The value of a quoted word: `"10` is a number, `"true` a boolean, anything else is text.
pub fn literal(text: &str) -> Value {
    if let Some(x) = number(text) {
        Value::Num(x)
    } else if text.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if text.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else {
        Value::Text(text.to_owned())
    }
}

enum Term {
    Value(Value),
    Op(BinOp),
}

/// The not-yet-consumed inputs of a statement.
pub struct Operands<'l, 'a> {
    proc: &'a str,
    rest: &'l [Lexeme<'a>],
}

impl<'l, 'a> Operands<'l, 'a> {
    /// `proc` names the statement in error messages.
    pub fn new(proc: &'a str, rest: &'l [Lexeme<'a>]) -> Self {
        Operands { proc, rest }
    }

    pub fn peek(&self) -> Option<&Lexeme<'a>> {
        self.rest.first()
    }

    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    fn next_lexeme(&mut self) -> Result<Lexeme<'a>, EvalError> {
        let (first, rest) = self
            .rest
            .split_first()
            .ok_or_else(|| EvalError::NotEnoughInputs {
                proc: self.proc.to_owned(),
            })?;
        self.rest = rest;
        Ok(*first)
    }

    fn bad_input(&self, lex: &Lexeme) -> EvalError {
        EvalError::BadInput {
            proc: self.proc.to_owned(),
            word: lex.word.to_owned(),
        }
    }

    /// Take one input without evaluating it.
    pub fn next_raw(&mut self) -> Result<Lexeme<'a>, EvalError> {
        self.next_lexeme()
    }

    /// Take a quoted name, like the `"len` in `make "len 10`.
    pub fn next_name(&mut self) -> Result<&'a str, EvalError> {
        let lex = self.next_lexeme()?;
        lex.quoted().ok_or_else(|| self.bad_input(&lex))
    }

    fn term(&self, lex: &Lexeme<'a>, ctx: Ctx) -> Result<Term, EvalError> {
        let val = match lex.token {
            Token::Number => Value::Num(number(lex.word).ok_or_else(|| self.bad_input(lex))?),
            Token::Word => literal(lex.quoted().unwrap_or_default()),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Var => ctx.store.resolve(&Value::Text(lex.word.to_owned()))?,
            Token::XCor => Value::Num(ctx.pen.pos.x),
            Token::YCor => Value::Num(ctx.pen.pos.y),
            Token::Heading => Value::Num(ctx.pen.heading),
            Token::Color => Value::Num(ctx.pen.color as f64),
            tok => match BinOp::from_token(tok) {
                Some(op) => return Ok(Term::Op(op)),
                None => return Err(self.bad_input(lex)),
            },
        };
        Ok(Term::Value(val))
    }

    /// Evaluate one input, resolving any variable references in it.
    ///
    /// Operators waiting for their inputs are kept on a heap stack, so nesting depth is only
    /// limited by the length of the line.
    pub fn next_value(&mut self, ctx: Ctx) -> Result<Value, EvalError> {
        // Each pending operator, with its left input once that is known.
        let mut pending: Vec<(BinOp, Option<Value>)> = Vec::new();
        loop {
            let lex = self.next_lexeme()?;
            let mut val = match self.term(&lex, ctx)? {
                Term::Op(op) => {
                    pending.push((op, None));
                    continue;
                }
                Term::Value(v) => v,
            };
            loop {
                match pending.pop() {
                    None => return Ok(val),
                    Some((op, None)) => {
                        pending.push((op, Some(val)));
                        break;
                    }
                    Some((op, Some(lhs))) => val = op.eval(lhs, val)?,
                }
            }
        }
    }

    pub fn next_num(&mut self, ctx: Ctx) -> Result<f64, EvalError> {
        let val = self.next_value(ctx)?;
        f64::try_from(val).map_err(|arg| EvalError::TypeMismatch {
            proc: self.proc.to_owned(),
            expected: "number",
            arg,
        })
    }

    pub fn next_bool(&mut self, ctx: Ctx) -> Result<bool, EvalError> {
        let val = self.next_value(ctx)?;
        bool::try_from(val).map_err(|arg| EvalError::TypeMismatch {
            proc: self.proc.to_owned(),
            expected: "boolean",
            arg,
        })
    }

    /// Fail if there are inputs left over.
    pub fn finish(self) -> Result<(), EvalError> {
        match self.rest.first() {
            Some(lex) => Err(EvalError::UnusedInput {
                word: lex.word.to_owned(),
            }),
            None => Ok(()),
        }
    }
}
