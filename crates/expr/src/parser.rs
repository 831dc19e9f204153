//! `nom`-based parsers for the two condition-expression grammars.
//!
//! Both grammars share the same lexical layer (literals, identifiers,
//! parameter references). The simple grammar stops at comparisons and
//! logic; the reflective grammar adds arithmetic, navigation paths into
//! parameter values, and function calls.
use crate::ast::{BinaryOp, Expr, ParamRef, PathSegment, UnaryOp};
use crate::error::ExpressionError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char, multispace0, u64 as nom_u64},
    combinator::{map, opt, recognize},
    multi::{many0, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded},
};
use quill_types::PLACEHOLDER_PREFIX;
use serde_json::{Value, json};

// --- Main Public Parsers ---

/// Parses an expression under the simple grammar: literals, `#name`
/// references, comparisons, `&&`/`||`/`!` and parentheses.
pub fn parse_simple(input: &str) -> Result<Expr, ExpressionError> {
    run(input, simple_or)
}

/// Parses an expression under the reflective grammar: everything the
/// simple grammar has, plus arithmetic, `#name.path[0]` navigation and
/// function calls.
pub fn parse_reflective(input: &str) -> Result<Expr, ExpressionError> {
    run(input, reflective_or)
}

fn run(input: &str, grammar: fn(&str) -> IResult<&str, Expr>) -> Result<Expr, ExpressionError> {
    match grammar(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(ExpressionError::Parse {
            expression: input.to_string(),
            message: format!("parser did not consume all input, remainder: '{rest}'"),
        }),
        Err(e) => Err(ExpressionError::Parse {
            expression: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Operator-precedence tiers ---

/// Folds a left-associative chain of binary operators over the next
/// precedence tier.
fn chain(
    input: &str,
    next: fn(&str) -> IResult<&str, Expr>,
    op: fn(&str) -> IResult<&str, BinaryOp>,
) -> IResult<&str, Expr> {
    let (input, first) = next(input)?;
    let (input, rest) = many0(pair(ws(op), next)).parse(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs)),
    ))
}

fn or_op(input: &str) -> IResult<&str, BinaryOp> {
    map(tag("||"), |_| BinaryOp::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOp> {
    map(tag("&&"), |_| BinaryOp::And).parse(input)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        map(tag("=="), |_| BinaryOp::Eq),
        map(tag("!="), |_| BinaryOp::Ne),
        map(tag(">="), |_| BinaryOp::Ge),
        map(tag("<="), |_| BinaryOp::Le),
        map(tag(">"), |_| BinaryOp::Gt),
        map(tag("<"), |_| BinaryOp::Lt),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        map(tag("+"), |_| BinaryOp::Add),
        map(tag("-"), |_| BinaryOp::Sub),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        map(tag("*"), |_| BinaryOp::Mul),
        map(tag("/"), |_| BinaryOp::Div),
        map(tag("%"), |_| BinaryOp::Rem),
    ))
    .parse(input)
}

/// A comparison does not chain: `a > b > c` is a parse error, caught by
/// the all-input-consumed check in [`run`].
fn comparison(input: &str, next: fn(&str) -> IResult<&str, Expr>) -> IResult<&str, Expr> {
    let (input, lhs) = next(input)?;
    let (input, tail) = opt(pair(ws(comparison_op), next)).parse(input)?;
    Ok((
        input,
        match tail {
            Some((op, rhs)) => Expr::binary(op, lhs, rhs),
            None => lhs,
        },
    ))
}

// --- Simple grammar ---

fn simple_or(input: &str) -> IResult<&str, Expr> {
    chain(input, simple_and, or_op)
}

fn simple_and(input: &str) -> IResult<&str, Expr> {
    chain(input, simple_comparison, and_op)
}

fn simple_comparison(input: &str) -> IResult<&str, Expr> {
    comparison(input, simple_unary)
}

fn simple_unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('!')), simple_unary), |e| {
            Expr::unary(UnaryOp::Not, e)
        }),
        simple_primary,
    ))
    .parse(input)
}

fn simple_primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        map(literal, Expr::Literal),
        simple_param,
        delimited(ws(char('(')), simple_or, ws(char(')'))),
    )))
    .parse(input)
}

/// A bare `#name` reference; the simple grammar has no navigation paths.
fn simple_param(input: &str) -> IResult<&str, Expr> {
    map(preceded(char(PLACEHOLDER_PREFIX), identifier), |name| {
        Expr::Param(ParamRef {
            name: name.to_string(),
            path: Vec::new(),
        })
    })
    .parse(input)
}

// --- Reflective grammar ---

fn reflective_or(input: &str) -> IResult<&str, Expr> {
    chain(input, reflective_and, or_op)
}

fn reflective_and(input: &str) -> IResult<&str, Expr> {
    chain(input, reflective_comparison, and_op)
}

fn reflective_comparison(input: &str) -> IResult<&str, Expr> {
    comparison(input, additive)
}

fn additive(input: &str) -> IResult<&str, Expr> {
    chain(input, multiplicative, additive_op)
}

fn multiplicative(input: &str) -> IResult<&str, Expr> {
    chain(input, reflective_unary, multiplicative_op)
}

fn reflective_unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('!')), reflective_unary), |e| {
            Expr::unary(UnaryOp::Not, e)
        }),
        map(preceded(ws(char('-')), reflective_unary), |e| {
            Expr::unary(UnaryOp::Neg, e)
        }),
        reflective_primary,
    ))
    .parse(input)
}

fn reflective_primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        map(literal, Expr::Literal),
        function_call, // Must be before param/parens to parse `func()` not `func`
        reflective_param,
        delimited(ws(char('(')), reflective_or, ws(char(')'))),
    )))
    .parse(input)
}

/// A `#name` reference followed by optional `.key` / `[index]` segments.
fn reflective_param(input: &str) -> IResult<&str, Expr> {
    let (input, name) = preceded(char(PLACEHOLDER_PREFIX), identifier).parse(input)?;
    let (input, path) = many0(path_segment).parse(input)?;
    Ok((
        input,
        Expr::Param(ParamRef {
            name: name.to_string(),
            path,
        }),
    ))
}

fn path_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((
        map(preceded(char('.'), identifier), |s| {
            PathSegment::Key(s.to_string())
        }),
        map(delimited(char('['), nom_u64, char(']')), |i| {
            PathSegment::Index(i as usize)
        }),
    ))
    .parse(input)
}

fn function_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), reflective_or),
        char(')'),
    )
    .parse(input)?;

    Ok((
        input,
        Expr::Call {
            name: name.to_string(),
            args,
        },
    ))
}

// --- Shared lexical layer ---

fn boolean(input: &str) -> IResult<&str, Value> {
    alt((
        map(tag("true"), |_| json!(true)),
        map(tag("false"), |_| json!(false)),
    ))
    .parse(input)
}

fn null(input: &str) -> IResult<&str, Value> {
    map(tag("null"), |_| json!(null)).parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Value> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| json!(s),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map(double, Value::from).parse(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((null, boolean, number, string_literal)).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
