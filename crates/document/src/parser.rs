//! A `nom`-based parser for relaxed MongoDB-style extended JSON.
//!
//! The grammar is deliberately looser than strict JSON to match how
//! query templates are written: object keys may be bare identifiers
//! (`$match`, `_id`), strings may use single or double quotes, and
//! whitespace is free. Placeholder substitution happens in the same
//! pass: a string scalar equal to `#name` is replaced by the named
//! parameter's value as the token is produced.
use crate::encode::encode_scalar;
use crate::error::DocumentError;
use crate::prune;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{map, opt, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair},
};
use quill_types::{ParameterMap, placeholder_name};
use serde_json::{Map, Number, Value};

/// Parses templated text into a document, substituting placeholders
/// and, when `escape_empty` is set, pruning empty fields and elements.
///
/// Substitution is best-effort: a placeholder whose name is absent from
/// the parameters stays as its literal string. The root of the document
/// survives pruning even when everything inside it is removed.
pub fn parse(
    text: &str,
    parameters: &ParameterMap,
    escape_empty: bool,
) -> Result<Value, DocumentError> {
    let parser = DocParser { parameters };
    let document = match parser.root(text) {
        Ok(("", value)) => value,
        Ok((rest, _)) => {
            return Err(DocumentError::Syntax {
                message: format!("unexpected trailing input: '{rest}'"),
            });
        }
        Err(e) => {
            return Err(DocumentError::Syntax {
                message: e.to_string(),
            });
        }
    };
    Ok(if escape_empty {
        prune::prune_root(document)
    } else {
        document
    })
}

/// Per-call parser state: the active parameters for substitution.
/// Each render call allocates its own instance, so concurrent parses
/// share nothing.
struct DocParser<'p> {
    parameters: &'p ParameterMap,
}

impl DocParser<'_> {
    fn root<'a>(&self, input: &'a str) -> IResult<&'a str, Value> {
        ws(|i| self.value(i)).parse(input)
    }

    fn value<'a>(&self, input: &'a str) -> IResult<&'a str, Value> {
        alt((
            |i| self.object(i),
            |i| self.array(i),
            |i| self.string_value(i),
            number,
            boolean,
            null_value,
        ))
        .parse(input)
    }

    fn object<'a>(&self, input: &'a str) -> IResult<&'a str, Value> {
        map(
            delimited(
                ws(char('{')),
                separated_list0(ws(char(',')), |i| self.member(i)),
                ws(char('}')),
            ),
            |members| {
                let mut object = Map::new();
                for (key, value) in members {
                    object.insert(key, value);
                }
                Value::Object(object)
            },
        )
        .parse(input)
    }

    fn member<'a>(&self, input: &'a str) -> IResult<&'a str, (String, Value)> {
        let (input, key) = ws(object_key).parse(input)?;
        let (input, _) = char(':').parse(input)?;
        let (input, value) = ws(|i| self.value(i)).parse(input)?;
        Ok((input, (key, value)))
    }

    fn array<'a>(&self, input: &'a str) -> IResult<&'a str, Value> {
        map(
            delimited(
                ws(char('[')),
                separated_list0(ws(char(',')), |i| self.value(i)),
                ws(char(']')),
            ),
            Value::Array,
        )
        .parse(input)
    }

    /// A quoted string token, substituted if it is placeholder-shaped
    /// and the name resolves. The parameter value may itself be a
    /// nested document, not just a scalar.
    fn string_value<'a>(&self, input: &'a str) -> IResult<&'a str, Value> {
        let (rest, token) = alt((double_quoted, single_quoted)).parse(input)?;
        if let Some(name) = placeholder_name(&token) {
            if let Some(value) = self.parameters.get(name) {
                return Ok((rest, encode_scalar(value.clone())));
            }
        }
        Ok((rest, Value::String(token)))
    }
}

// --- Token parsers ---

/// Bare object keys: identifiers extended with `$` and `_`, covering
/// operator keys like `$match` without quoting.
fn object_key(input: &str) -> IResult<&str, String> {
    alt((double_quoted, single_quoted, bare_key)).parse(input)
}

fn bare_key(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
            take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
        )),
        str::to_string,
    )
    .parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    quoted(input, '"')
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    quoted(input, '\'')
}

/// A quoted string with the usual backslash escapes, including
/// `\uXXXX` with surrogate pairs.
fn quoted(input: &str, quote: char) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c == quote => {}
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
    let mut out = String::new();
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            return Ok((&input[idx + c.len_utf8()..], out));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escape = match chars.next() {
            Some((_, e)) => e,
            None => return Err(nom::Err::Error(Error::new(input, ErrorKind::Escaped))),
        };
        match escape {
            '"' | '\'' | '\\' | '/' => out.push(escape),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'u' => match unicode_escape(&mut chars) {
                Some(c) => out.push(c),
                None => {
                    return Err(nom::Err::Error(Error::new(input, ErrorKind::Escaped)));
                }
            },
            _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Escaped))),
        }
    }
    // Unterminated string.
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn unicode_escape(chars: &mut std::str::CharIndices) -> Option<char> {
    let high = hex4(chars)?;
    if (0xD800..=0xDBFF).contains(&high) {
        // Surrogate pair: expect a trailing `\uDCxx` low half.
        if chars.next()?.1 != '\\' || chars.next()?.1 != 'u' {
            return None;
        }
        let low = hex4(chars)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined);
    }
    char::from_u32(high)
}

fn hex4(chars: &mut std::str::CharIndices) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars.next()?.1.to_digit(16)?;
        value = value * 16 + digit;
    }
    Some(value)
}

/// Numbers keep their integer representation when they have no
/// fraction or exponent, falling back to float on i64 overflow.
fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize((
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
        opt((
            one_of("eE"),
            opt(one_of("+-")),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let parsed = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        match text.parse::<i64>() {
            Ok(i) => Some(Number::from(i)),
            Err(_) => text.parse::<f64>().ok().and_then(Number::from_f64),
        }
    };
    match parsed {
        Some(n) => Ok((rest, Value::Number(n))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

fn boolean(input: &str) -> IResult<&str, Value> {
    alt((
        map(tag("true"), |_| Value::Bool(true)),
        map(tag("false"), |_| Value::Bool(false)),
    ))
    .parse(input)
}

fn null_value(input: &str) -> IResult<&str, Value> {
    map(tag("null"), |_| Value::Null).parse(input)
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parses_relaxed_syntax() {
        let doc = parse(
            "{ $match: { status: 'OPEN', \"count\": 3 }, _id: null }",
            &ParameterMap::new(),
            false,
        )
        .unwrap();
        assert_eq!(
            doc,
            json!({ "$match": { "status": "OPEN", "count": 3 }, "_id": null })
        );
    }

    #[test]
    fn preserves_field_order() {
        let doc = parse(
            "{ zebra: 1, alpha: 2, mango: 3 }",
            &ParameterMap::new(),
            false,
        )
        .unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zebra", "alpha", "mango"]);
    }

    #[test]
    fn integers_stay_integers() {
        let doc = parse("{ a: 5, b: 5.0, c: -7 }", &ParameterMap::new(), false).unwrap();
        assert_eq!(doc["a"], json!(5));
        assert_eq!(doc["b"], json!(5.0));
        assert_eq!(doc["c"], json!(-7));
    }

    #[test]
    fn string_escapes() {
        let doc = parse(
            r#"{ a: "quote \" backslash \\ newline \n", b: "A😀" }"#,
            &ParameterMap::new(),
            false,
        )
        .unwrap();
        assert_eq!(doc["a"], json!("quote \" backslash \\ newline \n"));
        assert_eq!(doc["b"], json!("A😀"));
    }

    #[test]
    fn substitutes_scalar_placeholder() {
        let doc = parse(
            r##"{"name": "#who", "limit": "#n"}"##,
            &params(&[("who", json!("ada")), ("n", json!(25))]),
            false,
        )
        .unwrap();
        assert_eq!(doc, json!({ "name": "ada", "limit": 25 }));
    }

    #[test]
    fn substitutes_nested_document_placeholder() {
        let doc = parse(
            r##"{"filter": "#filter"}"##,
            &params(&[("filter", json!({ "age": { "$gt": 21 } }))]),
            false,
        )
        .unwrap();
        assert_eq!(doc, json!({ "filter": { "age": { "$gt": 21 } } }));
    }

    #[test]
    fn absent_placeholder_stays_literal() {
        let doc = parse(r##"{"name": "#who"}"##, &ParameterMap::new(), false).unwrap();
        assert_eq!(doc, json!({ "name": "#who" }));
    }

    #[test]
    fn non_placeholder_strings_pass_through() {
        // Only a whole-token match is a placeholder; a `#` mid-string
        // is just text.
        let doc = parse(
            r##"{"a": "tag#1", "b": "#"}"##,
            &params(&[("1", json!("x"))]),
            false,
        )
        .unwrap();
        assert_eq!(doc, json!({ "a": "tag#1", "b": "#" }));
    }

    #[test]
    fn escape_empty_prunes_fields() {
        let doc = parse(
            r##"{"field1":"#p1","field2":""}"##,
            &params(&[("p1", json!("v"))]),
            true,
        )
        .unwrap();
        assert_eq!(doc, json!({ "field1": "v" }));
    }

    #[test]
    fn substituted_empty_value_is_pruned_too() {
        let doc = parse(
            r##"{"field1":"#p1","field2":"kept"}"##,
            &params(&[("p1", json!(""))]),
            true,
        )
        .unwrap();
        assert_eq!(doc, json!({ "field2": "kept" }));
    }

    #[test]
    fn root_survives_total_pruning() {
        let doc = parse(r#"{"a": "", "b": {}}"#, &ParameterMap::new(), true).unwrap();
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn malformed_text_is_a_syntax_error() {
        for text in ["{", "{ a: }", "[1, 2", "{ a: 'unterminated }", "{} trailing"] {
            assert!(
                matches!(
                    parse(text, &ParameterMap::new(), false),
                    Err(DocumentError::Syntax { .. })
                ),
                "expected syntax error for {text:?}"
            );
        }
    }

    #[test]
    fn round_trips_strict_json() {
        let original = json!({
            "find": "orders",
            "filter": { "status": "OPEN", "total": { "$gte": 100 } },
            "sort": [{ "created": -1 }],
            "limit": 50
        });
        let text = serde_json::to_string(&original).unwrap();
        let back = parse(&text, &ParameterMap::new(), false).unwrap();
        assert_eq!(back, original);
    }
}
