//! Grammar string parser using nom.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_until, take_while1},
    character::complete::char,
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use super::{first_key, SyntaxNode};
use crate::error::{JsqlError, JsqlResult};

/// Characters with a meaning in the grammar; everything else is literal.
const SPECIAL: &str = "{}<>[]|";

/// Parse a complete grammar string.
pub(super) fn parse(grammar: &str) -> JsqlResult<Vec<SyntaxNode>> {
    match nodes(grammar) {
        Ok(("", nodes)) => Ok(nodes),
        Ok((remaining, _)) => {
            let position = grammar.len() - remaining.len();
            Err(JsqlError::syntax(position, describe(remaining)))
        }
        Err(e) => Err(JsqlError::syntax(0, format!("Parse failed: {:?}", e))),
    }
}

/// Explain why parsing stopped at `remaining`.
fn describe(remaining: &str) -> String {
    match remaining.chars().next() {
        Some('{') => "optional group is unclosed or references no key".to_string(),
        Some('}') => "unbalanced '}'".to_string(),
        Some('<') => "malformed required reference, expected <$key>".to_string(),
        Some('[') => "malformed inline reference, expected [$key]".to_string(),
        Some('|') => "'|' is only valid inside {{ item | separator }}".to_string(),
        Some(c) => format!("unexpected '{}'", c),
        None => "unexpected end of grammar".to_string(),
    }
}

fn nodes(input: &str) -> IResult<&str, Vec<SyntaxNode>> {
    many0(node)(input)
}

fn node(input: &str) -> IResult<&str, SyntaxNode> {
    alt((repeat, optional, required, inline_ref, literal))(input)
}

/// An operator key: `$` followed by word characters.
fn key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        char('$'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn literal(input: &str) -> IResult<&str, SyntaxNode> {
    map(take_till1(|c: char| SPECIAL.contains(c)), |text: &str| {
        SyntaxNode::Literal(collapse_whitespace(text))
    })(input)
}

/// `<$key>`
fn required(input: &str) -> IResult<&str, SyntaxNode> {
    map(delimited(char('<'), key, char('>')), |k: &str| {
        SyntaxNode::Required(k.to_string())
    })(input)
}

/// `[$key]` or `[$key|fallback]`
fn inline_ref(input: &str) -> IResult<&str, SyntaxNode> {
    map(
        delimited(
            char('['),
            pair(key, opt(preceded(char('|'), take_till1(|c: char| c == ']')))),
            char(']'),
        ),
        |(k, fallback): (&str, Option<&str>)| SyntaxNode::InlineRef {
            key: k.to_string(),
            fallback: fallback.map(str::to_string),
        },
    )(input)
}

/// `{ ... }`, guarded by the first key inside.
fn optional(input: &str) -> IResult<&str, SyntaxNode> {
    map_res(delimited(char('{'), nodes, char('}')), |body| {
        match first_key(&body) {
            Some(guard) => Ok(SyntaxNode::Optional { guard, body }),
            None => Err("optional group references no key"),
        }
    })(input)
}

/// `{{ item | separator }}`
fn repeat(input: &str) -> IResult<&str, SyntaxNode> {
    map(
        delimited(
            tag("{{"),
            pair(nodes, preceded(char('|'), take_until("}}"))),
            tag("}}"),
        ),
        |(item, separator): (Vec<SyntaxNode>, &str)| SyntaxNode::RepeatList {
            item,
            separator: separator.to_string(),
        },
    )(input)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> SyntaxNode {
        SyntaxNode::Literal(s.to_string())
    }

    fn inline(k: &str) -> SyntaxNode {
        SyntaxNode::InlineRef {
            key: k.to_string(),
            fallback: None,
        }
    }

    #[test]
    fn test_literal_whitespace_collapses() {
        assert_eq!(parse("SELECT \n\t  1").unwrap(), vec![lit("SELECT 1")]);
    }

    #[test]
    fn test_optional_and_required() {
        let nodes = parse("CREATE{ TEMPORARY[$temp]} TABLE <$table>").unwrap();
        assert_eq!(
            nodes,
            vec![
                lit("CREATE"),
                SyntaxNode::Optional {
                    guard: "$temp".to_string(),
                    body: vec![lit(" TEMPORARY"), inline("$temp")],
                },
                lit(" TABLE "),
                SyntaxNode::Required("$table".to_string()),
            ]
        );
    }

    #[test]
    fn test_inline_fallback() {
        let nodes = parse("[$columns|*]").unwrap();
        assert_eq!(
            nodes,
            vec![SyntaxNode::InlineRef {
                key: "$columns".to_string(),
                fallback: Some("*".to_string()),
            }]
        );
    }

    #[test]
    fn test_nested_optional() {
        let nodes = parse("{ LIMIT [$limit]{ OFFSET [$offset]}}").unwrap();
        match &nodes[0] {
            SyntaxNode::Optional { guard, body } => {
                assert_eq!(guard, "$limit");
                assert_eq!(body.len(), 3);
                assert!(matches!(&body[2], SyntaxNode::Optional { guard, .. } if guard == "$offset"));
            }
            other => panic!("expected optional, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_list() {
        let nodes = parse("({{[$column][$constraint]|, }})").unwrap();
        assert_eq!(
            nodes,
            vec![
                lit("("),
                SyntaxNode::RepeatList {
                    item: vec![inline("$column"), inline("$constraint")],
                    separator: ", ".to_string(),
                },
                lit(")"),
            ]
        );
    }

    #[test]
    fn test_group_without_key_is_rejected() {
        let err = parse("SELECT{ DISTINCT}").unwrap_err();
        assert!(matches!(err, JsqlError::Syntax { position: 6, .. }), "{err}");
    }

    #[test]
    fn test_unbalanced_brace() {
        let err = parse("SELECT }").unwrap_err();
        assert_eq!(err.to_string(), "Syntax error at position 7: unbalanced '}'");
    }

    #[test]
    fn test_bad_reference() {
        assert!(parse("<table>").is_err());
        assert!(parse("[$]").is_err());
        assert!(parse("a | b").is_err());
    }
}
