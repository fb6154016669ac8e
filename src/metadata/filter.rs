//! LDAP-style environment filters, e.g. `(&(osgi.os=linux)(osgi.ws=gtk))`.
//!
//! Supports `&`, `|`, `!`, equality, presence (`attr=*`), and `*` wildcards
//! inside values. A comparison against a missing attribute is false.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A parsed filter expression. Keeps its source text for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Filter {
    source: String,
    expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Expr {
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Equals { attr: String, pattern: String },
    Present(String),
}

impl Filter {
    /// Evaluates the filter against a property map.
    #[must_use]
    pub fn matches(&self, properties: &BTreeMap<String, String>) -> bool {
        self.expr.eval(properties)
    }
}

impl Expr {
    fn eval(&self, props: &BTreeMap<String, String>) -> bool {
        match self {
            Self::And(items) => items.iter().all(|e| e.eval(props)),
            Self::Or(items) => items.iter().any(|e| e.eval(props)),
            Self::Not(inner) => !inner.eval(props),
            Self::Present(attr) => props.contains_key(attr),
            Self::Equals { attr, pattern } => {
                props.get(attr).is_some_and(|value| wildcard_match(pattern, value))
            }
        }
    }
}

fn wildcard_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern.eq_ignore_ascii_case(value);
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let mut rest = value;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            let Some(tail) = rest.strip_prefix(part) else { return false };
            rest = tail;
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            let Some(pos) = rest.find(part) else { return false };
            rest = &rest[pos + part.len()..];
        }
    }
    true
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, what: &str) -> Error {
        Error::Metadata(format!("invalid filter '{}' at {}: {what}", self.input, self.pos))
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.input[self.pos..].chars().next().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, c: char) -> Result<(), Error> {
        self.skip_ws();
        if self.input[self.pos..].starts_with(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.input[self.pos..].chars().next()
    }

    fn parse_filter(&mut self) -> Result<Expr, Error> {
        self.expect('(')?;
        let expr = match self.peek() {
            Some('&') => {
                self.pos += 1;
                Expr::And(self.parse_list()?)
            }
            Some('|') => {
                self.pos += 1;
                Expr::Or(self.parse_list()?)
            }
            Some('!') => {
                self.pos += 1;
                Expr::Not(Box::new(self.parse_filter()?))
            }
            Some(_) => self.parse_item()?,
            None => return Err(self.error("unexpected end")),
        };
        self.expect(')')?;
        Ok(expr)
    }

    fn parse_list(&mut self) -> Result<Vec<Expr>, Error> {
        let mut items = Vec::new();
        while self.peek() == Some('(') {
            items.push(self.parse_filter()?);
        }
        if items.is_empty() {
            return Err(self.error("empty operand list"));
        }
        Ok(items)
    }

    fn parse_item(&mut self) -> Result<Expr, Error> {
        let rest = &self.input[self.pos..];
        let end = rest.find(')').ok_or_else(|| self.error("unterminated item"))?;
        let item = &rest[..end];
        let (attr, value) = item.split_once('=').ok_or_else(|| self.error("expected '='"))?;
        let attr = attr.trim();
        if attr.is_empty() {
            return Err(self.error("empty attribute"));
        }
        self.pos += end;
        Ok(if value == "*" {
            Expr::Present(attr.to_string())
        } else {
            Expr::Equals {
                attr: attr.to_string(),
                pattern: value.to_string(),
            }
        })
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input: s, pos: 0 };
        let expr = parser.parse_filter()?;
        if parser.peek().is_some() {
            return Err(parser.error("trailing input"));
        }
        Ok(Self {
            source: s.trim().to_string(),
            expr,
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for Filter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Filter> for String {
    fn from(value: Filter) -> Self {
        value.source
    }
}
