use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use pest::Parser as _;
use pest_derive::Parser;

use crate::schema::{Attribute, Fd, FdSet, FieldSet};

#[derive(Parser)]
#[grammar = "fd.pest"]
struct Parser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

fn parse_top<'a>(rule: Rule, code: &'a str, what: &str) -> Result<Pair<'a>> {
    Parser::parse(rule, code)
        .with_context(|| format!("Failed to parse {} {:?}", what, code))?
        .next()
        .ok_or_else(|| anyhow!("Empty parse of {} {:?}", what, code))
}

fn expect_inner(pair: Pair<'_>, rule: Rule) -> Pair<'_> {
    let inner = pair.into_inner().next().expect("missing pair");
    assert_eq!(inner.as_rule(), rule);
    inner
}

/// Parses one schema token: `ABC` or `{emp_id,name}`.
pub fn parse_field_set(code: &str) -> Result<FieldSet> {
    let schema = parse_top(Rule::schema, code.trim(), "schema")?;
    Ok(FieldSet::from(expect_inner(schema, Rule::field_set)))
}

/// Parses a single `<determinant> <dependent>` line.
pub fn parse_fd(code: &str) -> Result<Fd> {
    let line = parse_top(Rule::fd_line, code.trim(), "dependency")?;
    Ok(Fd::from(expect_inner(line, Rule::fd)))
}

/// Parses a line-oriented dependency list. Blank lines and `#` comments are
/// skipped and duplicate lines collapse.
pub fn parse_fd_set(code: &str) -> Result<FdSet> {
    let fd_set = parse_top(Rule::fd_set, code, "dependency set")?;
    Ok(fd_set
        .into_inner()
        .take_while(|pair| pair.as_rule() != Rule::EOI)
        .map(Fd::from)
        .collect())
}

impl From<Pair<'_>> for FieldSet {
    fn from(pair: Pair<'_>) -> Self {
        assert_eq!(pair.as_rule(), Rule::field_set);
        let pair = pair.into_inner().next().expect("missing pair");

        match pair.as_rule() {
            Rule::compact_set => pair
                .as_str()
                .chars()
                .map(|c| Attribute::new(c.to_string()))
                .collect(),

            Rule::braced_set => pair
                .into_inner()
                .map(|name| Attribute::new(name.as_str()))
                .collect(),

            _ => unreachable!(),
        }
    }
}

impl From<Pair<'_>> for Fd {
    fn from(pair: Pair<'_>) -> Self {
        assert_eq!(pair.as_rule(), Rule::fd);
        let mut pairs = pair.into_inner();
        let lhs = FieldSet::from(pairs.next().expect("missing determinant"));
        let rhs = FieldSet::from(pairs.next().expect("missing dependent"));
        Fd { lhs, rhs }
    }
}

impl FromStr for FieldSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_field_set(s)
    }
}

impl FromStr for Fd {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_fd(s)
    }
}

impl FromStr for FdSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_fd_set(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_schema_splits_letters() {
        assert_eq!(parse_field_set("CAB").unwrap(), FieldSet::from(["A", "B", "C"]));
        assert_eq!(parse_field_set("  AA ").unwrap(), FieldSet::from(["A"]));
    }

    #[test]
    fn braced_schema_keeps_names() {
        assert_eq!(
            parse_field_set("{emp_id, name,dept2}").unwrap(),
            FieldSet::from(["dept2", "emp_id", "name"])
        );
        assert_eq!(parse_field_set("{}").unwrap(), FieldSet::new());
    }

    #[test]
    fn malformed_schema_is_rejected() {
        assert!(parse_field_set("").is_err());
        assert!(parse_field_set("A1").is_err());
        assert!(parse_field_set("{a,}").is_err());
        assert!(parse_field_set("AB CD").is_err());
    }

    #[test]
    fn single_dependency() {
        let fd = parse_fd("AB  C").unwrap();
        assert_eq!(fd, Fd::new(["A", "B"], ["C"]));
        assert!(parse_fd("AB").is_err());
        assert!(parse_fd("A B C").is_err());
    }

    #[test]
    fn dependency_set_with_comments_and_blank_lines() {
        let fds = parse_fd_set(
            "# textbook example\n\
             \n\
             AB C\n\
             BC AD   # two on the right\n\
             D E\n\
             D E\n",
        )
        .unwrap();

        let expected: FdSet = vec![
            Fd::new(["A", "B"], ["C"]),
            Fd::new(["B", "C"], ["A", "D"]),
            Fd::new(["D"], ["E"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(fds, expected);
    }

    #[test]
    fn dependency_set_without_trailing_newline() {
        let fds = parse_fd_set("A B\nB C").unwrap();
        assert_eq!(fds.len(), 2);
        assert_eq!(parse_fd_set("").unwrap(), FdSet::new());
        assert!(parse_fd_set("A B\nC\n").is_err());
    }

    #[test]
    fn serialized_set_parses_back() {
        let fds = parse_fd_set("{emp_id} {name,salary}\nA BCD\nCD B\nEF {}\n").unwrap();
        let text = fds.to_string();
        assert_eq!(text.parse::<FdSet>().unwrap(), fds);
    }

    #[test]
    fn serialization_is_line_oriented() {
        let fds = parse_fd_set("D E\nAB C\n").unwrap();
        assert_eq!(fds.to_string(), "AB C\nD E\n");
    }
}
