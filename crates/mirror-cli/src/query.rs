use crate::CliError;
use mirror_types::ClassCategory;
use serde::Serialize;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Type,
    Method,
    Field,
}

impl QueryKind {
    pub const fn label(self) -> &'static str {
        match self {
            QueryKind::Type => "type",
            QueryKind::Method => "method",
            QueryKind::Field => "field",
        }
    }
}

/// One parsed command-line query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Type(TypeQuery),
    Method(MethodQuery),
    Field(FieldQuery),
}

impl Query {
    pub fn parse(kind: QueryKind, text: &str) -> Result<Self, CliError> {
        Ok(match kind {
            QueryKind::Type => Query::Type(text.parse()?),
            QueryKind::Method => Query::Method(text.parse()?),
            QueryKind::Field => Query::Field(text.parse()?),
        })
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Type(_) => QueryKind::Type,
            Query::Method(_) => QueryKind::Method,
            Query::Field(_) => QueryKind::Field,
        }
    }
}

/// `CAT:NAME`, e.g. `nms:Entity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQuery {
    pub category: ClassCategory,
    pub name: String,
}

/// `CAT:NAME#method(T1,T2)`. Parameter types are fully qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodQuery {
    pub owner: TypeQuery,
    pub name: String,
    pub parameters: Vec<String>,
}

/// `CAT:NAME#field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldQuery {
    pub owner: TypeQuery,
    pub name: String,
}

fn malformed(query: &str, reason: &'static str) -> CliError {
    CliError::Query {
        query: query.to_string(),
        reason,
    }
}

fn non_empty<'a>(query: &str, part: &'a str, reason: &'static str) -> Result<&'a str, CliError> {
    let part = part.trim();
    if part.is_empty() {
        Err(malformed(query, reason))
    } else {
        Ok(part)
    }
}

/// Splits `OWNER#MEMBER`, rejecting a missing or repeated `#`.
fn split_member(s: &str) -> Result<(TypeQuery, &str), CliError> {
    let (owner, member) = s
        .split_once('#')
        .ok_or_else(|| malformed(s, "expected `CAT:NAME#member`"))?;
    if member.contains('#') {
        return Err(malformed(s, "more than one `#`"));
    }
    Ok((owner.parse()?, member))
}

impl FromStr for TypeQuery {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, name) = s
            .split_once(':')
            .ok_or_else(|| malformed(s, "expected `CAT:NAME`"))?;
        let category = category
            .trim()
            .parse::<ClassCategory>()
            .map_err(|_| malformed(s, "category must be `nms` or `obc`"))?;
        let name = non_empty(s, name, "type name is empty")?;
        if name.contains(['#', '(', ')', ',']) {
            return Err(malformed(s, "type name contains a member separator"));
        }
        Ok(Self {
            category,
            name: name.to_string(),
        })
    }
}

impl FromStr for MethodQuery {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, member) = split_member(s)?;
        let (name, rest) = member
            .split_once('(')
            .ok_or_else(|| malformed(s, "expected `(` after method name"))?;
        let name = non_empty(s, name, "method name is empty")?;
        let list = rest
            .strip_suffix(')')
            .ok_or_else(|| malformed(s, "expected `)` at the end"))?;
        if list.contains(['(', ')']) {
            return Err(malformed(s, "unbalanced parentheses"));
        }

        let parameters = if list.trim().is_empty() {
            Vec::new()
        } else {
            list.split(',')
                .map(|p| non_empty(s, p, "empty parameter type").map(str::to_string))
                .collect::<Result<_, _>>()?
        };

        Ok(Self {
            owner,
            name: name.to_string(),
            parameters,
        })
    }
}

impl FromStr for FieldQuery {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, member) = split_member(s)?;
        let name = non_empty(s, member, "field name is empty")?;
        if name.contains(['(', ')', ',']) {
            return Err(malformed(s, "field name contains a parameter list"));
        }
        Ok(Self {
            owner,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for TypeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.name)
    }
}

impl fmt::Display for MethodQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}({})", self.owner, self.name, self.parameters.join(","))
    }
}

impl fmt::Display for FieldQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner, self.name)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Type(q) => q.fmt(f),
            Query::Method(q) => q.fmt(f),
            Query::Field(q) => q.fmt(f),
        }
    }
}
