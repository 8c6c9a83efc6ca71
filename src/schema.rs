//! Declarative field constraints for movie payloads.
//!
//! A [`Schema`] is a static table of [`FieldRule`]s evaluated against an untyped
//! JSON body. Evaluation collects every violation rather than stopping at the
//! first, and on success yields a map holding only the fields the table knows
//! about, with integers normalised so the typed models can deserialize them.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::models::Genre;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Every field must be present unless it has a default.
    Full,
    /// Absent fields are skipped and defaults are not applied.
    Partial,
}

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    Text { min_len: usize },
    Integer { min: i64, max: i64 },
    Number { min: f64, max: f64 },
    OneOfList(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Option<fn() -> Value>,
}

#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [FieldRule],
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    InvalidEnumValue,
    TooSmall,
    TooBig,
    Custom,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    fn at(code: IssueCode, field: &str, message: impl Into<String>) -> Self {
        Self { code, path: vec![PathSegment::Key(field.to_string())], message: message.into() }
    }

    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(name)) => Some(name),
            _ => None,
        }
    }
}

fn zero() -> Value {
    Value::from(0)
}

pub static MOVIE_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule { name: "title", kind: FieldKind::Text { min_len: 1 }, default: None },
        FieldRule { name: "genre", kind: FieldKind::OneOfList(&Genre::NAMES), default: None },
        FieldRule { name: "director", kind: FieldKind::Text { min_len: 0 }, default: None },
        FieldRule { name: "year", kind: FieldKind::Integer { min: 1888, max: 2025 }, default: None },
        FieldRule { name: "duration", kind: FieldKind::Integer { min: 0, max: 240 }, default: None },
        FieldRule { name: "rate", kind: FieldKind::Number { min: 0.0, max: 10.0 }, default: Some(zero) },
        FieldRule { name: "poster", kind: FieldKind::Text { min_len: 0 }, default: None },
    ],
};

impl Schema {
    pub fn validate(&self, input: &Value, mode: Mode) -> Result<Map<String, Value>, Vec<Issue>> {
        let Some(object) = input.as_object() else {
            return Err(vec![Issue {
                code: IssueCode::InvalidType,
                path: Vec::new(),
                message: format!("Expected object, received {}", type_name(input)),
            }]);
        };

        let mut out = Map::new();
        let mut issues = Vec::new();

        for rule in self.fields {
            match object.get(rule.name) {
                Some(value) => {
                    if let Some(value) = rule.kind.check(rule.name, value, &mut issues) {
                        out.insert(rule.name.to_string(), value);
                    }
                },
                None => match (mode, rule.default) {
                    (Mode::Partial, _) => {},
                    (Mode::Full, Some(default)) => {
                        out.insert(rule.name.to_string(), default());
                    },
                    (Mode::Full, None) => issues.push(Issue::at(
                        IssueCode::InvalidType,
                        rule.name,
                        format!("{} is required", capitalize(rule.name)),
                    )),
                },
            }
        }

        if issues.is_empty() { Ok(out) } else { Err(issues) }
    }

    /// Validates and deserializes into a typed payload in one step.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value, mode: Mode) -> Result<T, Vec<Issue>> {
        let fields = self.validate(input, mode)?;
        serde_json::from_value(Value::Object(fields)).map_err(|err| {
            vec![Issue { code: IssueCode::Custom, path: Vec::new(), message: err.to_string() }]
        })
    }
}

impl FieldKind {
    fn check(&self, field: &str, value: &Value, issues: &mut Vec<Issue>) -> Option<Value> {
        match *self {
            FieldKind::Text { min_len } => {
                let Some(s) = value.as_str() else {
                    issues.push(expected(field, "string", value));
                    return None;
                };
                if s.chars().count() < min_len {
                    issues.push(Issue::at(
                        IssueCode::TooSmall,
                        field,
                        format!("String must contain at least {min_len} character(s)"),
                    ));
                    return None;
                }
                Some(value.clone())
            },
            FieldKind::Integer { min, max } => {
                let n = match as_integer(value) {
                    Ok(n) => n,
                    Err(received) => {
                        issues.push(Issue::at(
                            IssueCode::InvalidType,
                            field,
                            format!("Expected integer, received {received}"),
                        ));
                        return None;
                    },
                };
                if n < min {
                    issues.push(too_small(field, min));
                    return None;
                }
                if n > max {
                    issues.push(too_big(field, max));
                    return None;
                }
                Some(Value::from(n))
            },
            FieldKind::Number { min, max } => {
                let Some(n) = value.as_f64() else {
                    issues.push(expected(field, "number", value));
                    return None;
                };
                if n < min {
                    issues.push(too_small(field, min));
                    return None;
                }
                if n > max {
                    issues.push(too_big(field, max));
                    return None;
                }
                Some(value.clone())
            },
            FieldKind::OneOfList(options) => {
                let Some(items) = value.as_array() else {
                    issues.push(expected(field, "array", value));
                    return None;
                };
                let before = issues.len();
                for (idx, item) in items.iter().enumerate() {
                    let path = vec![PathSegment::Key(field.to_string()), PathSegment::Index(idx)];
                    match item.as_str() {
                        Some(tag) if options.iter().any(|o| *o == tag) => {},
                        Some(tag) => issues.push(Issue {
                            code: IssueCode::InvalidEnumValue,
                            path,
                            message: format!(
                                "Invalid enum value. Expected {}, received '{tag}'",
                                options.iter().map(|o| format!("'{o}'")).collect::<Vec<_>>().join(" | ")
                            ),
                        }),
                        None => issues.push(Issue {
                            code: IssueCode::InvalidType,
                            path,
                            message: format!("Expected string, received {}", type_name(item)),
                        }),
                    }
                }
                (issues.len() == before).then(|| value.clone())
            },
        }
    }
}

/// Accepts JSON numbers without a fractional part. On failure returns what was received.
fn as_integer(value: &Value) -> Result<i64, &'static str> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 => Ok(f as i64),
        Some(_) => Err("float"),
        None => Err(type_name(value)),
    }
}

fn expected(field: &str, kind: &str, value: &Value) -> Issue {
    Issue::at(
        IssueCode::InvalidType,
        field,
        format!("Expected {kind}, received {}", type_name(value)),
    )
}

fn too_small(field: &str, min: impl std::fmt::Display) -> Issue {
    Issue::at(IssueCode::TooSmall, field, format!("Number must be greater than or equal to {min}"))
}

fn too_big(field: &str, max: impl std::fmt::Display) -> Issue {
    Issue::at(IssueCode::TooBig, field, format!("Number must be less than or equal to {max}"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
