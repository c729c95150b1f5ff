//! Translation of client filter clauses into SQL predicates over `users`.
//!
//! Clauses are validated into a closed set of fields and comparisons before
//! any SQL is produced. All predicates are ANDed in input order.

use sqlx::{Postgres, QueryBuilder};

use crate::{
    errors::{AppError, Result},
    models::RawFilterClause,
    utils::gib_to_bytes,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Email,
    TransferEnable,
    /// Consumed download traffic.
    D,
    ExpiredAt,
    Uuid,
    Token,
}

impl FilterField {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "email" => Some(Self::Email),
            "transfer_enable" => Some(Self::TransferEnable),
            "d" => Some(Self::D),
            "expired_at" => Some(Self::ExpiredAt),
            "uuid" => Some(Self::Uuid),
            "token" => Some(Self::Token),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::TransferEnable => "transfer_enable",
            Self::D => "d",
            Self::ExpiredAt => "expired_at",
            Self::Uuid => "uuid",
            Self::Token => "token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
}

impl Comparison {
    fn parse(condition: &str) -> Option<Self> {
        match condition {
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            "=" => Some(Self::Eq),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

/// A filter clause that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: FilterField,
    pub comparison: Comparison,
    pub value: String,
}

impl TryFrom<RawFilterClause> for FilterClause {
    type Error = AppError;

    fn try_from(raw: RawFilterClause) -> Result<Self> {
        let key = raw
            .key
            .ok_or_else(|| AppError::Validation("过滤字段不能为空".to_string()))?;
        let field = FilterField::parse(&key)
            .ok_or_else(|| AppError::Validation(format!("过滤字段不支持: {}", key)))?;

        let condition = raw
            .condition
            .ok_or_else(|| AppError::Validation("过滤条件不能为空".to_string()))?;
        let comparison = Comparison::parse(&condition)
            .ok_or_else(|| AppError::Validation(format!("过滤条件不支持: {}", condition)))?;

        let value = match raw.value {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(AppError::Validation("过滤值不能为空".to_string())),
        };

        Ok(FilterClause {
            field,
            comparison,
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains { column: &'static str, needle: String },
    Compare {
        column: &'static str,
        op: Comparison,
        value: Operand,
    },
}

/// Validates every raw clause; the first malformed one rejects the request.
pub fn parse_filters(raw: Vec<RawFilterClause>) -> Result<Vec<FilterClause>> {
    raw.into_iter().map(FilterClause::try_from).collect()
}

pub fn build_predicates(clauses: &[FilterClause]) -> Result<Vec<Predicate>> {
    clauses.iter().map(to_predicate).collect()
}

fn to_predicate(clause: &FilterClause) -> Result<Predicate> {
    let column = clause.field.column();

    let value = match clause.field {
        FilterField::Email if clause.comparison == Comparison::Eq => {
            return Ok(Predicate::Contains {
                column,
                needle: clause.value.clone(),
            });
        }
        FilterField::TransferEnable | FilterField::D => {
            let gib = clause
                .value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|gib| gib.is_finite())
                .ok_or_else(|| {
                    AppError::Validation(format!("过滤值必须为数字: {}", clause.value))
                })?;
            Operand::Int(gib_to_bytes(gib))
        }
        FilterField::ExpiredAt => {
            let ts: i64 = clause.value.trim().parse().map_err(|_| {
                AppError::Validation(format!("过滤值必须为时间戳: {}", clause.value))
            })?;
            Operand::Int(ts)
        }
        FilterField::Email | FilterField::Uuid | FilterField::Token => {
            Operand::Text(clause.value.clone())
        }
    };

    Ok(Predicate::Compare {
        column,
        op: clause.comparison,
        value,
    })
}

/// Appends ` AND <predicate>` for each predicate. The builder must already
/// contain a `WHERE` clause.
pub fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for predicate in predicates {
        query.push(" AND ");
        match predicate {
            Predicate::Contains { column, needle } => {
                query
                    .push(*column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{}%", escape_like(needle)));
            }
            Predicate::Compare { column, op, value } => {
                query.push(*column).push(" ").push(op.as_sql()).push(" ");
                match value {
                    Operand::Int(v) => query.push_bind(*v),
                    Operand::Text(s) => query.push_bind(s.clone()),
                };
            }
        }
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
