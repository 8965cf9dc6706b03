use crate::{NativeField, RdbError, quoting::dialect_to_canonical};
use redbird_core::{ColumnDef, ColumnKind, ColumnTypeDescriptor, Result, Value};

/// Native type name of each kind, the sized kinds get their size appended.
pub fn native_type_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::PrimaryKey => "bigint not null primary key",
        ColumnKind::String => "varchar",
        ColumnKind::Text => "blob sub_type text",
        ColumnKind::Integer => "integer",
        ColumnKind::Bigint => "bigint",
        ColumnKind::Float => "float",
        ColumnKind::Decimal => "decimal",
        ColumnKind::Datetime | ColumnKind::Timestamp => "timestamp",
        ColumnKind::Time => "time",
        ColumnKind::Date => "date",
        ColumnKind::Interval => "interval",
        ColumnKind::Binary => "blob sub_type binary",
        ColumnKind::Boolean => "boolean",
    }
}

/// SQL type for a column kind. A limit of zero counts as absent.
pub fn type_to_sql(
    kind: ColumnKind,
    limit: Option<u32>,
    precision: Option<u8>,
    scale: Option<u8>,
) -> Result<String> {
    let limit = limit.filter(|v| *v > 0);
    let native = native_type_name(kind);
    Ok(match kind {
        ColumnKind::Integer => match limit {
            None => "integer".into(),
            Some(1..=2) => "smallint".into(),
            Some(3..=4) => "integer".into(),
            Some(5..=8) => "bigint".into(),
            Some(limit) => {
                return Err(RdbError::TypeMappingConfiguration(format!(
                    "No integer type has byte size {}. Use a NUMERIC with PRECISION 0 instead.",
                    limit
                ))
                .into());
            }
        },
        ColumnKind::Bigint => "bigint".into(),
        ColumnKind::Float => match limit {
            Some(limit) if limit > 4 => "double precision".into(),
            _ => "float".into(),
        },
        ColumnKind::Text => match limit {
            Some(limit) => format!("varchar({})", limit),
            None => native.into(),
        },
        ColumnKind::String => format!("varchar({})", limit.unwrap_or(255)),
        ColumnKind::Decimal => match (precision, scale) {
            (Some(precision), Some(scale)) => format!("{}({},{})", native, precision, scale),
            (Some(precision), None) => format!("{}({})", native, precision),
            (None, Some(..)) => {
                return Err(RdbError::TypeMappingConfiguration(
                    "Error adding decimal column: precision cannot be empty if scale is specified"
                        .into(),
                )
                .into());
            }
            (None, None) => native.into(),
        },
        ColumnKind::Datetime | ColumnKind::Timestamp | ColumnKind::Time | ColumnKind::Interval
            if precision.is_some() =>
        {
            match precision {
                Some(precision @ 0..=6) => format!("{}({})", native, precision),
                _ => {
                    return Err(RdbError::TypeMappingConfiguration(format!(
                        "No {} type has precision of {}. The allowed range of precision is from 0 to 6",
                        native,
                        precision.unwrap_or_default()
                    ))
                    .into());
                }
            }
        }
        ColumnKind::PrimaryKey => native.into(),
        _ => match limit {
            Some(limit) => format!("{}({})", native, limit),
            None => native.into(),
        },
    })
}

pub fn descriptor_to_sql(descriptor: &ColumnTypeDescriptor) -> Result<String> {
    type_to_sql(
        descriptor.kind,
        descriptor.limit,
        descriptor.precision,
        descriptor.scale,
    )
}

/// Full SQL type of a catalog field, sizes and blob sub-type included.
pub fn sql_type_for(field: &NativeField) -> String {
    let mut sql_type = field.sql_type.trim().to_string();
    let lower = sql_type.to_ascii_lowercase();
    if lower.contains("numeric") || lower.contains("decimal") {
        sql_type.push_str(&format!(
            "({},{})",
            field.precision.unwrap_or_default(),
            field.scale.unwrap_or_default().unsigned_abs()
        ));
    } else if ["int", "float", "double", "char"]
        .iter()
        .any(|v| lower.contains(v))
    {
        sql_type.push_str(&format!("({})", field.length.unwrap_or_default()));
    }
    if lower.contains("blob") {
        match field.sql_subtype {
            Some(1) => sql_type.push_str(" sub_type text"),
            Some(0) => sql_type.push_str(" sub_type binary"),
            _ => {}
        }
    }
    sql_type
}

/// Column kind of a full SQL type as produced by [`sql_type_for`].
pub fn simplified_kind(sql_type: &str) -> Option<ColumnKind> {
    let sql_type = sql_type.to_ascii_lowercase();
    let kind = if sql_type.contains("timestamp") {
        ColumnKind::Datetime
    } else if sql_type.contains("blob sub_type text") {
        ColumnKind::Text
    } else if sql_type.contains("blob") {
        ColumnKind::Binary
    } else if sql_type.starts_with("numeric") || sql_type.starts_with("decimal") {
        ColumnKind::Decimal
    } else if sql_type.starts_with("bigint") || sql_type.starts_with("int64") {
        ColumnKind::Bigint
    } else if sql_type.contains("int") {
        ColumnKind::Integer
    } else if sql_type.starts_with("float") || sql_type.starts_with("double") {
        ColumnKind::Float
    } else if sql_type.contains("char") {
        ColumnKind::String
    } else if sql_type.starts_with("date") {
        ColumnKind::Date
    } else if sql_type.starts_with("time") {
        ColumnKind::Time
    } else if sql_type.starts_with("boolean") {
        ColumnKind::Boolean
    } else {
        return None;
    };
    Some(kind)
}

/// Default clause of the catalog to its value, `None` when absent or `NULL`.
pub fn parse_default(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.to_ascii_lowercase().contains("null") {
        return None;
    }
    let mut value = raw.trim_start();
    if value.len() >= 7 && value[..7].eq_ignore_ascii_case("default") {
        value = value[7..].trim_start();
    }
    let value = value.strip_prefix('\'').unwrap_or(value);
    let value = value.strip_suffix('\'').unwrap_or(value);
    Some(value.to_string())
}

/// Dialect neutral column definition of a catalog field.
pub fn column_from_field(field: &NativeField, downcase_names: bool) -> ColumnDef {
    let sql_type = sql_type_for(field);
    let kind = simplified_kind(&sql_type).unwrap_or_else(|| {
        log::warn!(
            "Unknown type `{}` of column `{}`, reading it as a string",
            sql_type,
            field.name
        );
        ColumnKind::String
    });
    let mut column_type = ColumnTypeDescriptor::new(kind);
    let lower = sql_type.to_ascii_lowercase();
    match kind {
        ColumnKind::String => column_type.limit = field.length.filter(|v| *v > 0),
        ColumnKind::Integer => {
            column_type.limit = Some(if lower.starts_with("smallint") { 2 } else { 4 })
        }
        ColumnKind::Bigint => column_type.limit = Some(8),
        ColumnKind::Float if lower.starts_with("double") => column_type.limit = Some(8),
        ColumnKind::Decimal => {
            column_type.precision = field.precision;
            column_type.scale = field.scale.map(|v| v.unsigned_abs() as u8);
        }
        _ => {}
    }
    column_type.sub_type = field.sql_subtype;
    column_type.domain = field.domain.clone();
    let name = if downcase_names {
        dialect_to_canonical(field.name.trim_end()).into_owned()
    } else {
        field.name.trim_end().to_string()
    };
    let mut column = ColumnDef::new(name, column_type).nullable(field.nullable);
    column.primary_key = false;
    column.default = parse_default(field.default.as_deref()).map(|v| Value::Varchar(Some(v)));
    column
}
