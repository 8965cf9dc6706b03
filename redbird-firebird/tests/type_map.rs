#[cfg(test)]
mod tests {
    use redbird_core::{ColumnKind, ColumnTypeDescriptor, Value};
    use redbird_firebird::{
        NativeField, RdbError,
        type_map::{
            column_from_field, descriptor_to_sql, native_type_name, parse_default, simplified_kind,
            sql_type_for, type_to_sql,
        },
    };
    use redbird_tests::{init_logs, silent_logs};

    fn mapping_error(result: redbird_core::Result<String>) -> String {
        let error = result.expect_err("The mapping should fail");
        assert!(matches!(
            error.downcast_ref::<RdbError>(),
            Some(RdbError::TypeMappingConfiguration(..))
        ));
        error.to_string()
    }

    #[test]
    fn integers() {
        assert_eq!(type_to_sql(ColumnKind::Integer, None, None, None).unwrap(), "integer");
        assert_eq!(type_to_sql(ColumnKind::Integer, Some(0), None, None).unwrap(), "integer");
        assert_eq!(type_to_sql(ColumnKind::Integer, Some(2), None, None).unwrap(), "smallint");
        assert_eq!(type_to_sql(ColumnKind::Integer, Some(4), None, None).unwrap(), "integer");
        assert_eq!(type_to_sql(ColumnKind::Integer, Some(8), None, None).unwrap(), "bigint");
        let message = mapping_error(type_to_sql(ColumnKind::Integer, Some(16), None, None));
        assert!(message.contains("byte size 16"), "{}", message);
    }

    #[test]
    fn floats_and_text() {
        assert_eq!(type_to_sql(ColumnKind::Float, None, None, None).unwrap(), "float");
        assert_eq!(
            type_to_sql(ColumnKind::Float, Some(8), None, None).unwrap(),
            "double precision"
        );
        assert_eq!(type_to_sql(ColumnKind::String, None, None, None).unwrap(), "varchar(255)");
        assert_eq!(type_to_sql(ColumnKind::String, Some(40), None, None).unwrap(), "varchar(40)");
        assert_eq!(
            type_to_sql(ColumnKind::Text, None, None, None).unwrap(),
            "blob sub_type text"
        );
        assert_eq!(type_to_sql(ColumnKind::Text, Some(100), None, None).unwrap(), "varchar(100)");
        assert_eq!(
            type_to_sql(ColumnKind::Binary, None, None, None).unwrap(),
            "blob sub_type binary"
        );
        assert_eq!(type_to_sql(ColumnKind::Boolean, None, None, None).unwrap(), "boolean");
        assert_eq!(
            type_to_sql(ColumnKind::PrimaryKey, Some(8), None, None).unwrap(),
            "bigint not null primary key"
        );
    }

    #[test]
    fn decimals() {
        assert_eq!(
            type_to_sql(ColumnKind::Decimal, None, Some(10), Some(2)).unwrap(),
            "decimal(10,2)"
        );
        assert_eq!(
            type_to_sql(ColumnKind::Decimal, None, Some(10), None).unwrap(),
            "decimal(10)"
        );
        assert_eq!(type_to_sql(ColumnKind::Decimal, None, None, None).unwrap(), "decimal");
        let message = mapping_error(type_to_sql(ColumnKind::Decimal, None, None, Some(2)));
        assert!(message.contains("precision cannot be empty"), "{}", message);
    }

    #[test]
    fn temporal_precision() {
        assert_eq!(type_to_sql(ColumnKind::Datetime, None, None, None).unwrap(), "timestamp");
        assert_eq!(
            type_to_sql(ColumnKind::Timestamp, None, Some(3), None).unwrap(),
            "timestamp(3)"
        );
        assert_eq!(type_to_sql(ColumnKind::Time, None, Some(0), None).unwrap(), "time(0)");
        let message = mapping_error(type_to_sql(ColumnKind::Time, None, Some(7), None));
        assert!(message.contains("from 0 to 6"), "{}", message);
        assert_eq!(native_type_name(ColumnKind::Interval), "interval");
        assert_eq!(
            descriptor_to_sql(&ColumnTypeDescriptor::new(ColumnKind::String).limit(12)).unwrap(),
            "varchar(12)"
        );
    }

    #[test]
    fn catalog_types() {
        let field = NativeField {
            name: "PRICE".into(),
            sql_type: "numeric".into(),
            precision: Some(10),
            scale: Some(-2),
            ..Default::default()
        };
        assert_eq!(sql_type_for(&field), "numeric(10,2)");
        let field = NativeField {
            name: "NOTES".into(),
            sql_type: "blob".into(),
            sql_subtype: Some(1),
            ..Default::default()
        };
        assert_eq!(sql_type_for(&field), "blob sub_type text");
        let field = NativeField {
            name: "NAME".into(),
            sql_type: "varchar".into(),
            length: Some(60),
            ..Default::default()
        };
        assert_eq!(sql_type_for(&field), "varchar(60)");

        assert_eq!(simplified_kind("timestamp"), Some(ColumnKind::Datetime));
        assert_eq!(simplified_kind("blob sub_type text"), Some(ColumnKind::Text));
        assert_eq!(simplified_kind("blob sub_type binary"), Some(ColumnKind::Binary));
        assert_eq!(simplified_kind("bigint(8)"), Some(ColumnKind::Bigint));
        assert_eq!(simplified_kind("smallint(2)"), Some(ColumnKind::Integer));
        assert_eq!(simplified_kind("double(8)"), Some(ColumnKind::Float));
        assert_eq!(simplified_kind("char(10)"), Some(ColumnKind::String));
        assert_eq!(simplified_kind("date"), Some(ColumnKind::Date));
        assert_eq!(simplified_kind("time"), Some(ColumnKind::Time));
        assert_eq!(simplified_kind("boolean"), Some(ColumnKind::Boolean));
        assert_eq!(simplified_kind("geometry"), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(parse_default(None), None);
        assert_eq!(parse_default(Some("DEFAULT 'abc'")), Some("abc".into()));
        assert_eq!(parse_default(Some("default 0")), Some("0".into()));
        assert_eq!(parse_default(Some("DEFAULT NULL")), None);
    }

    #[test]
    fn columns_from_catalog() {
        init_logs();
        let field = NativeField {
            name: "NAME                           ".into(),
            sql_type: "varchar".into(),
            length: Some(60),
            nullable: false,
            default: Some("DEFAULT 'anon'".into()),
            ..Default::default()
        };
        let column = column_from_field(&field, true);
        assert_eq!(column.name, "name");
        assert_eq!(column.column_type.kind, ColumnKind::String);
        assert_eq!(column.column_type.limit, Some(60));
        assert!(!column.nullable);
        assert!(!column.primary_key);
        assert_eq!(column.default, Some(Value::Varchar(Some("anon".into()))));

        let column = column_from_field(&field, false);
        assert_eq!(column.name, "NAME");

        let field = NativeField {
            name: "TOTAL".into(),
            sql_type: "decimal".into(),
            precision: Some(12),
            scale: Some(-3),
            nullable: true,
            ..Default::default()
        };
        let column = column_from_field(&field, true);
        assert_eq!(column.column_type.kind, ColumnKind::Decimal);
        assert_eq!(column.column_type.precision, Some(12));
        assert_eq!(column.column_type.scale, Some(3));

        let field = NativeField {
            name: "SHAPE".into(),
            sql_type: "geometry".into(),
            domain: Some("D_SHAPE".into()),
            ..Default::default()
        };
        let column;
        silent_logs! {
            column = column_from_field(&field, true);
        }
        assert_eq!(column.column_type.kind, ColumnKind::String);
        assert_eq!(column.column_type.domain.as_deref(), Some("D_SHAPE"));
    }
}
