#[cfg(test)]
mod tests {
    use redbird_firebird::quoting::{
        canonical_to_dialect, dialect_to_canonical, escape_reserved_words, format_identifier,
        format_table_name, is_plain_identifier, is_reserved_word, quote_identifier, quote_string,
        quoted_date, quoted_time, quoted_timestamp, sql,
    };
    use time::macros::{date, datetime, time};

    #[test]
    fn identifiers() {
        assert_eq!(quote_identifier("name"), r#""NAME""#);
        assert_eq!(quote_identifier(r#"a"b"#), r#""A""B""#);
        assert_eq!(format_identifier("users", true), r#""USERS""#);
        assert_eq!(format_identifier("users", false), "USERS");
        assert_eq!(format_identifier("order", false), r#""ORDER""#);
        assert_eq!(format_identifier("my col", false), r#""MY COL""#);
        assert_eq!(format_identifier("1st", false), r#""1ST""#);
        assert_eq!(format_table_name("public.users", true), r#""PUBLIC"."USERS""#);
        assert_eq!(format_table_name("public.users", false), "PUBLIC.USERS");
    }

    #[test]
    fn plain_identifiers() {
        assert!(is_plain_identifier("users"));
        assert!(is_plain_identifier("rdb$pages"));
        assert!(!is_plain_identifier("_users"));
        assert!(!is_plain_identifier("select"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("a_very_long_identifier_of_32_byte"));
        assert!(is_reserved_word("Position"));
        assert!(!is_reserved_word("positions"));
    }

    #[test]
    fn canonical_names() {
        assert_eq!(dialect_to_canonical("USERS"), "users");
        assert_eq!(dialect_to_canonical("ORDER_ITEMS_2"), "order_items_2");
        assert_eq!(dialect_to_canonical("MixedCase"), "MixedCase");
        assert_eq!(canonical_to_dialect("users"), "USERS");
        for name in ["users", "order_items", "a1$b"] {
            assert_eq!(dialect_to_canonical(&canonical_to_dialect(name)), name);
        }
    }

    #[test]
    fn reserved_words() {
        assert_eq!(
            escape_reserved_words(
                r#"select count(*) as count from t where position = 1 and "VALUE" = 'value'"#
            ),
            r#"select count(*) as "COUNT" from t where "POSITION" = 1 and "VALUE" = 'value'"#
        );
        assert_eq!(
            escape_reserved_words("SELECT value_id, t.value FROM t"),
            r#"SELECT value_id, t."VALUE" FROM t"#
        );
        assert_eq!(
            escape_reserved_words("WHERE note = 'it''s the value' AND value > 0"),
            r#"WHERE note = 'it''s the value' AND "VALUE" > 0"#
        );
        assert_eq!(sql("ORDER BY position").as_str(), r#"ORDER BY "POSITION""#);
    }

    #[test]
    fn literals() {
        assert_eq!(quote_string("it's"), "it''s");
        assert_eq!(quoted_date(&date!(2024 - 03 - 05)), "'05.03.2024'");
        assert_eq!(quoted_time(&time!(14:07:09)), "'14:07:09'");
        assert_eq!(
            quoted_timestamp(&datetime!(2024-03-05 14:07:09.250)),
            "'05.03.2024 14:07:09'"
        );
    }
}
