#[cfg(test)]
mod tests {
    use redbird_core::{QueryResult, RowLabeled, RowNames, RowsAffected, Value};

    fn row() -> RowLabeled {
        let labels: RowNames = ["id".to_string(), "name".to_string()].into();
        RowLabeled::new(
            labels,
            [Value::Int64(Some(7)), Value::Varchar(Some("john".into()))].into(),
        )
    }

    #[test]
    fn column_lookup() {
        let row = row();
        assert_eq!(row.get_column("id"), Some(&Value::Int64(Some(7))));
        assert_eq!(
            row.get_column("NAME"),
            Some(&Value::Varchar(Some("john".into())))
        );
        assert_eq!(row.get_column("email"), None);
    }

    #[test]
    fn affected_totals() {
        let total = [
            RowsAffected { rows_affected: 2 }.into(),
            QueryResult::Row(row()),
            RowsAffected { rows_affected: 3 }.into(),
        ]
        .into_iter()
        .collect::<RowsAffected>();
        assert_eq!(total.rows_affected, 5);

        let mut total = RowsAffected::default();
        total.extend([RowsAffected { rows_affected: 1 }; 4]);
        total += RowsAffected { rows_affected: 10 };
        assert_eq!(total.rows_affected, 14);
    }
}
