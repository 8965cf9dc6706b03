#[cfg(test)]
mod tests {
    use indoc::indoc;
    use redbird::{
        ColumnDef, ColumnKind, ColumnTypeDescriptor, Connection, Executor, Expression,
        InsertStatement, SelectStatement, TableDef, Transaction, Value,
        firebird::{RdbConnection, RdbError, SequenceOption},
        stream::TryStreamExt,
    };
    use redbird_tests::{MockDatabase, init_logs, silent_logs};

    fn products() -> TableDef {
        TableDef::with_id("products")
            .column(
                ColumnDef::new("name", ColumnTypeDescriptor::new(ColumnKind::String).limit(80))
                    .not_null()
                    .unique(),
            )
            .column(ColumnDef::new(
                "price",
                ColumnTypeDescriptor::new(ColumnKind::Decimal)
                    .precision(10)
                    .scale(2),
            ))
    }

    async fn insert_product(
        connection: &mut RdbConnection,
        name: &str,
        price: f64,
    ) -> redbird::Result<u64> {
        let insert = InsertStatement::new("products")
            .columns(["name", "price"])
            .values([Value::from(name), Value::Float64(Some(price))]);
        let query = connection.query(&insert.into())?;
        Ok(connection.execute(query).await?.rows_affected)
    }

    #[tokio::test]
    async fn migrate_and_query() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = database
            .driver()
            .connect("firebird://localhost/shop.fdb?create=true")
            .await
            .expect("Could not connect");
        assert!(!database.database_created());
        connection
            .create_table(&products(), SequenceOption::Default)
            .await
            .expect("Could not create the table");
        connection
            .assume_migrated_up_to(1, &[1])
            .await
            .expect("Could not record the migration");

        let mut transaction = connection.begin().await.expect("Could not begin");
        let inserted = insert_product(transaction.connection(), "lamp", 19.5).await.unwrap()
            + insert_product(transaction.connection(), "desk", 120.0).await.unwrap();
        assert_eq!(inserted, 2);
        transaction.commit().await.expect("Could not commit");

        database.respond(
            r#"FROM "PRODUCTS""#,
            &["ID", "NAME"],
            vec![
                vec![Value::Int64(Some(2)), Value::from("desk")],
                vec![Value::Int64(Some(1)), Value::from("lamp")],
            ],
        );
        let select = SelectStatement::new()
            .project([Expression::column("id"), Expression::column("name")])
            .from("products")
            .order_by(Expression::column("price").desc())
            .limit(10);
        let query = connection.query(&select.into()).unwrap();
        let names = connection
            .fetch(query)
            .map_ok(|row| row.get_column("name").and_then(Value::as_str).map(String::from))
            .try_collect::<Vec<_>>()
            .await
            .expect("Could not fetch the products");
        assert_eq!(names, [Some("desk".into()), Some("lamp".into())]);

        let statements = database.statements();
        assert_eq!(
            statements[0],
            r#"CREATE TABLE "PRODUCTS" ("ID" bigint not null primary key, "NAME" varchar(80) NOT NULL UNIQUE, "PRICE" decimal(10,2))"#
        );
        assert_eq!(statements[1], r#"CREATE SEQUENCE "PRODUCTS_SEQ""#);
        assert!(statements[2].starts_with(indoc! {r#"
            CREATE TRIGGER "N$PRODUCTS" FOR "PRODUCTS" ACTIVE BEFORE INSERT
            AS
        "#}));
        assert_eq!(
            &statements[3..],
            [
                r#"SELECT "VERSION" FROM "SCHEMA_MIGRATIONS""#,
                r#"INSERT INTO "SCHEMA_MIGRATIONS" ("VERSION") VALUES ('1')"#,
                r#"INSERT INTO "PRODUCTS" ("NAME", "PRICE") VALUES (?, ?)"#,
                r#"INSERT INTO "PRODUCTS" ("NAME", "PRICE") VALUES (?, ?)"#,
                r#"SELECT "ID", "NAME" FROM "PRODUCTS" ORDER BY "PRICE" DESC ROWS ?"#,
            ]
        );
        assert_eq!(
            database.events(),
            [
                "CONNECT",
                "SET TRANSACTION READ COMMITTED",
                "COMMIT",
                "SET TRANSACTION READ COMMITTED",
                "COMMIT",
            ]
        );
    }

    #[tokio::test]
    async fn failed_transaction() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = database
            .driver()
            .connect("firebird://localhost/shop.fdb")
            .await
            .expect("Could not connect");
        database.fail_on(
            r#"INSERT INTO "PRODUCTS""#,
            "attempt to store duplicate value (visible to active transactions) in unique index \"PRODUCTS_ON_NAME\"",
        );
        let result;
        silent_logs! {
            let mut transaction = connection.begin().await.expect("Could not begin");
            result = insert_product(transaction.connection(), "lamp", 19.5).await;
            transaction.rollback().await.expect("Could not roll back");
        }
        let error = result.expect_err("The insert should fail");
        assert!(matches!(
            error.downcast_ref::<RdbError>(),
            Some(RdbError::UniquenessViolation(..))
        ));
        assert_eq!(
            database.events(),
            ["CONNECT", "SET TRANSACTION READ COMMITTED", "ROLLBACK"]
        );
        assert!(!connection.in_transaction());
    }
}
