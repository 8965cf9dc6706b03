#[cfg(test)]
mod tests {
    use indoc::indoc;
    use redbird_core::{ColumnDef, ColumnKind, ColumnTypeDescriptor, TableDef, Value};
    use redbird_firebird::{
        ChangeColumnOptions, DdlOutcome, NativeField, RdbConnection, RdbError, RewriteStep,
        SequenceBinding, SequenceOption, default_sequence_name, index_name, trigger_name,
    };
    use redbird_tests::{MockDatabase, init_logs, silent_logs};

    async fn connect(database: &MockDatabase) -> RdbConnection {
        database
            .driver()
            .connect("firebird://localhost/test.fdb")
            .await
            .expect("Could not connect to the mock database")
    }

    fn users() -> TableDef {
        TableDef::with_id("users").column(
            ColumnDef::new("name", ColumnTypeDescriptor::new(ColumnKind::String).limit(60))
                .not_null(),
        )
    }

    #[test]
    fn generated_names() {
        assert_eq!(default_sequence_name("users"), "users_seq");
        assert_eq!(default_sequence_name("order-lines"), "order_lines_seq");
        assert_eq!(
            default_sequence_name("a_table_name_well_beyond_the_limit"),
            "a_table_name_well_beyond_th_seq"
        );
        assert_eq!(trigger_name("users"), "N$USERS");
        assert_eq!(
            trigger_name("a_table_name_well_beyond_the_limit"),
            "N$A_TABLE_NAME_WELL_BEYOND_THE_"
        );
        assert_eq!(index_name("users", &["name"]), "users_on_name");
        assert_eq!(index_name("users", &["last_name", "age"]), "users_on_last_name_age");

        let long = index_name("customer_addresses", &["country_code", "postal_code"]);
        assert!(long.starts_with("IDX_"), "{}", long);
        assert_eq!(long.len(), 27);
        assert_eq!(
            long,
            index_name("customer_addresses", &["country_code", "postal_code"])
        );
        assert_ne!(
            long,
            index_name("customer_addresses", &["postal_code", "country_code"])
        );

        assert_eq!(
            SequenceBinding::for_table("users", &SequenceOption::Named("ids".into())),
            Some(SequenceBinding {
                table: "users".into(),
                sequence: "ids".into(),
                trigger: "N$USERS".into(),
            })
        );
        assert_eq!(
            SequenceBinding::for_table("users", &SequenceOption::Disabled),
            None
        );
    }

    #[tokio::test]
    async fn create_table() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let binding = connection
            .create_table(&users(), SequenceOption::Default)
            .await
            .expect("Could not create the table");
        assert_eq!(
            binding,
            Some(SequenceBinding {
                table: "users".into(),
                sequence: "users_seq".into(),
                trigger: "N$USERS".into(),
            })
        );
        let statements = database.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0],
            r#"CREATE TABLE "USERS" ("ID" bigint not null primary key, "NAME" varchar(60) NOT NULL)"#
        );
        assert_eq!(statements[1], r#"CREATE SEQUENCE "USERS_SEQ""#);
        assert_eq!(
            statements[2],
            indoc! {r#"
                CREATE TRIGGER "N$USERS" FOR "USERS" ACTIVE BEFORE INSERT
                AS
                DECLARE VARIABLE gen_val BIGINT;
                BEGIN
                  IF (new."ID" IS NULL) THEN
                    new."ID" = NEXT VALUE FOR "USERS_SEQ";
                  ELSE BEGIN
                    gen_val = GEN_ID("USERS_SEQ", 0);
                    IF (new."ID" > gen_val) THEN
                      gen_val = GEN_ID("USERS_SEQ", new."ID" - gen_val);
                  END
                END
            "#}
            .trim_end()
        );
    }

    #[tokio::test]
    async fn existing_sequence() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.fail_on(
            "CREATE SEQUENCE",
            "unsuccessful metadata update\n-CREATE SEQUENCE USERS_SEQ failed\n-Sequence USERS_SEQ already exists",
        );
        let result;
        silent_logs! {
            result = connection.create_table(&users(), SequenceOption::Default).await;
        }
        assert!(result.expect("The sequence failure is swallowed").is_some());
        assert_eq!(database.statements().len(), 3);

        database.clear();
        let outcome;
        silent_logs! {
            outcome = connection.create_sequence("users_seq").await;
        }
        assert_eq!(outcome, DdlOutcome::Failed);
    }

    #[tokio::test]
    async fn table_without_sequence() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let binding = connection
            .create_table(&users(), SequenceOption::Disabled)
            .await
            .expect("Could not create the table");
        assert_eq!(binding, None);
        assert_eq!(database.statements().len(), 1);

        database.clear();
        let table = TableDef::new("notes").column(ColumnDef::new("body", ColumnKind::Text));
        let binding = connection
            .create_table(&table, SequenceOption::Default)
            .await
            .expect("Could not create the table");
        assert_eq!(binding, None);
        assert_eq!(
            database.statements(),
            [r#"CREATE TABLE "NOTES" ("BODY" blob sub_type text)"#]
        );
    }

    #[tokio::test]
    async fn unsupported_tables() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let mut table = users();
        table.temporary = true;
        let result;
        silent_logs! {
            result = connection.create_table(&table, SequenceOption::Default).await;
        }
        let error = result.expect_err("Temporary tables are not supported");
        assert!(matches!(
            error.downcast_ref::<RdbError>(),
            Some(RdbError::UnsupportedSyntax(..))
        ));
        assert!(database.statements().is_empty());
    }

    #[tokio::test]
    async fn drop_table() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        connection
            .drop_table("users", SequenceOption::Default)
            .await
            .expect("A missing table is not an error");
        assert!(database.statements().is_empty());

        database
            .add_table("users")
            .add_trigger("N$USERS")
            .add_generator("USERS_SEQ");
        connection
            .drop_table("users", SequenceOption::Default)
            .await
            .expect("Could not drop the table");
        assert_eq!(
            database.statements(),
            [
                r#"DROP TRIGGER "N$USERS""#,
                r#"DROP SEQUENCE "USERS_SEQ""#,
                r#"DROP TABLE "USERS""#,
            ]
        );
        assert_eq!(
            connection.drop_sequence("other_seq").await,
            DdlOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn add_column() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let column =
            ColumnDef::new("email", ColumnTypeDescriptor::new(ColumnKind::String).limit(120))
                .position(1);
        connection
            .add_column("users", &column, SequenceOption::Default)
            .await
            .expect("Could not add the column");
        assert_eq!(
            database.statements(),
            [
                r#"ALTER TABLE "USERS" ADD "EMAIL" varchar(120)"#,
                r#"ALTER TABLE "USERS" ALTER COLUMN "EMAIL" POSITION 2"#,
            ]
        );

        database.clear();
        connection
            .add_column(
                "teams",
                &ColumnDef::new("id", ColumnKind::PrimaryKey),
                SequenceOption::Default,
            )
            .await
            .expect("Could not add the key");
        assert_eq!(
            database.statements(),
            [
                r#"ALTER TABLE "TEAMS" ADD "ID" bigint not null primary key"#,
                r#"CREATE SEQUENCE "TEAMS_SEQ""#,
            ]
        );
    }

    #[tokio::test]
    async fn rewrite_text_column() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.add_index("users", "users_on_name", false, &["name"]);
        connection
            .change_column(
                "users",
                "name",
                &ColumnTypeDescriptor::new(ColumnKind::String).limit(120),
                ChangeColumnOptions::default(),
            )
            .await
            .expect("Could not change the column");
        assert_eq!(
            database.statements(),
            [
                r#"ALTER TABLE "USERS" ADD "C_TEMP" varchar(120)"#,
                r#"UPDATE "USERS" SET "C_TEMP" = "NAME""#,
                r#"DROP INDEX "USERS_ON_NAME""#,
                r#"ALTER TABLE "USERS" DROP "NAME""#,
                r#"ALTER TABLE "USERS" ALTER "C_TEMP" TO "NAME""#,
            ]
        );
    }

    #[tokio::test]
    async fn interrupted_rewrite() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.fail_on(
            r#"DROP "NAME""#,
            "unsuccessful metadata update\n-object TABLE \"USERS\" is in use",
        );
        let result;
        silent_logs! {
            result = connection
                .change_column(
                    "users",
                    "name",
                    &ColumnKind::Text.into(),
                    ChangeColumnOptions::default(),
                )
                .await;
        }
        let error = result.expect_err("The rewrite should stop");
        assert!(matches!(
            error.downcast_ref::<RdbError>(),
            Some(RdbError::ColumnRewrite {
                step: RewriteStep::DataCopied,
                ..
            })
        ));
        assert!(format!("{:#}", error).contains("is in use"));
        assert_eq!(database.statements().len(), 3);
        assert_eq!(
            database.statements().last().map(String::as_str),
            Some(r#"ALTER TABLE "USERS" DROP "NAME""#)
        );
    }

    #[tokio::test]
    async fn change_column_type() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        connection
            .change_column(
                "users",
                "age",
                &ColumnKind::Bigint.into(),
                ChangeColumnOptions {
                    nullable: Some(true),
                    default: Some(Some(Value::Int64(Some(0)))),
                },
            )
            .await
            .expect("Could not change the column");
        assert_eq!(
            database.statements(),
            [
                r#"ALTER TABLE "USERS" ALTER COLUMN "AGE" TYPE bigint"#,
                r#"ALTER TABLE "USERS" ALTER "AGE" SET DEFAULT 0"#,
                r#"ALTER TABLE "USERS" ALTER "AGE" DROP NOT NULL"#,
            ]
        );
    }

    #[tokio::test]
    async fn column_defaults() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        connection
            .change_column_default("users", "age", None)
            .await
            .expect("Nothing to remove is not an error");
        assert!(
            !database.statements().iter().any(|v| v.starts_with("ALTER")),
            "No default to remove"
        );

        connection
            .change_column_default("users", "age", Some(Value::Int32(Some(18))))
            .await
            .expect("Could not set the default");
        assert_eq!(
            database.statements().last().map(String::as_str),
            Some(r#"ALTER TABLE "USERS" ALTER "AGE" SET DEFAULT 18"#)
        );
    }

    #[tokio::test]
    async fn column_not_null() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.set_columns(
            "users",
            vec![NativeField {
                name: "AGE".into(),
                sql_type: "integer".into(),
                nullable: true,
                ..Default::default()
            }],
        );
        connection
            .change_column_null("users", "age", false, Some(Value::Int32(Some(0))))
            .await
            .expect("Could not change the column");
        let statements = database
            .statements()
            .into_iter()
            .filter(|v| !v.contains("rdb$relation_constraints"))
            .collect::<Vec<_>>();
        assert_eq!(
            statements,
            [
                r#"UPDATE "USERS" SET "AGE" = 0 WHERE "AGE" IS NULL"#,
                r#"ALTER TABLE "USERS" ADD "C_TEMP" integer DEFAULT 0 NOT NULL"#,
                r#"UPDATE "USERS" SET "C_TEMP" = "AGE""#,
                r#"ALTER TABLE "USERS" DROP "AGE""#,
                r#"ALTER TABLE "USERS" ALTER "C_TEMP" TO "AGE""#,
            ]
        );

        database.clear();
        connection
            .change_column_null("users", "age", true, None)
            .await
            .expect("Could not change the column");
        assert_eq!(
            database.statements(),
            [r#"ALTER TABLE "USERS" ALTER "AGE" DROP NOT NULL"#]
        );
    }

    #[tokio::test]
    async fn domain_column_not_null() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.set_columns(
            "orders",
            vec![
                NativeField {
                    name: "TOTAL".into(),
                    sql_type: "numeric".into(),
                    precision: Some(12),
                    scale: Some(-2),
                    nullable: true,
                    domain: Some("D_MONEY                        ".into()),
                    ..Default::default()
                },
                NativeField {
                    name: "NOTE".into(),
                    sql_type: "varchar".into(),
                    length: Some(40),
                    nullable: true,
                    domain: Some("RDB$12".into()),
                    ..Default::default()
                },
            ],
        );
        connection
            .change_column_null("orders", "total", false, Some(Value::Int32(Some(0))))
            .await
            .expect("Could not change the column");
        let add = r#"ALTER TABLE "ORDERS" ADD "C_TEMP" "D_MONEY" DEFAULT 0 NOT NULL"#;
        assert!(database.statements().iter().any(|v| v == add));

        database.clear();
        connection
            .change_column_null("orders", "note", false, Some(Value::from("-")))
            .await
            .expect("Could not change the column");
        let add = r#"ALTER TABLE "ORDERS" ADD "C_TEMP" varchar(40) DEFAULT '-' NOT NULL"#;
        assert!(database.statements().iter().any(|v| v == add));
    }

    #[tokio::test]
    async fn rename_column() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database
            .add_index("users", "users_on_name", true, &["name"])
            .add_index("users", "by_team", false, &["team_id", "name"])
            .add_index("users", "RDB$PRIMARY1", true, &["id"]);
        connection
            .rename_column("users", "name", "full_name")
            .await
            .expect("Could not rename the column");
        assert_eq!(
            database.statements(),
            [
                r#"ALTER TABLE "USERS" ALTER "NAME" TO "FULL_NAME""#,
                r#"DROP INDEX "USERS_ON_NAME""#,
                r#"CREATE UNIQUE INDEX "USERS_ON_FULL_NAME" ON "USERS" ("FULL_NAME")"#,
                r#"DROP INDEX "BY_TEAM""#,
                r#"CREATE INDEX "BY_TEAM" ON "USERS" ("TEAM_ID", "FULL_NAME")"#,
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_migrations() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let result;
        silent_logs! {
            result = connection.assume_migrated_up_to(5, &[1, 2, 2, 5]).await;
        }
        let error = result.expect_err("The duplicate must be reported");
        assert!(matches!(
            error.downcast_ref::<RdbError>(),
            Some(RdbError::DuplicateMigrationVersion(2))
        ));
        assert_eq!(
            database.statements(),
            [r#"SELECT "VERSION" FROM "SCHEMA_MIGRATIONS""#]
        );
        assert_eq!(database.events(), ["CONNECT"]);
    }

    #[tokio::test]
    async fn recorded_duplicate_migrations() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.respond(
            r#"FROM "SCHEMA_MIGRATIONS""#,
            &["VERSION"],
            vec![vec![Value::Varchar(Some("1".into()))]],
        );
        connection
            .assume_migrated_up_to(3, &[1, 1, 2])
            .await
            .expect("Recorded versions must not count as duplicates");
        assert_eq!(
            database.statements(),
            [
                r#"SELECT "VERSION" FROM "SCHEMA_MIGRATIONS""#,
                r#"INSERT INTO "SCHEMA_MIGRATIONS" ("VERSION") VALUES ('2')"#,
                r#"INSERT INTO "SCHEMA_MIGRATIONS" ("VERSION") VALUES ('3')"#,
            ]
        );
    }

    #[tokio::test]
    async fn assume_migrated() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.respond(
            r#"FROM "SCHEMA_MIGRATIONS""#,
            &["VERSION"],
            vec![vec![Value::Varchar(Some("1".into()))]],
        );
        connection
            .assume_migrated_up_to(3, &[1, 2, 3, 4])
            .await
            .expect("Could not record the migrations");
        assert_eq!(
            database.statements(),
            [
                r#"SELECT "VERSION" FROM "SCHEMA_MIGRATIONS""#,
                r#"INSERT INTO "SCHEMA_MIGRATIONS" ("VERSION") VALUES ('2')"#,
                r#"INSERT INTO "SCHEMA_MIGRATIONS" ("VERSION") VALUES ('3')"#,
            ]
        );
        assert_eq!(
            database.events(),
            ["CONNECT", "SET TRANSACTION READ COMMITTED", "COMMIT"]
        );
        assert!(!connection.in_transaction());
    }
}
