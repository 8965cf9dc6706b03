#[cfg(test)]
mod tests {
    use redbird_core::{ColumnKind, IndexDef, Value};
    use redbird_firebird::{NativeField, RdbConnection};
    use redbird_tests::{MockDatabase, init_logs, silent_logs};

    async fn connect(database: &MockDatabase) -> RdbConnection {
        database
            .driver()
            .connect("firebird://localhost/test.fdb")
            .await
            .expect("Could not connect to the mock database")
    }

    fn user_fields() -> Vec<NativeField> {
        vec![
            NativeField {
                name: "ID                             ".into(),
                sql_type: "bigint".into(),
                nullable: false,
                ..Default::default()
            },
            NativeField {
                name: "NAME                           ".into(),
                sql_type: "varchar".into(),
                length: Some(60),
                nullable: true,
                default: Some("DEFAULT 'anon'".into()),
                ..Default::default()
            },
            NativeField {
                name: "AGE                            ".into(),
                sql_type: "integer".into(),
                nullable: true,
                ..Default::default()
            },
        ]
    }

    #[tokio::test]
    async fn tables_and_views() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database
            .add_table("users")
            .add_table("teams")
            .add_view("active_users");
        assert_eq!(connection.tables().await.unwrap(), ["users", "teams"]);
        assert_eq!(connection.views().await.unwrap(), ["active_users"]);
        assert!(connection.table_exists("USERS").await.unwrap());
        assert!(connection.table_exists(" teams ").await.unwrap());
        assert!(!connection.table_exists("active_users").await.unwrap());
        assert!(database.statements().is_empty());
    }

    #[tokio::test]
    async fn indexes() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database
            .add_index("users", "RDB$PRIMARY1", true, &["id"])
            .add_index("users", "users_on_name", false, &["name"])
            .add_index("users", "users_on_team_id_email", true, &["team_id", "email"])
            .add_index("teams", "teams_on_name", true, &["name"]);
        assert_eq!(
            connection.indexes("users").await.unwrap(),
            [
                IndexDef {
                    table: "users".into(),
                    name: "users_on_name".into(),
                    unique: false,
                    columns: vec!["name".into()],
                },
                IndexDef {
                    table: "users".into(),
                    name: "users_on_team_id_email".into(),
                    unique: true,
                    columns: vec!["team_id".into(), "email".into()],
                },
            ]
        );
        assert!(connection.index_name_exists("users", "USERS_ON_NAME").await.unwrap());
        assert!(!connection.index_name_exists("users", "teams_on_name").await.unwrap());
        assert!(connection.index_exists("users", &["name"], None).await.unwrap());
        assert!(!connection.index_exists("users", &["name"], Some(true)).await.unwrap());
        assert!(
            connection
                .index_exists("users", &["team_id", "email"], Some(true))
                .await
                .unwrap()
        );
        assert!(!connection.index_exists("users", &["email", "team_id"], None).await.unwrap());
        assert!(!connection.index_exists("users", &["id"], None).await.unwrap());
    }

    #[tokio::test]
    async fn columns() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.set_columns("users", user_fields()).respond(
            "rdb$relation_constraints",
            &["RDB$FIELD_NAME"],
            vec![vec![Value::Varchar(Some("ID                             ".into()))]],
        );
        let columns = connection.columns("users").await.unwrap();
        assert_eq!(
            columns.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            ["id", "name", "age"]
        );
        assert!(columns[0].primary_key);
        assert!(!columns[0].nullable);
        assert_eq!(columns[0].column_type.kind, ColumnKind::Bigint);
        assert_eq!(columns[1].position, Some(1));
        assert!(!columns[1].primary_key);
        assert_eq!(columns[1].column_type.limit, Some(60));
        assert_eq!(columns[1].default, Some(Value::Varchar(Some("anon".into()))));
        assert_eq!(connection.primary_key("users").await.unwrap(), ["id"]);
        assert!(
            database
                .statements()
                .iter()
                .all(|v| v.contains("rdb$relation_constraints") && v.contains("'USERS'"))
        );

        let column = connection.column("users", "AGE").await.unwrap();
        assert_eq!(column.map(|v| v.column_type.kind), Some(ColumnKind::Integer));
        assert!(connection.column("users", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sequences() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database
            .add_generator("USERS_SEQ")
            .add_trigger("N$USERS")
            .respond(
                r#"SELECT max("ID") FROM "USERS""#,
                &["MAX"],
                vec![vec![Value::Int64(Some(41))]],
            )
            .respond("NEXT VALUE FOR", &["NEXT_VALUE"], vec![vec![Value::Int64(Some(42))]]);
        assert!(connection.sequence_exists("users_seq").await.unwrap());
        assert!(!connection.sequence_exists("teams_seq").await.unwrap());
        assert!(connection.trigger_exists("n$users").await.unwrap());

        connection
            .reset_sequence("users", "id", "users_seq")
            .await
            .expect("Could not reset the sequence");
        assert_eq!(
            database.statements(),
            [
                r#"SELECT max("ID") FROM "USERS""#,
                r#"ALTER SEQUENCE "USERS_SEQ" RESTART WITH 41"#,
            ]
        );
        assert_eq!(connection.next_sequence_value("users_seq").await.unwrap(), 42);

        database.clear();
        connection
            .reset_sequence("teams", "id", "teams_seq")
            .await
            .expect("Could not reset the sequence");
        assert_eq!(
            database.statements().last().map(String::as_str),
            Some(r#"ALTER SEQUENCE "TEAMS_SEQ" RESTART WITH 0"#)
        );
    }

    #[tokio::test]
    async fn missing_sequence_value() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let result;
        silent_logs! {
            result = connection.next_sequence_value("users_seq").await;
        }
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_information() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database
            .set_encoding("UTF8")
            .respond("ENGINE_VERSION", &["VERSION"], vec![vec![Value::Varchar(Some("5.0.1".into()))]]);
        assert_eq!(connection.database_version().await.unwrap(), "5.0.1");
        assert_eq!(connection.encoding(), "UTF8");
    }

    #[tokio::test]
    async fn truncate() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        let affected = connection.truncate("users").await.unwrap();
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(database.statements(), [r#"DELETE FROM "USERS""#]);
    }

    #[tokio::test]
    async fn insert_fixtures() {
        init_logs();
        let database = MockDatabase::new();
        let mut connection = connect(&database).await;
        database.set_columns("users", user_fields());
        let affected = connection
            .insert_fixtures(
                "users",
                [
                    vec![
                        ("id".to_string(), Value::Int64(Some(1))),
                        ("name".to_string(), Value::Varchar(Some("john".into()))),
                        ("age".to_string(), Value::Int32(Some(40))),
                    ],
                    vec![("AGE".to_string(), Value::Int32(Some(30)))],
                ],
            )
            .await
            .expect("Could not insert the fixtures");
        assert_eq!(affected.rows_affected, 2);
        let inserts = database
            .statements()
            .into_iter()
            .filter(|v| v.starts_with("INSERT"))
            .collect::<Vec<_>>();
        assert_eq!(
            inserts,
            [
                r#"INSERT INTO "USERS" ("ID", "NAME", "AGE") VALUES (?, ?, ?)"#,
                r#"INSERT INTO "USERS" ("ID", "NAME", "AGE") VALUES (?, ?, ?)"#,
            ]
        );
        assert_eq!(
            database.binds().last(),
            Some(&vec![
                Value::Null,
                Value::Varchar(Some("anon".into())),
                Value::Int32(Some(30)),
            ])
        );
    }
}
