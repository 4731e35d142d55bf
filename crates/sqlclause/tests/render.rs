use sqlclause::{
    BuilderConfig, ColumnSet, Conjunction, Dialect, MapParams, NoParams, QueryBuilder, SelectClause,
    SqlError, StaticMetadata, TableSchema, WhereClause,
};

fn metadata() -> StaticMetadata {
    StaticMetadata::new()
        .with_table(
            TableSchema::new("test_items")
                .in_schema("gg")
                .with_columns(&["id", "name", "is_active", "secret", "remarks"]),
        )
        .with_table(
            TableSchema::new("test_join")
                .in_schema("gg")
                .with_columns(&["id", "t_id", "description"]),
        )
}

fn scenario_params() -> MapParams {
    MapParams::new().with("name", "Abc").with("is_active", true)
}

/// Items joined to their join rows, with an optional name filter.
fn configure_items_select(select: &mut SelectClause) {
    select
        .from_as("test_items", "t")
        .left_join("test_join", Some("tj"), "t.id = tj.t_id")
        .all_from("t")
        .all_from("tj")
        .except_all(["t.is_active", "t.secret", "tj.id", "tj.t_id"]);
    select
        .where_clause()
        .add("is_active = :is_active")
        .add_if(|p| p.has_value("name"), "name = :name");
}

#[test]
fn select_with_join_and_conditional_where() {
    let mut qb = QueryBuilder::default().with_schema("gg").with_delimiter("&&");
    configure_items_select(qb.select_query());

    let sql = qb.build(&scenario_params(), &metadata()).unwrap();
    assert_eq!(
        sql,
        "SELECT t.id,t.name,t.remarks,tj.description&&FROM gg.test_items AS t\
         &&LEFT JOIN gg.test_join AS tj ON (t.id = tj.t_id)\
         &&WHERE (is_active = :is_active)&&AND (name = :name)"
    );
}

#[test]
fn conditional_fragment_drops_out_when_unbound() {
    let mut qb = QueryBuilder::default().with_schema("gg").with_delimiter("&&");
    configure_items_select(qb.select_query());

    let params = MapParams::new().with("is_active", true);
    let sql = qb.build(&params, &metadata()).unwrap();
    assert!(sql.ends_with("&&WHERE (is_active = :is_active)"));
    assert!(!sql.contains(":name"));
}

#[test]
fn paged_subquery_wrapper() {
    let mut qb = QueryBuilder::default()
        .with_schema("gg")
        .with_delimiter("&&")
        .with_dialect(Dialect::Postgres);
    let outer = qb.select_query();
    let inner = outer.subquery();
    configure_items_select(inner);
    inner.order_by_with(["t.id"], &[true]);
    outer.page(0, 20);

    let sql = qb.build(&scenario_params(), &metadata()).unwrap();
    assert_eq!(
        sql,
        "SELECT &&(SELECT t.id,t.name,t.remarks,tj.description&&FROM gg.test_items AS t\
         &&LEFT JOIN gg.test_join AS tj ON (t.id = tj.t_id)\
         &&WHERE (is_active = :is_active)&&AND (name = :name)\
         &&ORDER BY t.id DESC)&&OFFSET 0 LIMIT 20"
    );
}

#[test]
fn rendering_is_deterministic() {
    let mut qb = QueryBuilder::default().with_schema("gg");
    configure_items_select(qb.select_query());
    let params = scenario_params();
    let meta = metadata();

    let first = qb.build(&params, &meta).unwrap();
    for _ in 0..10 {
        assert_eq!(qb.build(&params, &meta).unwrap(), first);
    }
}

#[test]
fn render_reflects_current_metadata() {
    let mut qb = QueryBuilder::default().with_delimiter(" ");
    qb.select("items");

    let mut meta = StaticMetadata::new();
    meta.register(TableSchema::new("items").with_columns(&["id", "name"]));
    assert_eq!(qb.build(&NoParams, &meta).unwrap(), "SELECT id,name FROM items");

    meta.register(TableSchema::new("items").with_columns(&["id", "name", "added"]));
    assert_eq!(
        qb.build(&NoParams, &meta).unwrap(),
        "SELECT id,name,added FROM items"
    );
}

#[test]
fn excluded_columns_never_projected() {
    let exclusions = [
        vec!["secret"],
        vec!["t.secret", "tj.description"],
        vec!["test_items.secret", "test_join.t_id", "remarks"],
    ];
    for rules in exclusions {
        let mut qb = QueryBuilder::default().with_schema("gg").with_delimiter(" ");
        qb.select_as("test_items", "t")
            .left_join("test_join", Some("tj"), "t.id = tj.t_id")
            .all_from_main()
            .all_from("tj")
            .except_all(rules.iter().copied());

        let sql = qb.build(&NoParams, &metadata()).unwrap();
        let projection = sql
            .strip_prefix("SELECT ")
            .and_then(|s| s.split(" FROM ").next())
            .unwrap();
        for item in projection.split(',') {
            let (alias, column) = item.split_once('.').unwrap();
            let table = if alias == "t" { "test_items" } else { "test_join" };
            for rule in &rules {
                assert_ne!(*rule, column, "{item} matched bare rule");
                assert_ne!(*rule, format!("{alias}.{column}"), "{item} matched alias rule");
                assert_ne!(*rule, format!("{table}.{column}"), "{item} matched table rule");
            }
        }
    }
}

#[test]
fn where_group_and_conjunction_counts() {
    for n in 1..6 {
        for conj in [Conjunction::And, Conjunction::Or] {
            let mut clause = WhereClause::from_conditions((0..n).map(|i| format!("c{i} = :c{i}")));
            clause.set_conjunction(conj);

            let mut qb = QueryBuilder::default().with_delimiter(" ");
            qb.select_columns("items", ["id"]).set_where(clause);
            let meta = StaticMetadata::new().with_table(TableSchema::new("items").with_columns(&["id"]));
            let sql = qb.build(&NoParams, &meta).unwrap();

            let body = sql.split_once("WHERE ").unwrap().1;
            assert_eq!(body.matches('(').count(), n);
            assert_eq!(body.matches(')').count(), n);
            let tokens: Vec<&str> = body
                .split_whitespace()
                .filter(|t| *t == "AND" || *t == "OR")
                .collect();
            assert_eq!(tokens.len(), n - 1);
            assert!(tokens.iter().all(|t| *t == conj.as_str()));
        }
    }
}

#[test]
fn delete_requires_where() {
    let mut qb = QueryBuilder::default();
    qb.delete("test_items");
    let err = qb.build(&NoParams, &metadata()).unwrap_err();
    assert!(matches!(err, SqlError::MissingWhere { ref table } if table == "test_items"));
}

#[test]
fn paging_position_by_dialect() {
    let meta = metadata();
    for dialect in [Dialect::Default, Dialect::Postgres, Dialect::SqlServer] {
        let mut qb = QueryBuilder::default()
            .with_schema("gg")
            .with_delimiter(" ")
            .with_dialect(dialect);
        qb.select_columns("test_items", ["id", "name"])
            .order_by(["id"])
            .page(40, 20)
            .where_clause()
            .add("is_active");

        let sql = qb.build(&NoParams, &meta).unwrap();
        match dialect {
            Dialect::SqlServer => assert_eq!(
                sql,
                "SELECT TOP 20 OFFSET 40 id,name FROM gg.test_items WHERE (is_active) ORDER BY id"
            ),
            Dialect::Default | Dialect::Postgres => assert_eq!(
                sql,
                "SELECT id,name FROM gg.test_items WHERE (is_active) ORDER BY id OFFSET 40 LIMIT 20"
            ),
        }
    }
}

#[test]
fn update_and_insert_use_metadata_columns() {
    let meta = metadata();
    let config = BuilderConfig::new().with_schema("gg").with_delimiter(" ");

    let mut qb = QueryBuilder::new(config.clone());
    qb.update_with_id("test_join", "id");
    assert_eq!(
        qb.build(&NoParams, &meta).unwrap(),
        "UPDATE gg.test_join SET t_id=:t_id,description=:description WHERE (id = :id)"
    );

    let mut qb = QueryBuilder::new(config);
    qb.insert_with_id("test_join", "id");
    assert_eq!(
        qb.build(&NoParams, &meta).unwrap(),
        "INSERT INTO gg.test_join (t_id,description) VALUES (:t_id,:description)"
    );
}

#[test]
fn insert_select_copies_rows() {
    let mut qb = QueryBuilder::default().with_schema("gg").with_delimiter(" ");
    let insert = qb.insert("test_join");
    insert.set_columns(["t_id", "description"]);
    insert
        .from_select()
        .add_all(["id", "name"])
        .from("test_items")
        .where_clause()
        .add("is_active = :is_active");

    assert_eq!(
        qb.build(&scenario_params(), &metadata()).unwrap(),
        "INSERT INTO gg.test_join (t_id,description) SELECT id,name FROM gg.test_items WHERE (is_active = :is_active)"
    );
}

#[test]
fn missing_metadata_is_reported() {
    let mut qb = QueryBuilder::default().with_schema("other");
    qb.select("test_items");
    let err = qb.build(&NoParams, &metadata()).unwrap_err();
    assert!(err.is_metadata());
    assert_eq!(err.to_string(), "Metadata error: Unknown table: other.test_items");
}

#[test]
fn config_from_toml_drives_rendering() {
    let config = BuilderConfig::from_toml_str(
        r#"
schema = "gg"
dialect = "mssql"
delimiter = " "
"#,
    )
    .unwrap();
    let mut qb = QueryBuilder::new(config);
    qb.select_columns("test_items", ["id"]).page(0, 5);
    assert_eq!(
        qb.build(&NoParams, &metadata()).unwrap(),
        "SELECT TOP 5 OFFSET 0 id FROM gg.test_items"
    );
}
