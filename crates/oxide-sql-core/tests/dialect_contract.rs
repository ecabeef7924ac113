//! Tests for the dialect callbacks as seen by the query compiler.

mod common;
use common::{Numbered, Windowed};

use oxide_sql_core::{
    Dialect, Filter, GenericDialect, LikeFilter, LikeMode, ParamAllocator, SelectQuery, SqlValue,
};

#[test]
fn placeholders_follow_allocation_order() {
    let query = SelectQuery::from("orders")
        .filter(Filter::eq("status", "open"))
        .filter(Filter::in_list("region", vec!["eu", "us"]))
        .filter(Filter::contains("note", "rush"))
        .build(&Numbered);

    assert_eq!(
        query.sql(),
        "SELECT * FROM orders WHERE status = $1 AND region IN ($2, $3) AND note ILIKE '%' || $4 || '%'"
    );
    assert_eq!(
        query.params(),
        [
            SqlValue::Text("open".into()),
            SqlValue::Text("eu".into()),
            SqlValue::Text("us".into()),
            SqlValue::Text("rush".into()),
        ]
    );
}

#[test]
fn anonymous_markers_bind_by_position() {
    let query = SelectQuery::from("orders")
        .filter(Filter::gte("total", 100))
        .filter(Filter::ends_with("email", "@example.com"))
        .build(&GenericDialect);

    assert_eq!(query.sql().matches('?').count(), query.params().len());
    assert_eq!(query.params()[0], SqlValue::Int(100));
    assert_eq!(query.params()[1], SqlValue::Text("@example.com".into()));
}

#[test]
fn pagination_and_casts_come_from_the_dialect() {
    let query = SelectQuery::from("orders")
        .column_as_string("created_at")
        .order_by("-created_at")
        .limit(10)
        .offset(30)
        .build(&Windowed);
    assert_eq!(
        query.sql(),
        "SELECT STR(created_at) AS created_at FROM orders ORDER BY created_at DESC WINDOW 30..10"
    );

    let unpaged = SelectQuery::from("orders").build(&Windowed);
    assert_eq!(unpaged.sql(), "SELECT * FROM orders");
}

#[test]
fn like_modes_place_wildcards() {
    let cases = [
        (LikeMode::Contains, "c ILIKE '%' || $1 || '%'"),
        (LikeMode::Starts, "c ILIKE $1 || '%'"),
        (LikeMode::Ends, "c ILIKE '%' || $1"),
        (LikeMode::Exact, "c ILIKE $1"),
    ];
    for (mode, expected) in cases {
        let (sql, params) = LikeFilter::new("c", "v", mode).render(&Numbered);
        assert_eq!(sql, expected);
        assert_eq!(params, [SqlValue::Text("v".into())]);

        let (negated, _) = LikeFilter::new("c", "v", mode).negated(true).render(&Numbered);
        assert_eq!(negated, expected.replacen(" ILIKE", " NOT ILIKE", 1));
    }
}

#[test]
fn like_filter_continues_shared_allocator() {
    let mut params = ParamAllocator::new(&Numbered);
    let first = params.allocate(SqlValue::Int(1));
    let like = LikeFilter::new("name", "x", LikeMode::Exact).render_with(&mut params);

    assert_eq!(first, "$1");
    assert_eq!(like, "name ILIKE $2");
    assert_eq!(params.into_params().len(), 2);
}

#[test]
fn rendering_is_identical_across_threads() {
    let dialects: [&dyn Dialect; 2] = [&GenericDialect, &Numbered];
    for dialect in dialects {
        let filter = Filter::contains("title", "50% off")
            .and(Filter::is_not_null("published_at"))
            .or(Filter::raw("1 = 1", vec![]));
        let expected = filter.render(dialect);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| filter.render(dialect)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
