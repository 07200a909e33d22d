use super::*;
use crate::error::{ErrorClass, ErrorOrigin};

fn list_err(fx: &Fixture, request: &ListRequest) -> crate::error::EngineError {
    RowQueryEngine::new(&fx.db)
        .list(fx.owner, request)
        .expect_err("list should be rejected")
}

#[test]
fn garbage_cursors_are_rejected_not_ignored() {
    let mut fx = Fixture::new();
    fx.insert(Some("row"), None);

    for garbage in ["nonsense", "zz", "00ff00", ""] {
        let mut request = ListRequest::for_table(fx.table);
        request.cursor = Some(garbage.to_string());

        let err = list_err(&fx, &request);
        assert_eq!(err.class, ErrorClass::Unsupported, "cursor {garbage:?}");
        assert_eq!(err.origin, ErrorOrigin::Cursor);
    }
}

#[test]
fn a_cursor_cannot_resume_under_a_different_filter() {
    let mut fx = Fixture::new();
    for i in 0..5 {
        fx.insert(Some(&format!("row{i}")), Some(f64::from(i)));
    }

    let mut request = ListRequest::for_table(fx.table);
    request.limit = Some(2);
    let page = fx.list(&request);
    let cursor = page.next_cursor.expect("first page should mint a cursor");

    // Same table, different predicate: the signature no longer matches.
    request.cursor = Some(cursor);
    request.overrides = filters(Conjunction::And, vec![gt(fx.amount, 1.0)]);

    let err = list_err(&fx, &request);
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert_eq!(err.origin, ErrorOrigin::Cursor);
}

#[test]
fn a_cursor_cannot_resume_under_a_different_sort() {
    let mut fx = Fixture::new();
    for i in 0..5 {
        fx.insert(Some(&format!("row{i}")), Some(f64::from(i)));
    }

    let mut request = ListRequest::for_table(fx.table);
    request.limit = Some(2);
    request.overrides = sort_by(fx.amount, SortDirection::Asc);
    let cursor = fx
        .list(&request)
        .next_cursor
        .expect("first page should mint a cursor");

    // Flipping direction is a different walk entirely.
    request.overrides = sort_by(fx.amount, SortDirection::Desc);
    request.cursor = Some(cursor.clone());
    assert_eq!(list_err(&fx, &request).class, ErrorClass::Unsupported);

    // So is dropping the sort.
    request.overrides = QueryOverrides::default();
    request.cursor = Some(cursor);
    assert_eq!(list_err(&fx, &request).class, ErrorClass::Unsupported);
}

#[test]
fn a_cursor_cannot_cross_tables() {
    let mut fx = Fixture::new();
    for i in 0..3 {
        fx.insert(Some(&format!("row{i}")), None);
    }

    let other = fx.db.create_table(
        fx.owner,
        "other",
        vec![Column::new("name", ColumnType::Text)],
    );
    fx.db
        .insert_row(other, BTreeMap::new())
        .expect("insert should succeed");

    let mut request = ListRequest::for_table(fx.table);
    request.limit = Some(1);
    let cursor = fx
        .list(&request)
        .next_cursor
        .expect("first page should mint a cursor");

    let mut crossed = ListRequest::for_table(other);
    crossed.cursor = Some(cursor);
    let err = list_err(&fx, &crossed);
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn a_minted_cursor_resumes_cleanly_under_the_same_spec() {
    let mut fx = Fixture::new();
    for i in 0..5 {
        fx.insert(Some(&format!("row{i}")), None);
    }

    let mut request = ListRequest::for_table(fx.table);
    request.limit = Some(2);
    let first = fx.list(&request);

    request.cursor = first.next_cursor;
    let second = fx.list(&request);
    assert_eq!(row_names(&second.rows, fx.name), vec!["row2", "row3"]);
}
