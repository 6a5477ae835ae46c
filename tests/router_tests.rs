use http::Method;
use routekit::router::compare_paths;
use routekit::{HandlerRef, MatchResult, RouteTable, RouterError};

mod common;
use common::routes::template;

fn zoo_table() -> RouteTable {
    let table = RouteTable::new();
    table
        .register_all([
            template(Method::GET, "/", "Zoo", "root"),
            template(Method::GET, "/zoo/animals", "Zoo", "list_animals"),
            template(Method::POST, "/zoo/animals", "Zoo", "create_animal"),
            template(Method::GET, "/zoo/animals/{id}", "Zoo", "get_animal"),
            template(Method::PUT, "/zoo/animals/{id}", "Zoo", "update_animal"),
            template(Method::DELETE, "/zoo/animals/{id}", "Zoo", "delete_animal"),
            template(Method::HEAD, "/zoo/health", "Zoo", "health_check"),
            template(Method::GET, "/zoo/files/{path*}", "Zoo", "file"),
        ])
        .unwrap();
    table
}

fn action(result: MatchResult) -> Option<String> {
    result.into_match().map(|m| m.handler().action().to_string())
}

#[test]
fn test_verb_zoo() {
    let table = zoo_table();
    let cases = [
        (Method::GET, "/", Some("root")),
        (Method::GET, "/zoo/animals", Some("list_animals")),
        (Method::POST, "/zoo/animals", Some("create_animal")),
        (Method::GET, "/zoo/animals/7", Some("get_animal")),
        (Method::PUT, "/zoo/animals/7", Some("update_animal")),
        (Method::DELETE, "/zoo/animals/7", Some("delete_animal")),
        (Method::HEAD, "/zoo/health", Some("health_check")),
        (Method::GET, "/zoo/files/a/b", Some("file")),
        (Method::GET, "/zoo/missing", None),
    ];
    for (method, path, expected) in cases {
        let got = action(table.match_route(&method, path).unwrap());
        assert_eq!(got.as_deref(), expected, "{method} {path}");
    }
}

#[test]
fn test_literal_template_matches_exactly() {
    let table = zoo_table();
    let m = table
        .match_route(&Method::GET, "/zoo/animals")
        .unwrap()
        .into_match()
        .unwrap();
    assert!(m.path_params.is_empty());

    for near_miss in ["/zoo/animal", "/zoo/animalz", "/Zoo/animals", "/zoo/animals/"] {
        assert!(
            matches!(
                table.match_route(&Method::GET, near_miss).unwrap(),
                MatchResult::NoMatchingPath
            ),
            "{near_miss}"
        );
    }
}

#[test]
fn test_trailing_slash_is_a_different_route() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo", "C", "plain")).unwrap();
    table.register(template(Method::GET, "/foo/", "C", "slashed")).unwrap();

    assert_eq!(action(table.match_route(&Method::GET, "/foo").unwrap()).as_deref(), Some("plain"));
    assert_eq!(action(table.match_route(&Method::GET, "/foo/").unwrap()).as_deref(), Some("slashed"));
}

#[test]
fn test_single_segment_placeholder() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo/{id}", "C", "show")).unwrap();

    let m = table.match_route(&Method::GET, "/foo/42").unwrap().into_match().unwrap();
    assert_eq!(m.get_path_param("id"), Some("42"));
    assert_eq!(m.path_params_map().get("id").map(String::as_str), Some("42"));

    assert!(matches!(
        table.match_route(&Method::GET, "/foo/42/43").unwrap(),
        MatchResult::NoMatchingPath
    ));
}

#[test]
fn test_greedy_placeholder_takes_the_rest() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo/{path*}", "C", "rest")).unwrap();

    let m = table.match_route(&Method::GET, "/foo/a/b/c").unwrap().into_match().unwrap();
    assert_eq!(m.get_path_param("path"), Some("a/b/c"));
}

#[test]
fn test_literal_route_wins_over_placeholder() {
    for literal_first in [true, false] {
        let table = RouteTable::new();
        let literal = template(Method::GET, "/foo/bar", "C", "literal");
        let placeholder = template(Method::GET, "/foo/{id}", "C", "placeholder");
        if literal_first {
            table.register_all([literal, placeholder]).unwrap();
        } else {
            table.register_all([placeholder, literal]).unwrap();
        }
        assert_eq!(
            action(table.match_route(&Method::GET, "/foo/bar").unwrap()).as_deref(),
            Some("literal")
        );
    }
}

#[test]
fn test_method_mismatch_is_not_a_missing_path() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo", "C", "get")).unwrap();

    let result = table.match_route(&Method::POST, "/foo").unwrap();
    assert_eq!(result.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    match result {
        MatchResult::MethodNotAllowed { allowed } => assert_eq!(allowed, vec![Method::GET]),
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
    assert_eq!(
        table.match_route(&Method::POST, "/bar").unwrap().status(),
        http::StatusCode::NOT_FOUND
    );
}

#[test]
fn test_reverse_route_round_trip() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo/{id}/{name}", "H", "show")).unwrap();
    let handler = HandlerRef::new("H", "show");

    let uri = table
        .reverse_route_for(&handler, [("id", "1"), ("name", "x")])
        .unwrap();
    assert_eq!(uri, "/foo/1/x");

    let m = table.match_route(&Method::GET, &uri).unwrap().into_match().unwrap();
    assert_eq!(m.handler(), &handler);
    assert_eq!(m.get_path_param("id"), Some("1"));
    assert_eq!(m.get_path_param("name"), Some("x"));
}

#[test]
fn test_ordering_law() {
    let expected = ["/", "/foo", "/foo/", "/foo/bar", "/fooa"];
    let mut shuffled = vec!["/fooa", "/foo/bar", "/", "/foo/", "/foo"];
    shuffled.sort_by(|a, b| compare_paths(a, b));
    assert_eq!(shuffled, expected);
}

#[test]
fn test_duplicate_registration_leaves_table_unchanged() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo", "A", "first")).unwrap();
    let before = table.all_routes().len();

    let err = table.register(template(Method::GET, "/foo", "B", "second")).unwrap_err();
    assert_eq!(
        err,
        RouterError::DuplicateRoute {
            method: "GET".to_string(),
            uri: "/foo".to_string(),
            existing: "A#first".to_string(),
        }
    );
    assert_eq!(table.all_routes().len(), before);
    assert_eq!(
        action(table.match_route(&Method::GET, "/foo").unwrap()).as_deref(),
        Some("first")
    );

    // Same URI with another method is not a duplicate
    table.register(template(Method::POST, "/foo", "B", "second")).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_register_all_is_all_or_nothing() {
    let table = RouteTable::new();
    let err = table
        .register_all([
            template(Method::GET, "/a", "C", "a"),
            template(Method::GET, "/b/{x}/{x}", "C", "b"),
        ])
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidRouteTemplate { .. }));
    assert!(table.is_empty());

    let err = table
        .register_all([
            template(Method::GET, "/a", "C", "a"),
            template(Method::GET, "/a", "C", "again"),
        ])
        .unwrap_err();
    assert!(matches!(err, RouterError::DuplicateRoute { .. }));
    assert!(table.is_empty());
}

#[test]
fn test_unregister_by_identity() {
    let table = RouteTable::new();
    let route = table.register(template(Method::GET, "/foo", "C", "a")).unwrap();
    table.register(template(Method::GET, "/bar", "C", "b")).unwrap();

    assert!(table.unregister(&route));
    assert!(!table.unregister(&route));
    assert_eq!(table.len(), 1);
    assert!(matches!(
        table.match_route(&Method::GET, "/foo").unwrap(),
        MatchResult::NoMatchingPath
    ));

    // The URI is free again
    table.register(template(Method::GET, "/foo", "D", "c")).unwrap();
}

#[test]
fn test_snapshot_is_unaffected_by_later_changes() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo", "C", "a")).unwrap();
    let snapshot = table.snapshot();

    table.clear();
    assert!(table.is_empty());
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.match_route(&Method::GET, "/foo").unwrap().is_match());
}

#[test]
fn test_sorted_routes_follow_the_comparator() {
    let table = zoo_table();
    let uris: Vec<String> = table
        .sorted_routes()
        .iter()
        .map(|r| r.uri().to_string())
        .collect();
    assert_eq!(uris[0], "/");
    assert!(uris.windows(2).all(|w| compare_paths(&w[0], &w[1]).is_le()));

    let registered: Vec<String> = table.all_routes().iter().map(|r| r.uri().to_string()).collect();
    assert_eq!(registered[1], "/zoo/animals");
}

#[test]
fn test_percent_encoded_values_are_decoded() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/users/{email}", "U", "show")).unwrap();

    let m = table
        .match_route(&Method::GET, "/users/foo%40aol.com")
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.get_path_param("email"), Some("foo@aol.com"));
}
