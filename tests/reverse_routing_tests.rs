use http::Method;
use routekit::{HandlerRef, RouteTable, RouterError};

mod common;
use common::routes::template;

fn no_params() -> [(&'static str, &'static str); 0] {
    []
}

#[test]
fn test_literal_route() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/health", "Ops", "health")).unwrap();
    let uri = table
        .reverse_route_for(&HandlerRef::new("Ops", "health"), no_params())
        .unwrap();
    assert_eq!(uri, "/health");
}

#[test]
fn test_values_are_stringified_and_encoded() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/users/{id}/{name}", "U", "show")).unwrap();
    let handler = HandlerRef::new("U", "show");

    let uri = table
        .reverse_route_for(&handler, [("id", "42".to_string()), ("name", "a b/c".to_string())])
        .unwrap();
    assert_eq!(uri, "/users/42/a%20b%2Fc");

    // Numbers go through Display
    let uri = table.reverse_route_for(&handler, [("id", 7), ("name", 8)]).unwrap();
    assert_eq!(uri, "/users/7/8");
}

#[test]
fn test_greedy_placeholder_keeps_separators() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/assets/{path*}", "A", "serve")).unwrap();

    let uri = table
        .reverse_route_for(&HandlerRef::new("A", "serve"), [("path", "css/main file.css")])
        .unwrap();
    assert_eq!(uri, "/assets/css/main%20file.css");

    let m = table.match_route(&Method::GET, &uri).unwrap().into_match().unwrap();
    assert_eq!(m.get_path_param("path"), Some("css/main file.css"));
}

#[test]
fn test_extra_parameters_become_query_string() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/search/{kind}", "S", "find")).unwrap();

    let uri = table
        .reverse_route_for(
            &HandlerRef::new("S", "find"),
            [("q", "rust & co"), ("kind", "books"), ("page", "2")],
        )
        .unwrap();
    assert_eq!(uri, "/search/books?q=rust%20%26%20co&page=2");
}

#[test]
fn test_unknown_handler() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/a", "C", "a")).unwrap();

    let err = table
        .reverse_route_for(&HandlerRef::new("C", "b"), no_params())
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::NoSuchRoute {
            handler: "C#b".to_string()
        }
    );
}

#[test]
fn test_missing_parameter() {
    let table = RouteTable::new();
    table.register(template(Method::GET, "/foo/{id}/{name}", "H", "show")).unwrap();

    let err = table
        .reverse_route_for(&HandlerRef::new("H", "show"), [("id", "1")])
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::MissingParameter {
            handler: "H#show".to_string(),
            parameter: "name".to_string(),
        }
    );
}

#[test]
fn test_handler_with_several_routes() {
    let table = RouteTable::new();
    table
        .register_all([
            template(Method::GET, "/posts/{year}/{slug}", "Blog", "post"),
            template(Method::GET, "/p/{id}", "Blog", "post"),
        ])
        .unwrap();
    let handler = HandlerRef::new("Blog", "post");

    assert_eq!(
        table
            .reverse_route_for(&handler, [("year", "2024"), ("slug", "hello")])
            .unwrap(),
        "/posts/2024/hello"
    );
    assert_eq!(table.reverse_route_for(&handler, [("id", "9")]).unwrap(), "/p/9");

    // Nothing fits: reported against the first route
    match table.reverse_route_for(&handler, no_params()) {
        Err(RouterError::MissingParameter { parameter, .. }) => assert_eq!(parameter, "year"),
        other => panic!("expected MissingParameter, got {other:?}"),
    }
}

#[test]
fn test_reverse_after_unregister_controller() {
    let table = RouteTable::new();
    table
        .register_all([
            template(Method::GET, "/pets", "Pets", "list"),
            template(Method::GET, "/pets/{id}", "Pets", "show"),
            template(Method::GET, "/owners", "Owners", "list"),
        ])
        .unwrap();

    assert_eq!(table.unregister_controller("Pets"), 2);
    assert_eq!(table.unregister_controller("Pets"), 0);
    assert_eq!(table.len(), 1);

    assert!(matches!(
        table.reverse_route_for(&HandlerRef::new("Pets", "list"), no_params()),
        Err(RouterError::NoSuchRoute { .. })
    ));
    assert_eq!(
        table
            .reverse_route_for(&HandlerRef::new("Owners", "list"), no_params())
            .unwrap(),
        "/owners"
    );
}
