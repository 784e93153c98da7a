use routeit::{Dispatch, Router};

fn assert_match<'r>(
    outcome: Dispatch<'r, '_, &'static str>,
    value: &str,
    params: &[(&str, &str)],
) {
    match outcome {
        Dispatch::Match {
            value: got,
            params: bag,
        } => {
            assert_eq!(*got, value);
            let got: Vec<(&str, &str)> = bag.iter().collect();
            assert_eq!(got, params);
        }
        other => panic!("expected match, got {:?}", other),
    }
}

#[test]
fn named_parameter() {
    let mut router = Router::new();
    router.get("/user/{name}", "user").unwrap();

    assert_match(
        router.dispatch("GET", "/user/john"),
        "user",
        &[("name", "john")],
    );
}

#[test]
fn regex_parameter() {
    let mut router = Router::new();
    router.get("/product/{id:[0-9]+}", "product").unwrap();

    assert!(matches!(
        router.dispatch("GET", "/product/abc"),
        Dispatch::NotFound
    ));
    assert_match(
        router.dispatch("GET", "/product/42"),
        "product",
        &[("id", "42")],
    );
}

#[test]
fn static_beats_parameter() {
    let mut router = Router::new();
    router.get("/user/{id}", "param").unwrap();
    router.get("/user/profile", "static").unwrap();

    assert_match(router.dispatch("GET", "/user/profile"), "static", &[]);
    assert_match(
        router.dispatch("GET", "/user/123"),
        "param",
        &[("id", "123")],
    );
}

#[test]
fn catch_all() {
    let mut router = Router::new();
    router.get("/files/{path:*}", "files").unwrap();

    assert_match(
        router.dispatch("GET", "/files/docs/readme.txt"),
        "files",
        &[("path", "docs/readme.txt")],
    );
    assert_match(router.dispatch("GET", "/files/"), "files", &[("path", "")]);
}

#[test]
fn trailing_slash_redirect() {
    let mut router = Router::new();
    router.get("/api/test", "test").unwrap();

    match router.dispatch("GET", "/api/test/") {
        Dispatch::Redirect { location } => assert_eq!(location, "/api/test"),
        other => panic!("expected redirect, got {:?}", other),
    }
    assert_match(router.dispatch("GET", "/api/test"), "test", &[]);
}

#[test]
fn trailing_slash_redirect_adds_slash() {
    let mut router = Router::new();
    router.get("/b/", "b").unwrap();

    match router.dispatch("GET", "/b") {
        Dispatch::Redirect { location } => assert_eq!(location, "/b/"),
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn method_not_allowed() {
    let mut router = Router::new();
    router.get("/users", "get").unwrap();
    router.post("/users", "post").unwrap();

    match router.dispatch("PUT", "/users") {
        Dispatch::MethodNotAllowed { allowed } => {
            assert_eq!(allowed, vec!["GET".to_owned(), "POST".to_owned()]);
        }
        other => panic!("expected 405, got {:?}", other),
    }
}

#[test]
fn allowed_methods_all_match() {
    let mut router = Router::new();
    router.get("/users/{id}", "get").unwrap();
    router.delete("/users/{id}", "delete").unwrap();
    router.patch("/users/{id}", "patch").unwrap();

    let allowed = match router.dispatch("PUT", "/users/7") {
        Dispatch::MethodNotAllowed { allowed } => allowed,
        other => panic!("expected 405, got {:?}", other),
    };

    assert!(!allowed.contains(&"PUT".to_owned()));
    for method in &allowed {
        assert!(matches!(
            router.dispatch(method, "/users/7"),
            Dispatch::Match { .. }
        ));
    }
}

#[test]
fn not_found_without_alternatives() {
    let mut router = Router::new();
    router.get("/exists", "here").unwrap();

    assert!(matches!(
        router.dispatch("GET", "/nonexistent"),
        Dispatch::NotFound
    ));
    assert!(matches!(
        router.dispatch("POST", "/nonexistent"),
        Dispatch::NotFound
    ));
}

#[test]
fn all_matches_any_method() {
    let mut router = Router::new();
    router.all("/api/test", "all").unwrap();

    for method in ["GET", "POST", "PUT", "DELETE"] {
        assert_match(router.dispatch(method, "/api/test"), "all", &[]);
    }
}

#[test]
fn method_specific_beats_all() {
    let mut router = Router::new();
    router.all("/api/test", "all").unwrap();
    router.get("/api/test", "get").unwrap();

    assert_match(router.dispatch("GET", "/api/test"), "get", &[]);
    assert_match(router.dispatch("POST", "/api/test"), "all", &[]);
}

#[test]
fn method_tree_redirect_beats_all_match() {
    let mut router = Router::new();
    router.get("/doc", "get").unwrap();
    router.all("/doc/", "all").unwrap();

    // the method's own trailing slash recommendation wins over the
    // ALL tree
    match router.dispatch("GET", "/doc/") {
        Dispatch::Redirect { location } => assert_eq!(location, "/doc"),
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn all_tree_redirects_too() {
    let mut router = Router::new();
    router.all("/only-all", "all").unwrap();

    match router.dispatch("GET", "/only-all/") {
        Dispatch::Redirect { location } => assert_eq!(location, "/only-all"),
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn connect_never_redirects() {
    let mut router = Router::new();
    router.connect("/tunnel", "connect").unwrap();

    assert!(matches!(
        router.dispatch("CONNECT", "/tunnel/"),
        Dispatch::NotFound
    ));
    assert_match(router.dispatch("CONNECT", "/tunnel"), "connect", &[]);
}

#[test]
fn empty_path_is_not_found() {
    let mut router = Router::new();
    router.get("/", "root").unwrap();

    assert!(matches!(router.dispatch("GET", ""), Dispatch::NotFound));
}

#[test]
fn root_matches_root() {
    let mut router = Router::new();
    router.get("/", "root").unwrap();

    assert_match(router.dispatch("GET", "/"), "root", &[]);
}

#[test]
fn optional_parameter_absent() {
    let mut router = Router::new();
    router.get("/api/{version?}", "api").unwrap();

    match router.dispatch("GET", "/api/") {
        Dispatch::Match { value, params } => {
            assert_eq!(*value, "api");
            assert_eq!(params.get("version"), "");
        }
        other => panic!("expected match, got {:?}", other),
    }
}

#[test]
fn every_method_shortcut() {
    let mut router = Router::new();
    router.get("/m", "GET").unwrap();
    router.head("/m", "HEAD").unwrap();
    router.post("/m", "POST").unwrap();
    router.put("/m", "PUT").unwrap();
    router.patch("/m", "PATCH").unwrap();
    router.delete("/m", "DELETE").unwrap();
    router.connect("/m", "CONNECT").unwrap();
    router.options("/m", "OPTIONS").unwrap();
    router.trace("/m", "TRACE").unwrap();

    for method in [
        "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "CONNECT", "OPTIONS", "TRACE",
    ] {
        assert_match(router.dispatch(method, "/m"), method, &[]);
    }
}

#[test]
fn manual_lookup() {
    let mut router = Router::new();
    router.get("/home", "home").unwrap();

    let matched = router.lookup("GET", "/home").unwrap();
    assert_eq!(*matched.value, "home");
    assert!(matched.params.is_empty());

    assert!(router.lookup("POST", "/home").is_err());
    assert!(router.lookup("GET", "/home/").unwrap_err().tsr());
}

#[test]
fn substituted_pattern_round_trip() {
    let mut router = Router::new();
    let routes = [
        "/user/{name}",
        "/product/{id:[0-9]+}",
        "/files/{path:*}",
        "/info/{user}/project/{project}",
    ];
    for route in routes {
        router.get(route, route).unwrap();
    }

    let cases: &[(&str, &str, &[(&str, &str)])] = &[
        ("/user/gordon", "/user/{name}", &[("name", "gordon")]),
        ("/product/100", "/product/{id:[0-9]+}", &[("id", "100")]),
        ("/files/a/b", "/files/{path:*}", &[("path", "a/b")]),
        (
            "/info/gordon/project/rust",
            "/info/{user}/project/{project}",
            &[("user", "gordon"), ("project", "rust")],
        ),
    ];

    for (path, route, params) in cases {
        assert_match(router.dispatch("GET", path), route, params);
    }
}
