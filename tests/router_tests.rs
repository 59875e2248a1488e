use http::{Method, StatusCode};
use manifold::{App, Response};

mod common;
use common::{init_tracing, request, MockStream};

fn ok_text(body: &'static str) -> impl Fn(manifold::Request) -> manifold::DispatchResult + Send {
    move |_req| Ok(Response::text(StatusCode::OK, body))
}

#[test]
fn matches_a_parameterized_route_and_binds_params() {
    init_tracing();
    let service = App::new()
        .get("/users/:id", |req| {
            let id = req.param("id").unwrap_or_default().to_string();
            Ok(Response::text(StatusCode::OK, id))
        })
        .bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/users/42"), &mut stream);
    assert!(stream.wire().ends_with("42"));
}

#[test]
fn method_must_match() {
    init_tracing();
    let service = App::new().get("/thing", ok_text("get")).bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::POST, "/thing"), &mut stream);
    assert!(stream.wire().starts_with("HTTP/1.1 404"));
}

#[test]
fn static_route_beats_parameterized_regardless_of_registration_order() {
    init_tracing();
    // Parameterized first: specificity, not registration order, must win.
    let service = App::new()
        .get("/users/:id", ok_text("param"))
        .get("/users/me", ok_text("static"))
        .bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/users/me"), &mut stream);
    assert!(stream.wire().ends_with("static"));

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/users/42"), &mut stream);
    assert!(stream.wire().ends_with("param"));
}

#[test]
fn equal_specificity_falls_back_to_registration_order() {
    init_tracing();
    let service = App::new()
        .get("/a/:x", ok_text("first"))
        .get("/a/:y", ok_text("second"))
        .bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/a/1"), &mut stream);
    assert!(stream.wire().ends_with("first"));
}

#[test]
fn matching_is_deterministic_across_repeated_calls() {
    init_tracing();
    let service = App::new()
        .get("/pets/:id", |req| {
            Ok(Response::text(
                StatusCode::OK,
                req.param("id").unwrap_or_default().to_string(),
            ))
        })
        .bind();

    for _ in 0..5 {
        let mut stream = MockStream::new();
        service.dispatch(request(Method::GET, "/pets/7"), &mut stream);
        assert!(stream.wire().ends_with("7"));
    }
}

#[test]
fn optional_segment_is_absent_when_unmatched() {
    init_tracing();
    let service = App::new()
        .get("/files/:name?", |req| {
            let body = match req.param("name") {
                Some(name) => format!("file:{name}"),
                None => "listing".to_string(),
            };
            Ok(Response::text(StatusCode::OK, body))
        })
        .bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/files"), &mut stream);
    assert!(stream.wire().ends_with("listing"));

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/files/report.txt"), &mut stream);
    assert!(stream.wire().ends_with("file:report.txt"));
}

#[test]
fn multi_param_routes_bind_every_segment() {
    init_tracing();
    let service = App::new()
        .get("/users/:user_id/posts/:post_id", |req| {
            let body = format!(
                "{}/{}",
                req.param("user_id").unwrap_or_default(),
                req.param("post_id").unwrap_or_default()
            );
            Ok(Response::text(StatusCode::OK, body))
        })
        .bind();

    let mut stream = MockStream::new();
    service.dispatch(request(Method::GET, "/users/3/posts/9"), &mut stream);
    assert!(stream.wire().ends_with("3/9"));
}
