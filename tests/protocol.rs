//! End-to-end tests of the compile request contract.

use std::net::SocketAddr;
use std::sync::Arc;

use compiler_service::config::ServiceConfig;
use compiler_service::optimizer::MinifierFactory;
use reqwest::StatusCode;

mod common;

async fn post(addr: SocketAddr, body: &'static str) -> (StatusCode, Option<String>, String) {
    let res = common::client()
        .post(format!("http://{addr}/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("service unreachable");
    let status = res.status();
    let content_type = res
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    (status, content_type, res.text().await.unwrap())
}

#[tokio::test]
async fn test_contract_status_codes() {
    let addr: SocketAddr = "127.0.0.1:28881".parse().unwrap();
    let shutdown = common::start_server(addr, ServiceConfig::default(), common::scripted()).await;

    let (status, _, body) = post(addr, "output_info=errors").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "missing js_code");
    assert!(body.is_empty());

    let (status, _, _) = post(addr, "js_code=a&output_format=html").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unsupported output_format");

    let (status, _, _) = post(addr, "js_code=a&output_format=text").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = post(addr, "js_code=a&output_info=statistics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unsupported output_info");
    assert!(body.is_empty());

    let (status, _, body) = post(addr, "js_code=ERROR").await;
    assert_eq!(status, StatusCode::NO_CONTENT, "compile failure in compiled_code mode");
    assert!(body.is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_method_gate() {
    let addr: SocketAddr = "127.0.0.1:28882".parse().unwrap();
    let shutdown = common::start_server(addr, ServiceConfig::default(), common::scripted()).await;
    let client = common::client();

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let res = client
            .request(method.clone(), format!("http://{addr}/"))
            .body("js_code=a")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method}");
        assert!(res.text().await.unwrap().is_empty());
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_defaults_and_first_value_rules() {
    let addr: SocketAddr = "127.0.0.1:28883".parse().unwrap();
    let shutdown = common::start_server(addr, ServiceConfig::default(), common::scripted()).await;

    let default_level = post(addr, "js_code=a+%2B+b").await;
    let explicit_level = post(addr, "js_code=a+%2B+b&compilation_level=SIMPLE_OPTIMIZATIONS").await;
    assert_eq!(default_level, explicit_level);
    assert_eq!(default_level.0, StatusCode::OK);
    assert_eq!(default_level.1.as_deref(), Some("text/plain"));
    assert_eq!(default_level.2, "/*SIMPLE_OPTIMIZATIONS*/a+b");

    let (_, _, body) = post(addr, "js_code=first&js_code=ERROR").await;
    assert_eq!(body, "/*SIMPLE_OPTIMIZATIONS*/first");

    let body = "js_code=x&compilation_level=WHITESPACE_ONLY&compilation_level=FOO";
    let (status, _, body) = post(addr, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "/*WHITESPACE_ONLY*/x");

    let (status, _, body) = post(addr, "js_code=x&compilation_level=FOO").await;
    assert_eq!(status, StatusCode::OK, "unknown levels are accepted");
    assert_eq!(body, "/*NONE*/x");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_error_report() {
    let addr: SocketAddr = "127.0.0.1:28884".parse().unwrap();
    let shutdown = common::start_server(addr, ServiceConfig::default(), common::scripted()).await;

    let (status, content_type, body) = post(addr, "js_code=clean&output_info=errors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(body, "0 Errors, 0 Warnings\n");

    let (status, _, body) = post(addr, "js_code=WARN+ERROR+ERROR&output_info=errors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "2 Errors, 1 Warnings\n\
         Warning: input.js:1: WARNING - scripted\n\
         Error: input.js:1: ERROR - scripted\n\
         Error: input.js:2: ERROR - scripted\n"
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_strict_compilation_level() {
    let addr: SocketAddr = "127.0.0.1:28885".parse().unwrap();
    let mut config = ServiceConfig::default();
    config.compiler.strict_compilation_level = true;
    let shutdown = common::start_server(addr, config, common::scripted()).await;

    let (status, _, body) = post(addr, "js_code=x&compilation_level=FOO").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_builtin_minifier_over_the_wire() {
    let addr: SocketAddr = "127.0.0.1:28886".parse().unwrap();
    let shutdown =
        common::start_server(addr, ServiceConfig::default(), Arc::new(MinifierFactory)).await;
    let client = common::client();

    let source = "// greet\nfunction greet(name) {\n  debugger;\n  return 'Hello, ' + name;\n}\n";
    let res = client
        .post(format!("http://{addr}/"))
        .form(&[("js_code", source), ("output_format", "text")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let expected = "function greet(name){return'Hello, '+name}";
    assert_eq!(res.content_length(), Some(expected.len() as u64));
    assert_eq!(res.text().await.unwrap(), expected);

    let res = client
        .post(format!("http://{addr}/"))
        .form(&[("js_code", source), ("output_info", "errors")])
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.text().await.unwrap(),
        "0 Errors, 1 Warnings\nWarning: input.js:3: WARNING - debugger statement\n"
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let addr: SocketAddr = "127.0.0.1:28887".parse().unwrap();
    let shutdown =
        common::start_server(addr, ServiceConfig::default(), Arc::new(MinifierFactory)).await;

    let mut tasks = Vec::new();
    for i in 0..32 {
        tasks.push(tokio::spawn(async move {
            let body: &'static str = if i % 2 == 0 {
                "js_code=debugger%3B(&output_info=errors"
            } else {
                "js_code=var+a%3B&output_info=errors"
            };
            (i, post(addr, body).await)
        }));
    }

    for task in tasks {
        let (i, (status, _, body)) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        if i % 2 == 0 {
            assert!(body.starts_with("1 Errors, 1 Warnings\n"), "{body}");
        } else {
            assert_eq!(body, "0 Errors, 0 Warnings\n");
        }
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_bad_request_does_not_stop_the_service() {
    let addr: SocketAddr = "127.0.0.1:28888".parse().unwrap();
    let mut config = ServiceConfig::default();
    config.limits.max_body_size = 64;
    let shutdown = common::start_server(addr, config, common::scripted()).await;

    let big = "js_code=".to_string() + &"a".repeat(1024);
    let res = common::client()
        .post(format!("http://{addr}/"))
        .body(big)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _, _) = post(addr, "js_code=%ZZ%").await;
    assert_eq!(status, StatusCode::OK);

    let _ = shutdown.send(());
}
