//! HTTP endpoint tests.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use sporto_saml::bindings::HttpRedirectBinding;
use sporto_saml::endpoints::{saml_router, SamlState};
use sporto_saml::{AuthnRequest, SignatureScope};
use tower::ServiceExt;

use crate::common::{instant, ResponseBuilder, TestEnv, SSO};

fn app(env: &TestEnv) -> Router {
    saml_router().with_state(SamlState::new(env.sp.clone()))
}

fn post_form(body: String) -> anyhow::Result<Request<Body>> {
    Ok(Request::post("/saml/acs")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))?)
}

async fn body_text(response: axum::response::Response) -> anyhow::Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

#[tokio::test]
async fn login_redirects_to_idp() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let response = app(&env)
        .oneshot(
            Request::get(concat!(
                "/saml/login?idp=https%3A%2F%2Fidp-b.example.org",
                "&idp=https%3A%2F%2Fidp-a.example.org",
            ))
            .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(location.starts_with(&format!("{SSO}?SAMLRequest=")));
    assert!(body_text(response).await?.is_empty());

    let request = AuthnRequest::from_xml(&HttpRedirectBinding::decode_url(&location)?.xml)?;
    assert_eq!(request.scoping, ["https://idp-b.example.org", "https://idp-a.example.org"]);

    Ok(())
}

#[tokio::test]
async fn acs_accepts_signed_response() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let builder = ResponseBuilder::fresh(Utc::now()).attribute("mail", &["alice@example.org"]);
    let form = format!(
        "SAMLResponse={}&RelayState=%2Fhome",
        urlencoding::encode(&env.post_value(&builder, SignatureScope::Assertion)?)
    );

    let response = app(&env).oneshot(post_form(form)?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert_eq!(json["attributes"]["mail"], serde_json::json!(["alice@example.org"]));
    assert_eq!(json["relay_state"], "/home");

    Ok(())
}

#[tokio::test]
async fn acs_maps_failures_to_status() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let now = Utc::now();

    let mut stale = ResponseBuilder::fresh(now);
    stale.not_on_or_after = Some(instant(now - Duration::hours(1)));
    let stale = env.post_value(&stale, SignatureScope::Assertion)?;

    let cases = [
        (stale, StatusCode::FORBIDDEN, "Assertion Conditions too old"),
        (
            crate::common::encode(&ResponseBuilder::fresh(now).to_xml()),
            StatusCode::UNAUTHORIZED,
            "Error verifying incoming SAMLResponse",
        ),
        ("bm90IHhtbA==".to_string(), StatusCode::BAD_REQUEST, "malformed response"),
    ];

    for (value, status, message) in cases {
        let form = format!("SAMLResponse={}", urlencoding::encode(&value));
        let response = app(&env).oneshot(post_form(form)?).await?;
        assert_eq!(response.status(), status);
        assert!(body_text(response).await?.contains(message));
    }

    Ok(())
}

#[tokio::test]
async fn acs_without_response_starts_login() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let response = app(&env).oneshot(post_form("RelayState=x".to_string())?).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().contains_key(header::LOCATION));

    Ok(())
}

#[tokio::test]
async fn served_over_tcp() -> anyhow::Result<()> {
    use std::future::IntoFuture;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let env = TestEnv::new()?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let server = tokio::spawn(axum::serve(listener, app(&env)).into_future());

    let mut stream = tokio::net::TcpStream::connect(address).await?;
    stream
        .write_all(b"GET /saml/login HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await?;
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await?;

    assert!(reply.starts_with("HTTP/1.1 302"), "{reply}");
    let location = format!("location: {}", SSO.to_ascii_lowercase());
    assert!(reply.to_ascii_lowercase().contains(&location));

    server.abort();
    Ok(())
}
