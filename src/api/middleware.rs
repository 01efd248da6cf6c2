//! Response middleware applied to every route.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Force clients to revalidate on every request. Model data folders are
/// re-exported in place, so responses must not be served from a cache.
pub async fn no_cache(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn responses_carry_no_cache_headers() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(super::no_cache));
        let server = TestServer::new(app).expect("Failed to create test server");

        let response = server.get("/ping").await;
        response.assert_status_ok();
        response.assert_header("Cache-Control", "no-cache, no-store, must-revalidate");
        response.assert_header("Pragma", "no-cache");
        response.assert_header("Expires", "0");
    }
}
