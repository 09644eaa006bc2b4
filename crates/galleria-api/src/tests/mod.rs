//! Router-level tests: real routes, middleware and extractors over in-memory doubles.


use crate::setup::routes::setup_routes;
use crate::test_helpers::{TestContext, VALID_TOKEN};
use axum_test::TestServer;

pub(crate) fn server(ctx: &TestContext) -> TestServer {
    let router = setup_routes(&ctx.state.config, ctx.state.clone()).unwrap();
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

pub(crate) fn bearer() -> String {
    format!("Bearer {}", VALID_TOKEN)
}
