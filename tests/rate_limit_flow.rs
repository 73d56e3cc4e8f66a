//! Rate limiting integration tests against a live listener.

use serde_json::json;

mod common;

#[tokio::test]
async fn test_api_bucket_exhausts_to_429() {
    let mut config = common::test_config();
    config.rate_limit.bucket_capacity = 3;
    // Refill far too slow to matter within the test.
    config.rate_limit.tokens_per_minute = 1;
    let (addr, _shutdown) = common::start_gate(config).await;
    let client = common::client();

    // Bad credentials keep the handler cheap; a 401 still consumed a
    // token, which is exactly what the limiter should see.
    for i in 0..3 {
        let res = client
            .post(format!("http://{}/api/v1/auth/login", addr))
            .header("cookie", "x-fp-id=fp-burst")
            .json(&json!({ "username": "demouser", "password": "wrong" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 401, "request {} should reach the handler", i + 1);
    }

    let res = client
        .post(format!("http://{}/api/v1/auth/login", addr))
        .header("cookie", "x-fp-id=fp-burst")
        .json(&json!({ "username": "demouser", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 429);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Too Many Requests");
}

#[tokio::test]
async fn test_distinct_identities_do_not_share_buckets() {
    let mut config = common::test_config();
    config.rate_limit.bucket_capacity = 2;
    config.rate_limit.tokens_per_minute = 1;
    let (addr, _shutdown) = common::start_gate(config).await;
    let client = common::client();

    let send = |fp: &'static str| {
        let client = client.clone();
        let url = format!("http://{}/api/v1/auth/login", addr);
        async move {
            client
                .post(url)
                .header("cookie", format!("x-fp-id={}", fp))
                .json(&json!({ "username": "demouser", "password": "wrong" }))
                .send()
                .await
                .unwrap()
                .status()
        }
    };

    assert_eq!(send("fp-a").await, 401);
    assert_eq!(send("fp-a").await, 401);
    assert_eq!(send("fp-a").await, 429);

    // Exhausting fp-a must leave fp-b untouched.
    assert_eq!(send("fp-b").await, 401);
    assert_eq!(send("fp-b").await, 401);
}

#[tokio::test]
async fn test_non_api_routes_are_not_limited() {
    let mut config = common::test_config();
    config.rate_limit.bucket_capacity = 1;
    config.rate_limit.tokens_per_minute = 1;
    let (addr, _shutdown) = common::start_gate(config).await;
    let client = common::client();

    for _ in 0..5 {
        let res = client
            .get(format!("http://{}/login", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
}

#[tokio::test]
async fn test_authenticated_requests_bucket_on_user_id() {
    let mut config = common::test_config();
    config.rate_limit.bucket_capacity = 2;
    config.rate_limit.tokens_per_minute = 1;
    let (addr, _shutdown) = common::start_gate(config).await;
    let client = common::client();

    // Login consumes one token from the anonymous identity.
    let login = client
        .post(format!("http://{}/api/v1/auth/login", addr))
        .header("cookie", "x-fp-id=fp-login")
        .json(&json!({ "username": "demouser", "password": "demo123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), 303);
    let session = login
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    // The session identity has its own fresh bucket of 2, independent of
    // the fingerprint bucket used during login.
    let url = format!("http://{}/api/v1/me", addr);
    for _ in 0..2 {
        let res = client
            .get(&url)
            .header("cookie", &session)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
    let res = client
        .get(&url)
        .header("cookie", &session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 429);
}
