mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/auth/whoami", "/api/claims/mine", "/api/admin/claims"] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], serde_json::json!("UNAUTHORIZED"), "path {path}");
    }
    Ok(())
}

#[tokio::test]
async fn garbage_tokens_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/gate/route", server.base_url))
        .bearer_auth("not-a-jwt")
        .json(&serde_json::json!({ "path": "/dashboard" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn edge_routes_require_the_service_key() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No bearer at all
    let res = client
        .post(format!("{}/auth/otp/verify", server.base_url))
        .json(&serde_json::json!({ "phone": "081234567890", "otp_code": "123456" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Wrong bearer
    let res = client
        .post(format!("{}/auth/dev/seed", server.base_url))
        .bearer_auth("wrong-key")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
