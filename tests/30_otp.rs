mod common;

use anyhow::Result;
use reqwest::StatusCode;

// Input validation happens before any database work, so these hold even
// without a provisioned database behind the server.

#[tokio::test]
async fn verify_rejects_malformed_phone_numbers() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/otp/verify", server.base_url))
        .bearer_auth(common::DEV_SERVICE_KEY)
        .json(&serde_json::json!({ "phone": "0712345678", "otp_code": "123456" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["error"],
        serde_json::json!("Format nomor telepon tidak valid")
    );
    Ok(())
}

#[tokio::test]
async fn verify_rejects_malformed_codes() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for code in ["12345", "1234567", "12345a"] {
        let res = client
            .post(format!("{}/auth/otp/verify", server.base_url))
            .bearer_auth(common::DEV_SERVICE_KEY)
            .json(&serde_json::json!({ "phone": "081234567890", "otp_code": code }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "code {code}");

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], serde_json::json!("Kode OTP harus 6 digit"), "code {code}");
    }
    Ok(())
}

#[tokio::test]
async fn request_rejects_malformed_phone_numbers() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/otp/request", server.base_url))
        .bearer_auth(common::DEV_SERVICE_KEY)
        .json(&serde_json::json!({ "phone": "8123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
