mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn list_without_account_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(server.url("/api/patch/v1/baselines/1/systems"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["error"].as_str().unwrap_or_default().contains(common::ACCOUNT_HEADER));
    Ok(())
}

#[tokio::test]
async fn create_with_bad_account_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .put(server.url("/api/patch/v1/baselines"))
        .header(common::ACCOUNT_HEADER, "abc")
        .json(&serde_json::json!({"name": "nightly"}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
