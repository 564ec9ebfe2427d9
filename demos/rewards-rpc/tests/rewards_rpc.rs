#![allow(missing_docs)]

use nakama_client::api::{AccountDevice, Authenticate, GetAccount, Rpc};
use nakama_client::{ErrorCode, NakamaClient, NakamaError, TokenPlacement};
use rstest::rstest;
use serde::{Deserialize, Serialize};

mod common;
pub use self::common::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Rewards {
    rewards: i64,
}

async fn authenticated(app: &TestApp, device_id: &str) -> anyhow::Result<NakamaClient> {
    let session = app
        .client
        .send(Authenticate::new(AccountDevice::new(device_id)).with_create(true))
        .await?;
    Ok(app.client.with_session(&session))
}

#[rstest]
#[tokio::test]
async fn should_double_rewards_for_a_session(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = authenticated(&app, "device-rewards-0001").await?;

    let result = client
        .send(Rpc::new("rewards").with_json_payload(&Rewards { rewards: 5 })?)
        .await?;

    assert_eq!(result.id, "rewards");
    assert_eq!(result.decode_payload::<Rewards>()?, Rewards { rewards: 10 });
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_double_unwrapped_rewards(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = authenticated(&app, "device-rewards-0002").await?;

    let result = client
        .send(
            Rpc::new("rewards")
                .with_payload(r#"{"rewards":21}"#)
                .with_unwrap(true),
        )
        .await?;

    insta::assert_snapshot!(result.payload, @r#"{"rewards":42}"#);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_call_with_http_key(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let result = app
        .client
        .send(
            Rpc::get("REWARDS")
                .with_payload(r#"{"rewards":5}"#)
                .with_http_key(HTTP_KEY),
        )
        .await?;

    insta::assert_snapshot!(result.payload, @r#"{"rewards":10}"#);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_call_with_session_in_query(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = NakamaClient::builder()
        .with_host(app.addr.ip().to_string())
        .with_port(app.addr.port())
        .with_server_key(SERVER_KEY)
        .with_token_placement(TokenPlacement::query())
        .build()?;
    let session = client
        .send(Authenticate::new(AccountDevice::new("device-rewards-0003")).with_create(true))
        .await?;
    let client = client.with_session(&session);

    let result = client
        .send(Rpc::new("rewards").with_payload(r#"{"rewards":1}"#))
        .await?;

    insta::assert_snapshot!(result.payload, @r#"{"rewards":2}"#);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_surface_strict_decode_error(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = authenticated(&app, "device-rewards-0004").await?;

    let error = client
        .send(Rpc::new("rewards").with_payload(r#"{"rewards":5,"bonus":3}"#))
        .await
        .expect_err("unknown field rejected");

    let body = error.api_error().expect("an API error");
    assert_eq!(error.status_code(), Some(400));
    assert_eq!(body.error_code(), ErrorCode::InvalidArgument);
    assert!(
        body.message.starts_with("unknown field `bonus`"),
        "{}",
        body.message
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_report_unknown_function(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = authenticated(&app, "device-rewards-0005").await?;

    let error = client
        .send(Rpc::new("jackpot"))
        .await
        .expect_err("no such function");

    assert!(error.is_not_found());
    assert_eq!(
        error.api_error().map(|body| body.message.as_str()),
        Some("RPC function not found")
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_reject_wrong_http_key(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let error = app
        .client
        .send(Rpc::new("rewards").with_http_key("not-the-key"))
        .await
        .expect_err("bad key");

    assert_eq!(error.status_code(), Some(401));
    let body = error.api_error().expect("an API error");
    assert_eq!(body.error_code(), ErrorCode::Unauthenticated);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_reject_wrong_server_key(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = NakamaClient::builder()
        .with_host(app.addr.ip().to_string())
        .with_port(app.addr.port())
        .build()?;

    let error = client
        .send(Authenticate::new(AccountDevice::new("device-rewards-0006")).with_create(true))
        .await
        .expect_err("default key refused");

    assert!(matches!(
        error,
        NakamaError::Api {
            status_code: 401,
            ..
        }
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_read_account_of_session(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let session = app
        .client
        .send(
            Authenticate::new(AccountDevice::new("device-rewards-0007"))
                .with_create(true)
                .with_username("rewarded"),
        )
        .await?;
    assert!(session.created);
    assert_eq!(session.claims()?.username, "rewarded");

    let account = app
        .client
        .with_session(&session)
        .send(GetAccount::new())
        .await?;

    assert_eq!(account.user.username, "rewarded");
    let device = account.devices.first().expect("a device");
    assert_eq!(device.id, "device-rewards-0007");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_create_account_when_create_flag_is_absent(
    #[future] app: TestApp,
) -> anyhow::Result<()> {
    let app = app.await;

    let session = app
        .client
        .send(Authenticate::new(AccountDevice::new("device-rewards-0008")))
        .await?;

    assert!(session.created);
    let again = app
        .client
        .send(Authenticate::new(AccountDevice::new("device-rewards-0008")))
        .await?;
    assert!(!again.created);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_not_create_account_when_create_is_false(
    #[future] app: TestApp,
) -> anyhow::Result<()> {
    let app = app.await;

    let error = app
        .client
        .send(Authenticate::new(AccountDevice::new("device-rewards-0009")).with_create(false))
        .await
        .expect_err("unknown device");

    assert!(error.is_not_found());
    Ok(())
}
