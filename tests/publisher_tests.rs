mod common;

use calendar_notifier::components::publisher::{ConsolePublisher, Delivery, Publisher, StatusPublisher};
use calendar_notifier::error::Error;
use common::{test_config, STATUS_PATH};
use mockito::Matcher;
use reqwest::StatusCode;

#[tokio::test]
async fn test_publish_posts_signed_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", STATUS_PATH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header(
            "authorization",
            Matcher::Regex(
                r#"^OAuth oauth_consumer_key="consumer_key", oauth_nonce="[0-9a-f]{32}", oauth_signature="[^"]+", oauth_signature_method="HMAC-SHA1", oauth_timestamp="\d+", oauth_token="access_token", oauth_version="1.0"$"#
                    .to_string(),
            ),
        )
        .match_body("status=test%20status%0Asecond%20line")
        .with_status(200)
        .with_body("200 OK")
        .expect(1)
        .create_async()
        .await;

    let publisher = StatusPublisher::new(&test_config(&server.url()), reqwest::Client::new());
    let delivery = publisher.publish("test status\nsecond line").await.unwrap();

    assert_eq!(delivery, Delivery::Posted(StatusCode::OK));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_status_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", STATUS_PATH)
        .with_status(401)
        .with_body(r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#)
        .create_async()
        .await;

    let publisher = StatusPublisher::new(&test_config(&server.url()), reqwest::Client::new());
    let delivery = publisher.publish("test").await.unwrap();

    assert_eq!(delivery, Delivery::Posted(StatusCode::UNAUTHORIZED));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    // Nothing listens on port 1
    let publisher = StatusPublisher::new(&test_config("http://127.0.0.1:1"), reqwest::Client::new());
    let result = publisher.publish("test").await;

    assert!(matches!(result, Err(Error::Http(_))));
}

#[tokio::test]
async fn test_console_publisher_prints() {
    let delivery = ConsolePublisher.publish("header\nfoo (2016-06-01)\n").await.unwrap();
    assert_eq!(delivery, Delivery::Printed);
}
