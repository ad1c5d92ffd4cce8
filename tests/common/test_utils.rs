use qr_sender::config::DispatcherConfig;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

/// Base64 of the 8-byte PNG signature
pub const PNG_SIGNATURE_B64: &str = "iVBORw0KGgo=";

/// Dispatcher configuration pointing at a mock server's receive route
pub fn dispatcher_config(server: &MockServer) -> DispatcherConfig {
    DispatcherConfig {
        endpoint: format!("{}/receive", server.uri()),
        ..DispatcherConfig::default()
    }
}

/// Address on localhost that nothing is listening on
pub fn refused_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/receive", port)
}

/// Mounts a receive route answering `data` with the given image payload
pub async fn mount_image(server: &MockServer, data: &str, image: &str) {
    Mock::given(method("POST"))
        .and(path("/receive"))
        .and(body_json(json!({ "data": data })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "image": image })))
        .mount(server)
        .await;
}
