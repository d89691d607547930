//! Shared fixtures for the wiremock-backed tests.

use crate::Bridge;
use serde_json::{json, Value};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) const USER: &str = "TEST";

/// A mock bridge and a client pointed at it, authenticated as [`USER`].
pub(crate) async fn setup() -> (MockServer, Bridge) {
    let _ = pretty_env_logger::try_init();
    let server = MockServer::start().await;
    let bridge = Bridge::for_address(server.address().to_string()).with_user(USER);
    (server, bridge)
}

pub(crate) fn api_path(resource: &str) -> String {
    format!("/api/{USER}/{resource}")
}

/// `[{"success": {...}}]`
pub(crate) fn success(what: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([{ "success": { "id": what } }]))
}

/// Serves `body` for `GET /api/TEST/<resource>`.
pub(crate) async fn mount_get(server: &MockServer, resource: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(api_path(resource)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers `GET /api/TEST/<resource>` with an empty body, the bridge's way of saying "absent".
pub(crate) async fn mount_empty(server: &MockServer, resource: &str) {
    Mock::given(method("GET"))
        .and(path(api_path(resource)))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Fails the test when the server sees any request at all.
pub(crate) async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Fails the test when the server sees a request with `verb`.
pub(crate) async fn expect_no(server: &MockServer, verb: &str) {
    Mock::given(method(verb))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// A fully populated light record.
pub(crate) fn light_fixture() -> Value {
    json!({
        "state": {
            "on": false, "bri": 100, "hue": 200, "sat": 250, "effect": "none",
            "xy": [0.45, 0.41], "ct": 400, "alert": "none", "colormode": "xy",
            "mode": "homeautomation", "reachable": true
        },
        "swupdate": { "state": "noupdates", "lastinstall": "2018-06-04T06:14:11" },
        "type": "Extended color light",
        "name": "Hue color lamp 1",
        "modelid": "LCT016",
        "manufacturername": "Philips",
        "productname": "Hue color lamp",
        "capabilities": {
            "certified": true,
            "control": {
                "mindimlevel": 1000, "maxlumen": 800, "colorgamuttype": "C",
                "colorgamut": [[0.6915, 0.3083], [0.17, 0.7], [0.1532, 0.0475]],
                "ct": { "min": 153, "max": 500 }
            },
            "streaming": { "renderer": true, "proxy": true }
        },
        "config": { "archetype": "sultanbulb", "function": "mixed", "direction": "omnidirectional" },
        "uniqueid": "00:17:88:01:03:4c:29:d1-0b",
        "swversion": "1.29.0_r21169",
        "swconfigid": "3416C2DD",
        "productid": "Philips-LCT016-1-A19ECLv5"
    })
}
