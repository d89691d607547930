use crate::{HueError, HueError::DiscoveryError};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DiscoveredBridge {
    internalipaddress: Option<String>,
}

/// Asks the n-UPnP service at `url` for the bridges on this network and adopts the first one.
/// See <https://developers.meethue.com/develop/application-design-guidance/hue-bridge-discovery/>.
pub(crate) async fn discover_bridge_n_upnp(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<IpAddr, HueError> {
    let objects: Vec<DiscoveredBridge> = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| DiscoveryError {
            msg: format!("discovery request failed: {e}"),
        })?
        .json()
        .await
        .map_err(|e| DiscoveryError {
            msg: format!("unexpected discovery response: {e}"),
        })?;

    let object = objects.first().ok_or(DiscoveryError {
        msg: "Unable to determine Hue bridge internal IP address".into(),
    })?;

    let ip = object.internalipaddress.as_deref().ok_or(DiscoveryError {
        msg: "Expected internalipaddress".into(),
    })?;
    let ip = ip.parse().map_err(|_| DiscoveryError {
        msg: format!("internalipaddress {ip:?} is not an IP address"),
    })?;
    log::info!("discovered bridge at {ip} using n-upnp");
    Ok(ip)
}
