use crate::{collection, validate, Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalState {
    pub signedon: bool,
    pub incoming: bool,
    pub outgoing: bool,
    pub communication: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSoftwareUpdate {
    pub updatestate: u32,
    pub url: String,
    pub text: String,
    pub notify: bool,
}

/// An application allowed to use the API. Its ID is the credential it was issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistEntry {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(rename = "create date")]
    pub create_date: String,
    #[serde(rename = "last use date")]
    pub last_use_date: String,
}

keyed!(WhitelistEntry, String);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub name: String,
    pub bridgeid: String,
    pub modelid: String,
    pub zigbeechannel: u8,
    pub mac: String,
    pub dhcp: bool,
    pub ipaddress: String,
    pub netmask: String,
    pub gateway: String,
    pub proxyaddress: String,
    pub proxyport: u16,
    #[serde(rename = "UTC")]
    pub utc: String,
    pub localtime: String,
    pub timezone: String,
    /// Sorted by credential.
    #[serde(skip)]
    pub whitelist: Vec<WhitelistEntry>,
    pub swversion: String,
    pub apiversion: String,
    pub swupdate: BridgeSoftwareUpdate,
    pub linkbutton: bool,
    pub portalservices: bool,
    pub portalconnection: String,
    pub portalstate: PortalState,
}

const WHITELIST_KEY: &str = "whitelist";

impl Configuration {
    fn decode(body: &[u8]) -> Result<Configuration> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(HueError::decode_err("empty configuration response"));
        }
        let mut fields: Map<String, Value> = serde_json::from_slice(body)?;
        let whitelist = match fields.remove(WHITELIST_KEY) {
            Some(Value::Object(entries)) => collection::normalize_map(entries)?,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(HueError::decode_err(format!(
                    "expected {WHITELIST_KEY} to be an object, got {other}"
                )))
            }
        };
        let mut config: Configuration = serde_json::from_value(Value::Object(fields))?;
        config.whitelist = whitelist;
        Ok(config)
    }
}

impl Bridge {
    /// Returns the bridge configuration, including the whitelist of applications.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///    .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// let config = bridge.get_configuration().await.unwrap();
    /// for app in config.whitelist {
    ///     println!("{} last used {}", app.name, app.last_use_date);
    /// }
    /// # })
    /// ```
    pub async fn get_configuration(&self) -> Result<Configuration> {
        let body = self.fetch("config").await?;
        crate::bridge::check_for_errors(&body)?;
        Configuration::decode(&body)
    }

    /// Removes an application from the whitelist, revoking its credential.
    pub async fn delete_user(&self, user: &str) -> Result<()> {
        let user = validate::not_blank("User", user)?;
        let user = validate::path_segment("User", user)?;
        self.submit_empty(Method::DELETE, &format!("config/whitelist/{user}"))
            .await?;
        Ok(())
    }
}
