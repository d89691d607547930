use crate::collection::{self, Keyed};
use crate::config::{Config, DEFAULT_DISCOVERY_URL};
use crate::{HueError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::OnceCell;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Error `type` the bridge reports for an unknown resource ID.
const RESOURCE_NOT_AVAILABLE: usize = 3;

/// A session with one Hue bridge.
///
/// Every resource operation is an inherent `async fn` on this type. The bridge address and the
/// base URL are resolved once, on first use, and shared by every later call.
#[derive(Debug)]
pub struct Bridge {
    address: OnceCell<String>,
    user_id: Option<String>,
    base_url: OnceCell<String>,
    discovery_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

fn create_reqwest_client() -> reqwest::Client {
    reqwest::Client::builder()
        .tcp_keepalive(Some(Duration::from_secs(5)))
        .build()
        .unwrap_or_default()
}

impl Bridge {
    fn new(address: Option<String>) -> Bridge {
        Bridge {
            address: OnceCell::new_with(address),
            user_id: None,
            base_url: OnceCell::new(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            client: create_reqwest_client(),
        }
    }

    /// Create a bridge at this IP. If you know the IP-address, this is the fastest option. Note
    /// that this function does not validate whether a bridge is really present at the IP-address.
    /// ### Example
    /// ```no_run
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4]);
    /// ```
    pub fn for_ip(ip: impl Into<IpAddr>) -> Bridge {
        Self::new(Some(ip.into().to_string()))
    }

    /// Create a bridge at `host` or `host:port`.
    pub fn for_address(address: impl Into<String>) -> Bridge {
        Self::new(Some(address.into()))
    }

    /// Create a bridge whose address is looked up through the discovery service on first use.
    /// The first bridge the service lists is adopted.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::discover().with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// println!("bridge found at {}", bridge.address().await.unwrap());
    /// # })
    /// ```
    pub fn discover() -> Bridge {
        Self::new(None)
    }

    /// Builds a bridge from loaded settings; see [`Config::from_env`].
    pub fn from_config(config: &Config) -> Bridge {
        let mut bridge = Self::new(config.bridge_address.clone())
            .with_discovery_url(config.discovery_url.clone())
            .with_timeout(config.timeout());
        bridge.user_id = config.user_id.clone();
        bridge
    }

    /// Consumes the bridge and returns a new one with a configured user ID.
    /// ### Example
    /// ```no_run
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///     .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// ```
    pub fn with_user(self, user_id: impl Into<String>) -> Bridge {
        Bridge {
            user_id: Some(user_id.into()),
            base_url: OnceCell::new(),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Bridge {
        Bridge { timeout, ..self }
    }

    pub fn with_discovery_url(self, url: impl Into<String>) -> Bridge {
        Bridge {
            discovery_url: url.into(),
            ..self
        }
    }

    /// The user ID this bridge authenticates with, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The bridge address, running discovery if it was not given.
    pub async fn address(&self) -> Result<&str> {
        self.address
            .get_or_try_init(|| async {
                let ip = crate::disco::discover_bridge_n_upnp(
                    &self.client,
                    &self.discovery_url,
                    self.timeout,
                )
                .await?;
                Ok::<_, HueError>(ip.to_string())
            })
            .await
            .map(String::as_str)
    }

    /// `http://<address>/api/<user id>`, computed once.
    pub async fn base_url(&self) -> Result<&str> {
        self.base_url
            .get_or_try_init(|| async {
                let user_id = self
                    .user_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|user_id| !user_id.is_empty())
                    .ok_or_else(|| HueError::CredentialError {
                        msg: "Unable to get Hue user ID".into(),
                    })?;
                let address = self.address().await?;
                Ok::<_, HueError>(format!("http://{address}/api/{user_id}"))
            })
            .await
            .map(String::as_str)
    }

    async fn url(&self, path: &str) -> Result<String> {
        Ok(format!("{}/{}", self.base_url().await?, path))
    }

    /// GET `path` below the base URL and return the raw body.
    pub(crate) async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path).await?;
        log::debug!("GET {url}");
        let body = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(body.to_vec())
    }

    /// Send `body` as JSON with `method` and fail on a bridge error envelope.
    pub(crate) async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>> {
        let url = self.url(path).await?;
        self.execute(self.client.request(method, url).json(body))
            .await
    }

    /// Like [`Bridge::submit`], without a request body.
    pub(crate) async fn submit_empty(&self, method: Method, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path).await?;
        self.execute(self.client.request(method, url)).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>> {
        let request = request.timeout(self.timeout).build()?;
        log::debug!("{} {}", request.method(), request.url());
        let body = self
            .client
            .execute(request)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec();
        check_for_errors(&body)?;
        Ok(body)
    }

    /// Fetches every record of a collection endpoint.
    pub(crate) async fn get_collection<T: Keyed>(&self, path: &str) -> Result<Vec<T>> {
        let body = self.fetch(path).await?;
        check_for_errors(&body)?;
        collection::normalize(&body)
    }

    /// Fetches a single record; an empty body means it does not exist.
    pub(crate) async fn get_item<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &'static str,
        id: impl ToString,
    ) -> Result<T> {
        let body = self.fetch(path).await?;
        match check_for_errors(&body) {
            Err(HueError::BridgeError { code, .. }) if code == RESOURCE_NOT_AVAILABLE => {
                return Err(HueError::not_found(resource, id))
            }
            other => other?,
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(HueError::not_found(resource, id));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Creates an application user on the bridge and returns the issued user ID. Only the
    /// bridge address is needed; the link button must have been pressed shortly before.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4]);
    /// let user_id = bridge.create_user("my_app#laptop").await.unwrap();
    /// // now this user ID can be stored and reused
    /// # })
    /// ```
    pub async fn create_user(&self, device_type: &str) -> Result<String> {
        #[derive(Serialize)]
        struct PostApi<'a> {
            devicetype: &'a str,
        }
        #[derive(Debug, Deserialize)]
        struct Username {
            username: String,
        }
        if device_type.trim().is_empty() {
            return Err(HueError::validation("deviceType must not be empty"));
        }
        let url = format!("http://{}/api", self.address().await?);
        let body = self
            .execute(
                self.client
                    .post(url)
                    .json(&PostApi {
                        devicetype: device_type,
                    }),
            )
            .await?;
        let resp: Vec<SuccessResponse<Username>> = serde_json::from_slice(&body)?;
        resp.into_iter()
            .next()
            .map(|s| s.success.username)
            .ok_or_else(|| HueError::decode_err("expected non-empty array"))
    }

    /// This function registers a new application at the provided bridge, using `name` as an
    /// identifier for that app, and returns the bridge authenticated as that application. It
    /// returns an error if the button of the bridge was not pressed shortly before running this
    /// function.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///     .register_application("mylaptop")
    ///     .await
    ///     .unwrap();
    /// println!("the user ID is {}", bridge.user_id().unwrap());
    /// # })
    /// ```
    pub async fn register_application(self, name: &str) -> Result<Bridge> {
        let user_id = self.create_user(name).await?;
        Ok(self.with_user(user_id))
    }
}

#[derive(Debug, Deserialize)]
struct SuccessResponse<T> {
    success: T,
}

#[derive(Debug, Deserialize)]
struct ResponseEntry {
    error: Option<BridgeErrorInner>,
}

#[derive(Debug, Deserialize)]
struct BridgeErrorInner {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    r#type: Option<usize>,
}

/// Scans a response for the `[{"error": {...}}]` envelope. Bodies of any other shape pass.
pub(crate) fn check_for_errors(body: &[u8]) -> Result<()> {
    let Ok(entries) = serde_json::from_slice::<Vec<ResponseEntry>>(body) else {
        return Ok(());
    };
    let errors: Vec<BridgeErrorInner> = entries
        .into_iter()
        .filter_map(|entry| entry.error)
        .filter(|error| error.description.as_deref().is_some_and(|d| !d.is_empty()))
        .collect();
    let Some(first) = errors.first() else {
        return Ok(());
    };
    for error in &errors {
        log::debug!(
            "bridge error {:?} at {:?}: {:?}",
            error.r#type,
            error.address,
            error.description
        );
    }
    let code = first.r#type.unwrap_or_default();
    let msg = errors
        .iter()
        .filter_map(|error| error.description.as_deref())
        .collect::<Vec<_>>()
        .join("\n");
    Err(HueError::BridgeError { code, msg })
}
