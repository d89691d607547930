use super::LightCommand;
use crate::{Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightState {
    pub on: bool,
    pub bri: u8,
    pub hue: u16,
    pub sat: u8,
    pub effect: String,
    pub xy: Vec<f64>,
    pub ct: u16,
    pub alert: String,
    pub colormode: String,
    pub mode: String,
    pub reachable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareUpdate {
    pub state: String,
    pub lastinstall: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTemperatureRange {
    pub min: u16,
    pub max: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightControl {
    pub mindimlevel: u32,
    pub maxlumen: u32,
    pub colorgamuttype: Option<String>,
    pub colorgamut: Option<Vec<[f64; 2]>>,
    pub ct: Option<ColorTemperatureRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightStreaming {
    pub renderer: bool,
    pub proxy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightCapabilities {
    pub certified: bool,
    pub control: LightControl,
    pub streaming: LightStreaming,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub archetype: String,
    pub function: String,
    pub direction: String,
}

/// A light as reported by `/lights`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub light_type: String,
    pub state: LightState,
    pub swupdate: SoftwareUpdate,
    pub modelid: String,
    pub manufacturername: String,
    pub productname: String,
    pub capabilities: LightCapabilities,
    pub config: LightConfig,
    pub uniqueid: String,
    pub swversion: String,
    pub swconfigid: Option<String>,
    pub productid: Option<String>,
}

keyed!(Light, u32);

/// A light found by the last search, see [`Bridge::find_new_lights`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLight {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
}

keyed!(NewLight, u32);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLights {
    pub lights: Vec<NewLight>,
    /// Timestamp of the last search, or `active` while one is running.
    pub last_scan: Option<String>,
}

impl Bridge {
    /// Returns a vector of all lights that are registered at this `Bridge`, sorted by their id's.
    ///
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///    .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// for light in &bridge.get_all_lights().await.unwrap() {
    ///     println!("{:?}", light);
    /// }
    /// # })
    /// ```
    pub async fn get_all_lights(&self) -> Result<Vec<Light>> {
        self.get_collection("lights").await
    }

    pub async fn get_light(&self, id: u32) -> Result<Light> {
        let mut light: Light = self.get_item(&format!("lights/{id}"), "Light", id).await?;
        light.id = id;
        Ok(light)
    }

    /// Starts a search for new lights. Results are read with [`Bridge::get_new_lights`].
    pub async fn find_new_lights(&self) -> Result<()> {
        self.submit_empty(Method::POST, "lights").await?;
        Ok(())
    }

    pub async fn get_new_lights(&self) -> Result<NewLights> {
        let body = self.fetch("lights/new").await?;
        crate::bridge::check_for_errors(&body)?;
        let (lights, last_scan) = crate::collection::normalize_scan(&body)?;
        Ok(NewLights { lights, last_scan })
    }

    pub async fn rename_light(&self, id: u32, name: &str) -> Result<()> {
        let name = crate::validate::name(name)?;
        self.ensure_light(id).await?;
        self.submit(Method::PUT, &format!("lights/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    /// Turns the light on without touching its color.
    pub async fn turn_on_light(&self, id: u32) -> Result<()> {
        self.ensure_light(id).await?;
        self.put_light_state(id, &LightCommand::default().on()).await
    }

    /// Turns the light on with the given CIE `x`/`y` color, brightness, hue and saturation.
    ///
    /// The parameters are range-checked before anything is sent to the bridge.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///    .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// bridge.turn_on_light_with_color(4, 0.2, 0.9, 100, 200, 200).await.unwrap();
    /// # })
    /// ```
    pub async fn turn_on_light_with_color(
        &self,
        id: u32,
        x: f64,
        y: f64,
        bri: u8,
        hue: u32,
        sat: u8,
    ) -> Result<()> {
        let command = LightCommand::color(x, y, bri, hue, sat)?;
        self.ensure_light(id).await?;
        self.put_light_state(id, &command).await
    }

    pub async fn turn_off_light(&self, id: u32) -> Result<()> {
        self.ensure_light(id).await?;
        self.put_light_state(id, &LightCommand::default().off()).await
    }

    /// Sends an arbitrary state change to a light.
    pub async fn set_light_state(&self, id: u32, command: &LightCommand) -> Result<()> {
        command.validate()?;
        self.ensure_light(id).await?;
        self.put_light_state(id, command).await
    }

    pub async fn delete_light(&self, id: u32) -> Result<()> {
        self.ensure_light(id).await?;
        self.submit_empty(Method::DELETE, &format!("lights/{id}"))
            .await?;
        Ok(())
    }

    async fn put_light_state(&self, id: u32, command: &LightCommand) -> Result<()> {
        self.submit(Method::PUT, &format!("lights/{id}/state"), command)
            .await?;
        Ok(())
    }

    pub(crate) async fn ensure_light(&self, id: u32) -> Result<()> {
        self.get_light(id).await.map(|_| ())
    }

    /// Checks that every light in `ids` exists.
    pub(crate) async fn ensure_lights(&self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            match self.ensure_light(id).await {
                Err(HueError::NotFound { .. }) => {
                    return Err(HueError::validation("One of the lights is invalid"))
                }
                other => other?,
            }
        }
        Ok(())
    }
}
