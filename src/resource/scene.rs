use super::id_strings;
use crate::{validate, Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Application-defined data stored with a scene. The bridge does not interpret it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneAppData {
    pub version: u32,
    pub data: String,
}

impl SceneAppData {
    fn is_empty(&self) -> bool {
        self.version == 0 && self.data.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    /// `LightScene` or `GroupScene`.
    #[serde(rename = "type")]
    pub scene_type: String,
    /// Owning group of a `GroupScene`.
    pub group: Option<String>,
    pub lights: Vec<String>,
    pub owner: String,
    pub recycle: bool,
    pub locked: bool,
    pub appdata: SceneAppData,
    pub picture: String,
    pub lastupdated: Option<String>,
    pub version: u32,
}

keyed!(Scene, String);

#[derive(Debug, Serialize)]
struct NewScene<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    scene_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    recycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    appdata: Option<SceneAppData>,
}

impl Bridge {
    /// Returns every scene stored on the bridge, sorted by ID.
    pub async fn get_all_scenes(&self) -> Result<Vec<Scene>> {
        self.get_collection("scenes").await
    }

    pub async fn get_scene(&self, id: &str) -> Result<Scene> {
        if id.trim().is_empty() {
            return Err(HueError::not_found("Scene", id));
        }
        validate::path_segment("Scene", id)?;
        let mut scene: Scene = self.get_item(&format!("scenes/{id}"), "Scene", id).await?;
        scene.id = id.to_owned();
        Ok(scene)
    }

    /// Creates a `LightScene` that captures the current state of `lights`.
    ///
    /// `appdata` is only sent when it carries a version or data.
    pub async fn create_light_scene(
        &self,
        name: &str,
        lights: &[u32],
        recycle: bool,
        appdata: Option<SceneAppData>,
    ) -> Result<()> {
        let name = validate::name(name)?;
        if lights.is_empty() {
            return Err(HueError::validation("Lights must not be empty"));
        }
        self.ensure_lights(lights).await?;

        let body = NewScene {
            name,
            scene_type: "LightScene",
            lights: Some(id_strings(lights)),
            group: None,
            recycle,
            appdata: appdata.filter(|data| !data.is_empty()),
        };
        self.submit(Method::POST, "scenes", &body).await?;
        Ok(())
    }

    /// Creates a `GroupScene` bound to `group`; the bridge fills in the member lights.
    pub async fn create_group_scene(
        &self,
        name: &str,
        group: u32,
        recycle: bool,
        appdata: Option<SceneAppData>,
    ) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_group(group).await?;

        let body = NewScene {
            name,
            scene_type: "GroupScene",
            lights: None,
            group: Some(group.to_string()),
            recycle,
            appdata: appdata.filter(|data| !data.is_empty()),
        };
        self.submit(Method::POST, "scenes", &body).await?;
        Ok(())
    }

    pub async fn rename_scene(&self, id: &str, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_scene(id).await?;
        self.submit(Method::PUT, &format!("scenes/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    pub async fn set_lights_in_scene(&self, id: &str, lights: &[u32]) -> Result<()> {
        if lights.is_empty() {
            return Err(HueError::validation("Lights must not be empty"));
        }
        self.ensure_scene(id).await?;
        self.ensure_lights(lights).await?;
        self.submit(
            Method::PUT,
            &format!("scenes/{id}"),
            &json!({ "lights": id_strings(lights) }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_scene(&self, id: &str) -> Result<()> {
        self.ensure_scene(id).await?;
        self.submit_empty(Method::DELETE, &format!("scenes/{id}"))
            .await?;
        Ok(())
    }

    async fn ensure_scene(&self, id: &str) -> Result<()> {
        self.get_scene(id).await.map(|_| ())
    }
}
