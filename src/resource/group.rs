use super::{id_strings, LightCommand};
use crate::{validate, Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

/// Group kinds that can be created through the API.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr,
)]
pub enum GroupType {
    #[default]
    LightGroup,
    Room,
    Luminaire,
    LightSource,
}

impl GroupType {
    /// Luminaire and LightSource groups are managed by the bridge itself.
    pub fn is_deletable(self) -> bool {
        !matches!(self, GroupType::Luminaire | GroupType::LightSource)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupState {
    pub all_on: bool,
    pub any_on: bool,
}

/// The last command sent to every light of a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupAction {
    pub on: bool,
    pub bri: u8,
    pub hue: u16,
    pub sat: u8,
    pub effect: String,
    pub xy: Vec<f64>,
    pub ct: u16,
    pub alert: String,
    pub colormode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
    pub lights: Vec<String>,
    pub sensors: Vec<String>,
    /// Kept as text: the bridge also reports kinds such as `Entertainment` or `Zone`.
    #[serde(rename = "type")]
    pub group_type: String,
    pub class: Option<String>,
    pub state: GroupState,
    pub recycle: bool,
    pub action: GroupAction,
}

keyed!(Group, u32);

impl Group {
    /// Member light IDs as numbers; entries the bridge sends that are not numeric are skipped.
    pub fn light_ids(&self) -> Vec<u32> {
        self.lights.iter().filter_map(|id| id.parse().ok()).collect()
    }
}

#[derive(Debug, Serialize)]
struct NewGroup<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    group_type: &'a str,
    class: &'a str,
    lights: Vec<String>,
}

const DEFAULT_CLASS: &str = "Other";

impl Bridge {
    /// Returns a vector of all groups that are registered at this `Bridge`, sorted by their id's.
    pub async fn get_all_groups(&self) -> Result<Vec<Group>> {
        self.get_collection("groups").await
    }

    pub async fn get_group(&self, id: u32) -> Result<Group> {
        let mut group: Group = self.get_item(&format!("groups/{id}"), "Group", id).await?;
        group.id = id;
        Ok(group)
    }

    /// Creates a group from existing lights.
    ///
    /// A blank `group_type` means `LightGroup` and a blank `class` means `Other`.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///    .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// bridge.create_group("Living Room", "Room", "", &[1, 2]).await.unwrap();
    /// # })
    /// ```
    pub async fn create_group(
        &self,
        name: &str,
        group_type: &str,
        class: &str,
        lights: &[u32],
    ) -> Result<()> {
        let name = validate::name(name)?;
        let group_type = match group_type.trim() {
            "" => GroupType::default(),
            other => GroupType::from_str(other).map_err(|_| {
                HueError::validation(
                    "Group Type must be one of the following: LightGroup, Room, Luminaire, LightSource",
                )
            })?,
        };
        let class = match class.trim() {
            "" => DEFAULT_CLASS,
            other => other,
        };
        self.ensure_lights(lights).await?;

        let body = NewGroup {
            name,
            group_type: group_type.as_ref(),
            class,
            lights: id_strings(lights),
        };
        self.submit(Method::POST, "groups", &body).await?;
        Ok(())
    }

    pub async fn rename_group(&self, id: u32, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_group(id).await?;
        self.put_group_attributes(id, &json!({ "name": name }))
            .await
    }

    /// Replaces the member lights of a group.
    pub async fn set_lights_in_group(&self, id: u32, lights: &[u32]) -> Result<()> {
        self.ensure_group(id).await?;
        self.ensure_lights(lights).await?;
        self.put_group_attributes(id, &json!({ "lights": id_strings(lights) }))
            .await
    }

    pub async fn set_group_class(&self, id: u32, class: &str) -> Result<()> {
        let class = validate::not_blank("Class", class)?;
        self.ensure_group(id).await?;
        self.put_group_attributes(id, &json!({ "class": class }))
            .await
    }

    /// Turns on every light of the group without touching their colors.
    pub async fn turn_on_all_lights_in_group(&self, id: u32) -> Result<()> {
        self.ensure_group(id).await?;
        self.put_group_action(id, &LightCommand::default().on())
            .await
    }

    /// Turns on every light of the group with one color; see [`Bridge::turn_on_light_with_color`].
    pub async fn turn_on_all_lights_in_group_with_color(
        &self,
        id: u32,
        x: f64,
        y: f64,
        bri: u8,
        hue: u32,
        sat: u8,
    ) -> Result<()> {
        let command = LightCommand::color(x, y, bri, hue, sat)?;
        self.ensure_group(id).await?;
        self.put_group_action(id, &command).await
    }

    pub async fn turn_off_all_lights_in_group(&self, id: u32) -> Result<()> {
        self.ensure_group(id).await?;
        self.put_group_action(id, &LightCommand::default().off())
            .await
    }

    /// Sends an arbitrary state change to every light of the group.
    pub async fn set_group_action(&self, id: u32, command: &LightCommand) -> Result<()> {
        command.validate()?;
        self.ensure_group(id).await?;
        self.put_group_action(id, command).await
    }

    /// Deletes a group. Luminaire and LightSource groups are refused without asking the bridge.
    pub async fn delete_group(&self, id: u32) -> Result<()> {
        let group = self.get_group(id).await?;
        if GroupType::from_str(&group.group_type).is_ok_and(|t| !t.is_deletable()) {
            return Err(HueError::GroupNotDeletable {
                id,
                group_type: group.group_type,
            });
        }
        self.submit_empty(Method::DELETE, &format!("groups/{id}"))
            .await?;
        Ok(())
    }

    async fn put_group_attributes(&self, id: u32, attributes: &serde_json::Value) -> Result<()> {
        self.submit(Method::PUT, &format!("groups/{id}"), attributes)
            .await?;
        Ok(())
    }

    async fn put_group_action(&self, id: u32, command: &LightCommand) -> Result<()> {
        self.submit(Method::PUT, &format!("groups/{id}/action"), command)
            .await?;
        Ok(())
    }

    pub(crate) async fn ensure_group(&self, id: u32) -> Result<()> {
        self.get_group(id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn group(group_type: &str) -> serde_json::Value {
        json!({
            "name": "Group 1",
            "lights": ["1", "2"],
            "sensors": [],
            "type": group_type,
            "class": "Living room",
            "state": { "all_on": false, "any_on": true },
            "recycle": false,
            "action": {
                "on": false, "bri": 100, "hue": 200, "sat": 250, "effect": "none",
                "xy": [0.3, 0.4], "ct": 250, "alert": "select", "colormode": "ct"
            }
        })
    }

    async fn with_group(group_type: &str) -> (MockServer, Bridge) {
        let (server, bridge) = setup().await;
        mount_get(&server, "groups/1", group(group_type)).await;
        (server, bridge)
    }

    #[tokio::test]
    async fn all_groups() {
        let (server, bridge) = setup().await;
        mount_get(
            &server,
            "groups",
            json!({ "1": group("LightGroup"), "2": group("Room"), "11": group("Zone") }),
        )
        .await;
        let groups = bridge.get_all_groups().await.unwrap();
        let ids: Vec<u32> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 11]);
        assert_eq!(groups[1].group_type, "Room");
        assert_eq!(groups[0].light_ids(), vec![1, 2]);
        assert!(groups[0].state.any_on);
        assert_eq!(groups[0].action.colormode, "ct");
    }

    #[tokio::test]
    async fn no_groups() {
        let (server, bridge) = setup().await;
        mount_empty(&server, "groups").await;
        assert!(bridge.get_all_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_group() {
        let (server, bridge) = setup().await;
        mount_empty(&server, "groups/3").await;
        let err = bridge.get_group(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Group 3 not found");
    }

    #[tokio::test]
    async fn create_room() {
        let (server, bridge) = setup().await;
        mount_get(&server, "lights/1", light_fixture()).await;
        mount_get(&server, "lights/2", light_fixture()).await;
        Mock::given(method("POST"))
            .and(path(api_path("groups")))
            .and(body_json(json!({
                "name": "Living Room",
                "type": "Room",
                "class": "Other",
                "lights": ["1", "2"]
            })))
            .respond_with(success("1"))
            .expect(1)
            .mount(&server)
            .await;
        bridge
            .create_group("Living Room", "Room", "", &[1, 2])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_defaults_to_light_group() {
        let (server, bridge) = setup().await;
        mount_get(&server, "lights/1", light_fixture()).await;
        Mock::given(method("POST"))
            .and(path(api_path("groups")))
            .and(body_json(json!({
                "name": "Desk",
                "type": "LightGroup",
                "class": "Office",
                "lights": ["1"]
            })))
            .respond_with(success("2"))
            .expect(1)
            .mount(&server)
            .await;
        bridge.create_group(" Desk ", " ", "Office", &[1]).await.unwrap();
    }

    #[tokio::test]
    async fn create_rejects_bad_input_locally() {
        let (server, bridge) = setup().await;
        expect_no_requests(&server).await;
        let err = bridge.create_group("", "Room", "", &[1]).await.unwrap_err();
        assert_eq!(err.to_string(), "Name must not be empty");
        let err = bridge
            .create_group("Den", "Zone", "", &[1])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Group Type must be one of the following: LightGroup, Room, Luminaire, LightSource"
        );
    }

    #[tokio::test]
    async fn create_with_unknown_light() {
        let (server, bridge) = setup().await;
        mount_get(&server, "lights/1", light_fixture()).await;
        mount_empty(&server, "lights/5").await;
        expect_no(&server, "POST").await;
        let err = bridge
            .create_group("Den", "Room", "", &[1, 5])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "One of the lights is invalid");
    }

    #[tokio::test]
    async fn create_reports_bridge_error() {
        let (server, bridge) = setup().await;
        Mock::given(method("POST"))
            .and(path(api_path("groups")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 301, "address": "/groups", "description": "Groups table full"}}
            ])))
            .mount(&server)
            .await;
        let err = bridge.create_group("Den", "", "", &[]).await.unwrap_err();
        assert!(err.to_string().contains("Groups table full"));
    }

    #[tokio::test]
    async fn attribute_updates() {
        let (server, bridge) = with_group("LightGroup").await;
        mount_get(&server, "lights/3", light_fixture()).await;
        for body in [
            json!({ "name": "Upstairs" }),
            json!({ "lights": ["3"] }),
            json!({ "class": "Bedroom" }),
        ] {
            Mock::given(method("PUT"))
                .and(path(api_path("groups/1")))
                .and(body_json(body))
                .respond_with(success("/groups/1"))
                .expect(1)
                .mount(&server)
                .await;
        }
        bridge.rename_group(1, "Upstairs").await.unwrap();
        bridge.set_lights_in_group(1, &[3]).await.unwrap();
        bridge.set_group_class(1, "Bedroom").await.unwrap();
    }

    #[tokio::test]
    async fn updates_on_missing_group() {
        let (server, bridge) = setup().await;
        mount_empty(&server, "groups/3").await;
        expect_no(&server, "PUT").await;
        for err in [
            bridge.rename_group(3, "x").await.unwrap_err(),
            bridge.set_group_class(3, "Kitchen").await.unwrap_err(),
            bridge.turn_on_all_lights_in_group(3).await.unwrap_err(),
            bridge.turn_off_all_lights_in_group(3).await.unwrap_err(),
        ] {
            assert_eq!(err.to_string(), "Group 3 not found");
        }
    }

    #[tokio::test]
    async fn group_action() {
        let (server, bridge) = with_group("Room").await;
        for body in [
            json!({ "on": true }),
            json!({ "on": false }),
            json!({"on": true, "xy": [0.3, 0.3], "bri": 254, "hue": 65535, "sat": 0}),
        ] {
            Mock::given(method("PUT"))
                .and(path(api_path("groups/1/action")))
                .and(body_json(body))
                .respond_with(success("/groups/1/action"))
                .expect(1)
                .mount(&server)
                .await;
        }
        bridge.turn_on_all_lights_in_group(1).await.unwrap();
        bridge.turn_off_all_lights_in_group(1).await.unwrap();
        bridge
            .turn_on_all_lights_in_group_with_color(1, 0.3, 0.3, 254, 65535, 0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn group_color_is_validated_first() {
        let (server, bridge) = setup().await;
        expect_no_requests(&server).await;
        let err = bridge
            .turn_on_all_lights_in_group_with_color(1, 0.3, 0.3, 254, 70000, 0)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid hue value: hue must be between 0 and 65,535"
        );
    }

    #[tokio::test]
    async fn delete_light_group() {
        for group_type in ["LightGroup", "Room"] {
            let (server, bridge) = with_group(group_type).await;
            Mock::given(method("DELETE"))
                .and(path(api_path("groups/1")))
                .respond_with(success("/groups/1 deleted"))
                .expect(1)
                .mount(&server)
                .await;
            bridge.delete_group(1).await.unwrap();
        }
    }

    #[tokio::test]
    async fn delete_guard() {
        for group_type in ["LightSource", "Luminaire"] {
            let (server, bridge) = with_group(group_type).await;
            expect_no(&server, "DELETE").await;
            let err = bridge.delete_group(1).await.unwrap_err();
            assert!(matches!(err, HueError::GroupNotDeletable { id: 1, .. }));
            assert_eq!(
                err.to_string(),
                format!("Unable to delete group 1: Can't delete group with a type of {group_type}")
            );
        }
    }

    #[tokio::test]
    async fn delete_missing_group() {
        let (server, bridge) = setup().await;
        mount_empty(&server, "groups/4").await;
        expect_no(&server, "DELETE").await;
        let err = bridge.delete_group(4).await.unwrap_err();
        assert_eq!(err.to_string(), "Group 4 not found");
    }

    #[test]
    fn group_types() {
        assert_eq!(GroupType::from_str("Room").unwrap(), GroupType::Room);
        assert!(GroupType::from_str("room").is_err());
        assert_eq!(GroupType::default().to_string(), "LightGroup");
        assert!(GroupType::Room.is_deletable());
        assert!(!GroupType::LightSource.is_deletable());
    }
}
