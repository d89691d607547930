use crate::{validate, Bridge, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Sensor readings. Only `lastupdated` is common to every sensor type; the
/// rest (`daylight`, `presence`, `temperature`, `buttonevent`, ...) is kept in `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastupdated: Option<String>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// Sensor settings, with the geographic fields of the daylight sensor typed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunriseoffset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunsetoffset: Option<i32>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensor {
    #[serde(skip)]
    pub id: u32,
    pub state: SensorState,
    pub config: SensorConfig,
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub modelid: String,
    pub manufacturername: String,
    pub swversion: String,
    pub uniqueid: Option<String>,
    pub recycle: Option<bool>,
}

keyed!(Sensor, u32);

/// A sensor found by the last search, see [`Bridge::find_new_sensors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundSensor {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
}

keyed!(FoundSensor, u32);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSensors {
    pub sensors: Vec<FoundSensor>,
    pub last_scan: Option<String>,
}

/// A software sensor to register with [`Bridge::create_sensor`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewSensor {
    pub name: String,
    pub modelid: String,
    pub swversion: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub uniqueid: String,
    pub manufacturername: String,
    pub state: SensorState,
    pub config: SensorConfig,
    pub recycle: bool,
}

impl NewSensor {
    fn validate(&self) -> Result<()> {
        validate::name(&self.name)?;
        validate::not_blank("ModelID", &self.modelid)?;
        validate::not_blank("SWVersion", &self.swversion)?;
        validate::not_blank("Type", &self.sensor_type)?;
        validate::not_blank("UniqueID", &self.uniqueid)?;
        validate::not_blank("ManufacturerName", &self.manufacturername)?;
        Ok(())
    }
}

impl Bridge {
    pub async fn get_all_sensors(&self) -> Result<Vec<Sensor>> {
        self.get_collection("sensors").await
    }

    pub async fn get_sensor(&self, id: u32) -> Result<Sensor> {
        let mut sensor: Sensor = self.get_item(&format!("sensors/{id}"), "Sensor", id).await?;
        sensor.id = id;
        Ok(sensor)
    }

    /// Registers a software sensor, e.g. a `CLIPGenericStatus` used by rules.
    pub async fn create_sensor(&self, sensor: &NewSensor) -> Result<()> {
        sensor.validate()?;
        self.submit(Method::POST, "sensors", sensor).await?;
        Ok(())
    }

    /// Starts a search for new sensors. Results are read with [`Bridge::get_new_sensors`].
    pub async fn find_new_sensors(&self) -> Result<()> {
        self.submit_empty(Method::POST, "sensors").await?;
        Ok(())
    }

    pub async fn get_new_sensors(&self) -> Result<NewSensors> {
        let body = self.fetch("sensors/new").await?;
        crate::bridge::check_for_errors(&body)?;
        let (sensors, last_scan) = crate::collection::normalize_scan(&body)?;
        Ok(NewSensors { sensors, last_scan })
    }

    pub async fn rename_sensor(&self, id: u32, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_sensor(id).await?;
        self.submit(Method::PUT, &format!("sensors/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    pub async fn turn_on_sensor(&self, id: u32) -> Result<()> {
        self.switch_sensor(id, true).await
    }

    pub async fn turn_off_sensor(&self, id: u32) -> Result<()> {
        self.switch_sensor(id, false).await
    }

    pub async fn delete_sensor(&self, id: u32) -> Result<()> {
        self.ensure_sensor(id).await?;
        self.submit_empty(Method::DELETE, &format!("sensors/{id}"))
            .await?;
        Ok(())
    }

    async fn switch_sensor(&self, id: u32, on: bool) -> Result<()> {
        self.ensure_sensor(id).await?;
        self.submit(
            Method::PUT,
            &format!("sensors/{id}/config"),
            &json!({ "on": on }),
        )
        .await?;
        Ok(())
    }

    async fn ensure_sensor(&self, id: u32) -> Result<()> {
        self.get_sensor(id).await.map(|_| ())
    }
}
