use crate::{validate, Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Enabled,
    Disabled,
}

/// The API call a schedule performs when it fires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleCommand {
    /// Full API path, including the user, e.g. `/api/<user>/groups/0/action`.
    pub address: String,
    pub method: String,
    pub body: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
    pub description: String,
    pub command: ScheduleCommand,
    pub time: String,
    pub localtime: Option<String>,
    pub created: String,
    pub status: String,
    pub autodelete: bool,
    pub starttime: Option<String>,
    pub recycle: bool,
}

keyed!(Schedule, u32);

/// Input to [`Bridge::create_schedule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewSchedule {
    pub name: String,
    pub description: String,
    pub command: ScheduleCommand,
    /// Local trigger time in the bridge's time pattern syntax, e.g. `PT00:10:00`.
    pub localtime: String,
    /// `enabled`, `disabled`, or blank to let the bridge decide.
    pub status: String,
    pub autodelete: bool,
    pub recycle: bool,
}

impl NewSchedule {
    fn validate(&self) -> Result<()> {
        validate::not_blank("Command Address", &self.command.address)?;
        if !matches!(self.command.method.trim(), "POST" | "PUT" | "DELETE") {
            return Err(HueError::validation(
                "Command Method must be either POST, PUT, or DELETE",
            ));
        }
        if self.command.body.as_object().map_or(true, |body| body.is_empty()) {
            return Err(HueError::validation("Command Body must not be empty"));
        }
        validate::not_blank("Localtime", &self.localtime)?;
        if !self.status.trim().is_empty() {
            parse_status(&self.status)?;
        }
        Ok(())
    }
}

fn parse_status(status: &str) -> Result<ScheduleStatus> {
    ScheduleStatus::from_str(status.trim())
        .map_err(|_| HueError::validation("Status must be either enabled or disabled"))
}

impl Bridge {
    /// Returns every schedule, sorted by ID.
    pub async fn get_all_schedules(&self) -> Result<Vec<Schedule>> {
        self.get_collection("schedules").await
    }

    pub async fn get_schedule(&self, id: u32) -> Result<Schedule> {
        let mut schedule: Schedule = self
            .get_item(&format!("schedules/{id}"), "Schedule", id)
            .await?;
        schedule.id = id;
        Ok(schedule)
    }

    /// Creates a schedule.
    /// ### Example
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// use huebridge::{NewSchedule, ScheduleCommand};
    /// use serde_json::json;
    ///
    /// let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
    ///    .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// let schedule = NewSchedule {
    ///     name: "Timer".into(),
    ///     command: ScheduleCommand {
    ///         address: "/api/rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj/groups/0/action".into(),
    ///         method: "PUT".into(),
    ///         body: json!({ "on": false }),
    ///     },
    ///     localtime: "PT00:10:00".into(),
    ///     ..Default::default()
    /// };
    /// bridge.create_schedule(&schedule).await.unwrap();
    /// # })
    /// ```
    pub async fn create_schedule(&self, schedule: &NewSchedule) -> Result<()> {
        schedule.validate()?;
        let mut body = serde_json::to_value(schedule)?;
        if schedule.status.trim().is_empty() {
            if let Some(fields) = body.as_object_mut() {
                fields.remove("status");
            }
        }
        self.submit(Method::POST, "schedules", &body).await?;
        Ok(())
    }

    pub async fn rename_schedule(&self, id: u32, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_schedule(id).await?;
        self.submit(Method::PUT, &format!("schedules/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    /// Enables or disables a schedule; `status` must be `enabled` or `disabled`.
    pub async fn set_schedule_status(&self, id: u32, status: &str) -> Result<()> {
        let status = parse_status(status)?;
        self.ensure_schedule(id).await?;
        self.submit(
            Method::PUT,
            &format!("schedules/{id}"),
            &json!({ "status": status.as_ref() }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_schedule(&self, id: u32) -> Result<()> {
        self.ensure_schedule(id).await?;
        self.submit_empty(Method::DELETE, &format!("schedules/{id}"))
            .await?;
        Ok(())
    }

    async fn ensure_schedule(&self, id: u32) -> Result<()> {
        self.get_schedule(id).await.map(|_| ())
    }
}
