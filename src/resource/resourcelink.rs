use crate::{validate, Bridge, HueError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Groups bridge resources that belong to one application feature, such as a wake-up routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLink {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub link_type: String,
    /// Application-defined class ID.
    #[serde(rename = "classid", alias = "class")]
    pub class: u32,
    pub owner: String,
    pub recycle: bool,
    /// Resource paths such as `/schedules/2`.
    pub links: Vec<String>,
}

keyed!(ResourceLink, u32);

const RESOURCE: &str = "Resource link";

impl Bridge {
    pub async fn get_all_resource_links(&self) -> Result<Vec<ResourceLink>> {
        self.get_collection("resourcelinks").await
    }

    pub async fn get_resource_link(&self, id: u32) -> Result<ResourceLink> {
        let mut link: ResourceLink = self
            .get_item(&format!("resourcelinks/{id}"), RESOURCE, id)
            .await?;
        link.id = id;
        Ok(link)
    }

    pub async fn create_resource_link(
        &self,
        name: &str,
        description: &str,
        recycle: bool,
        links: &[&str],
    ) -> Result<()> {
        let name = validate::name(name)?;
        if links.is_empty() {
            return Err(HueError::validation("Links must not be empty"));
        }
        let body = json!({
            "name": name,
            "description": description,
            "recycle": recycle,
            "links": links,
        });
        self.submit(Method::POST, "resourcelinks", &body).await?;
        Ok(())
    }

    pub async fn rename_resource_link(&self, id: u32, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_resource_link(id).await?;
        self.submit(
            Method::PUT,
            &format!("resourcelinks/{id}"),
            &json!({ "name": name }),
        )
        .await?;
        Ok(())
    }

    pub async fn set_resource_link_description(&self, id: u32, description: &str) -> Result<()> {
        let description = validate::not_blank("Description", description)?;
        self.ensure_resource_link(id).await?;
        self.submit(
            Method::PUT,
            &format!("resourcelinks/{id}"),
            &json!({ "description": description }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_resource_link(&self, id: u32) -> Result<()> {
        self.ensure_resource_link(id).await?;
        self.submit_empty(Method::DELETE, &format!("resourcelinks/{id}"))
            .await?;
        Ok(())
    }

    async fn ensure_resource_link(&self, id: u32) -> Result<()> {
        self.get_resource_link(id).await.map(|_| ())
    }
}
