use crate::{validate, Bridge, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A test on a sensor or configuration attribute, e.g. `/sensors/2/state/buttonevent eq 16`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCondition {
    pub address: String,
    pub operator: String,
    /// Absent for operators such as `dx` that take no operand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An API call the rule performs when all of its conditions hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleAction {
    pub address: String,
    pub method: String,
    pub body: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    #[serde(skip)]
    pub id: u32,
    pub name: String,
    pub lasttriggered: Option<String>,
    pub creationtime: String,
    pub timestriggered: u32,
    pub owner: String,
    pub status: String,
    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
}

keyed!(Rule, u32);

#[derive(Debug, Serialize)]
struct NewRule<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    conditions: &'a [RuleCondition],
    #[serde(skip_serializing_if = "is_empty")]
    actions: &'a [RuleAction],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

impl Bridge {
    pub async fn get_all_rules(&self) -> Result<Vec<Rule>> {
        self.get_collection("rules").await
    }

    pub async fn get_rule(&self, id: u32) -> Result<Rule> {
        let mut rule: Rule = self.get_item(&format!("rules/{id}"), "Rule", id).await?;
        rule.id = id;
        Ok(rule)
    }

    /// Creates a rule. Empty condition or action lists are left out of the request and
    /// left for the bridge to reject.
    pub async fn create_rule(
        &self,
        name: &str,
        conditions: &[RuleCondition],
        actions: &[RuleAction],
    ) -> Result<()> {
        let name = validate::name(name)?;
        let body = NewRule {
            name,
            conditions,
            actions,
        };
        self.submit(Method::POST, "rules", &body).await?;
        Ok(())
    }

    pub async fn rename_rule(&self, id: u32, name: &str) -> Result<()> {
        let name = validate::name(name)?;
        self.ensure_rule(id).await?;
        self.submit(Method::PUT, &format!("rules/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    pub async fn delete_rule(&self, id: u32) -> Result<()> {
        self.ensure_rule(id).await?;
        self.submit_empty(Method::DELETE, &format!("rules/{id}"))
            .await?;
        Ok(())
    }

    async fn ensure_rule(&self, id: u32) -> Result<()> {
        self.get_rule(id).await.map(|_| ())
    }
}
