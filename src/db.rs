use std::collections::HashMap;
use std::future::Future;

use anyhow::{ensure, Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::Serialize;

/// Key attribute of the countries table.
pub const KEY_ATTR: &str = "Name";

pub type Item = HashMap<String, AttributeValue>;

/// One scraped record. Field names double as DynamoDB attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "PascalCase")]
pub struct Country {
    pub name: String,
    pub population: String,
}

pub fn country_item(country: &Country) -> Result<Item> {
    Ok(serde_dynamo::to_item(country)?)
}

pub fn country_key(name: &str) -> Result<Item> {
    let value: AttributeValue = serde_dynamo::to_attribute_value(name)?;
    Ok(HashMap::from([(KEY_ATTR.to_string(), value)]))
}

/// Minimal key-value surface the pipeline needs from a table.
pub trait ItemStore: Send + Sync {
    /// Upsert by key; no condition, no batching.
    fn put_item(&self, item: Item) -> impl Future<Output = Result<()>> + Send;

    /// `Ok(None)` when the key is absent.
    fn get_item(&self, key: Item) -> impl Future<Output = Result<Option<Item>>> + Send;
}

pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    /// Resolve ambient AWS config (env, profile, IMDS, Lambda role) once per process.
    pub async fn connect(table: &str) -> Result<Self> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        ensure_region(&config).context("configuring aws db client")?;

        Ok(Self {
            client: Client::new(&config),
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

fn ensure_region(config: &aws_config::SdkConfig) -> Result<()> {
    ensure!(config.region().is_some(), "no AWS region configured");
    Ok(())
}

impl ItemStore for DynamoStore {
    async fn put_item(&self, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(())
    }

    async fn get_item(&self, key: Item) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(output.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweden() -> Country {
        Country {
            name: "Sweden".into(),
            population: "9515744".into(),
        }
    }

    #[test]
    fn item_has_name_and_population() {
        let item = country_item(&sweden()).unwrap();
        assert_eq!(item.len(), 2);
        assert_eq!(item.get("Name"), Some(&AttributeValue::S("Sweden".into())));
        assert_eq!(
            item.get("Population"),
            Some(&AttributeValue::S("9515744".into()))
        );
    }

    #[test]
    fn key_holds_only_name() {
        let key = country_key("Sweden").unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key.get(KEY_ATTR), Some(&AttributeValue::S("Sweden".into())));
    }

    #[test]
    fn empty_name_still_converts() {
        let item = country_item(&Country {
            name: String::new(),
            population: String::new(),
        })
        .unwrap();
        assert_eq!(item.get("Name"), Some(&AttributeValue::S(String::new())));
    }

    #[test]
    fn item_back_to_country() {
        let item = country_item(&sweden()).unwrap();
        let back: Country = serde_dynamo::from_item(item).unwrap();
        assert_eq!(back, sweden());
    }

    #[test]
    fn missing_region_rejected() {
        let config = aws_config::SdkConfig::builder().build();
        let err = ensure_region(&config).unwrap_err();
        assert_eq!(err.to_string(), "no AWS region configured");
    }
}
