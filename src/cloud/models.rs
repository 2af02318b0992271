//! AWS Lambda layer entities as reported by the AWS CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the Lambda API, e.g. `2023-11-15T10:20:30.123+0000`
const LAMBDA_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// One published version of a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerVersion {
    pub name: String,
    pub version: u64,
    pub arn: String,
    /// Creation date exactly as AWS reported it
    pub created: String,
    pub compatible_runtimes: Vec<String>,
    pub description: Option<String>,
}

impl LayerVersion {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(&self.created, LAMBDA_DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(&self.created))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn from_raw(raw: RawLayerVersion, fallback_name: Option<&str>) -> Self {
        let name = layer_name_from_arn(&raw.layer_version_arn)
            .or(fallback_name)
            .unwrap_or_default()
            .to_string();

        Self {
            name,
            version: raw.version,
            arn: raw.layer_version_arn,
            created: raw.created_date,
            compatible_runtimes: raw.compatible_runtimes,
            description: raw.description.filter(|d| !d.is_empty()),
        }
    }
}

/// Extract the layer name from `arn:aws:lambda:REGION:ACCOUNT:layer:NAME[:VERSION]`
pub fn layer_name_from_arn(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    if parts.nth(5)? != "layer" {
        return None;
    }
    parts.next().filter(|name| !name.is_empty())
}

/// Identity returned by `aws sts get-caller-identity`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLayerVersion {
    layer_version_arn: String,
    version: u64,
    #[serde(default)]
    created_date: String,
    #[serde(default)]
    compatible_runtimes: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLayer {
    layer_name: String,
    latest_matching_version: Option<RawLayerVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListLayersResponse {
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListLayerVersionsResponse {
    #[serde(default)]
    layer_versions: Vec<RawLayerVersion>,
}

/// Parse `aws lambda list-layers` output, one entry per layer
pub fn parse_list_layers(json: &str) -> serde_json::Result<Vec<LayerVersion>> {
    let response: ListLayersResponse = serde_json::from_str(json)?;
    Ok(response
        .layers
        .into_iter()
        .filter_map(|layer| {
            let name = layer.layer_name;
            layer
                .latest_matching_version
                .map(|raw| LayerVersion::from_raw(raw, Some(&name)))
        })
        .collect())
}

/// Parse `aws lambda list-layer-versions` output
pub fn parse_list_layer_versions(json: &str, name: &str) -> serde_json::Result<Vec<LayerVersion>> {
    let response: ListLayerVersionsResponse = serde_json::from_str(json)?;
    Ok(response
        .layer_versions
        .into_iter()
        .map(|raw| LayerVersion::from_raw(raw, Some(name)))
        .collect())
}

/// Parse the output of `publish-layer-version` or `get-layer-version`
pub fn parse_layer_version(json: &str, name: &str) -> serde_json::Result<LayerVersion> {
    let raw: RawLayerVersion = serde_json::from_str(json)?;
    Ok(LayerVersion::from_raw(raw, Some(name)))
}

/// Order by layer name, newest version first
pub fn sort_versions(versions: &mut [LayerVersion]) {
    versions.sort_by(|a, b| a.name.cmp(&b.name).then(b.version.cmp(&a.version)));
}
