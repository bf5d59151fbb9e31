//! LeanCloud application records exposed through cloud functions.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Cloud functions backing the app lookup.
pub const GET_LEANCLOUD_APPS: &str = "getLeanCloudApps";
pub const GET_LEANCLOUD_APP: &str = "getLeanCloudApp";
pub const GET_LEANCLOUD_APP_URL: &str = "getLeanCloudAppUrl";

/// Deployment region of a LeanCloud application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum LeanCloudRegion {
    #[serde(rename = "cn-n1")]
    #[strum(serialize = "cn-n1")]
    CnN1,
    #[serde(rename = "cn-e1")]
    #[strum(serialize = "cn-e1")]
    CnE1,
    #[serde(rename = "us-w1")]
    #[strum(serialize = "us-w1")]
    UsW1,
}

/// A LeanCloud application a ticket can be associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeanCloudApp {
    pub app_id: String,
    pub app_name: String,
    pub region: LeanCloudRegion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_deserializes_from_cloud_payload() {
        let json = serde_json::json!({
            "appId": "abc123",
            "appName": "Demo",
            "region": "us-w1"
        });
        let app: LeanCloudApp = serde_json::from_value(json).unwrap();
        assert_eq!(app.region, LeanCloudRegion::UsW1);
        assert_eq!(app.app_name, "Demo");
    }

    #[test]
    fn test_region_parses_from_cli_string() {
        assert_eq!("cn-e1".parse::<LeanCloudRegion>().unwrap(), LeanCloudRegion::CnE1);
        assert_eq!(LeanCloudRegion::CnN1.to_string(), "cn-n1");
        assert!("eu-c1".parse::<LeanCloudRegion>().is_err());
    }
}
