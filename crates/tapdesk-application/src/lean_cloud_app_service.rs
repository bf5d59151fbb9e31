//! Lookup of the LeanCloud applications a ticket can be associated with.

use crate::graph::Memo;
use futures::future::FutureExt;
use serde_json::json;
use std::sync::Arc;
use tapdesk_core::Result;
use tapdesk_core::backend::CloudFunctions;
use tapdesk_core::cloud::{
    GET_LEANCLOUD_APP, GET_LEANCLOUD_APP_URL, GET_LEANCLOUD_APPS, LeanCloudApp, LeanCloudRegion,
};

/// Cloud-function backed LeanCloud app lookup.
///
/// The app list never goes stale: it is fetched once per service and shared
/// by every caller. A failed fetch is retried on the next call.
pub struct LeanCloudAppService {
    functions: Arc<dyn CloudFunctions>,
    apps: Memo<Vec<LeanCloudApp>>,
}

impl LeanCloudAppService {
    pub fn new(functions: Arc<dyn CloudFunctions>) -> Self {
        Self {
            functions,
            apps: Memo::new("leancloud_apps"),
        }
    }

    /// Apps visible to the logged-in user.
    pub async fn apps(&self) -> Result<Arc<Vec<LeanCloudApp>>> {
        self.apps
            .get_or_compute(|| {
                let functions = self.functions.clone();
                async move {
                    let value = functions.run(GET_LEANCLOUD_APPS, json!({})).await?;
                    Ok(serde_json::from_value(value)?)
                }
                .boxed()
            })
            .await
    }

    /// Looks up an app by id on behalf of `username`.
    pub async fn app(&self, app_id: &str, username: &str) -> Result<Option<LeanCloudApp>> {
        let value = self
            .functions
            .run(
                GET_LEANCLOUD_APP,
                json!({ "appId": app_id, "username": username }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Console URL of an app in `region`.
    pub async fn app_url(&self, app_id: &str, region: LeanCloudRegion) -> Result<Option<String>> {
        let value = self
            .functions
            .run(
                GET_LEANCLOUD_APP_URL,
                json!({ "appId": app_id, "region": region }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}
