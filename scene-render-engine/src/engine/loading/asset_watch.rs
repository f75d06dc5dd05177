use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;

struct WatchedAsset {
    label: String,
    handle: UntypedHandle,
    reported: bool,
}

/// Assets whose failure should be surfaced once to the log and the host page.
#[derive(Resource, Default)]
pub struct AssetLoadWatch {
    assets: Vec<WatchedAsset>,
}

impl AssetLoadWatch {
    pub fn watch(&mut self, label: impl Into<String>, handle: UntypedHandle) {
        self.assets.push(WatchedAsset {
            label: label.into(),
            handle,
            reported: false,
        });
    }

    /// Collect newly failed assets as `(label, reason)`. Each asset is returned at most once.
    pub fn take_failures(
        &mut self,
        mut failure_of: impl FnMut(UntypedAssetId) -> Option<String>,
    ) -> Vec<(String, String)> {
        let mut failures = Vec::new();
        for asset in self.assets.iter_mut().filter(|asset| !asset.reported) {
            if let Some(reason) = failure_of(asset.handle.id()) {
                asset.reported = true;
                failures.push((asset.label.clone(), reason));
            }
        }
        failures
    }
}

pub fn report_failed_assets(
    mut watch: ResMut<AssetLoadWatch>,
    asset_server: Res<AssetServer>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let failures = watch.take_failures(|id| match asset_server.get_load_state(id) {
        Some(LoadState::Failed(error)) => Some(error.to_string()),
        _ => None,
    });

    for (asset, reason) in failures {
        error!("Failed to load {}: {}", asset, reason);
        rpc_interface.send_notification(
            "asset_load_failed",
            serde_json::json!({
                "asset": asset,
                "error": reason
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_reported_once() {
        let mut watch = AssetLoadWatch::default();
        let broken: Handle<Image> = Handle::default();
        watch.watch("textures/broken.png", broken.untyped());

        let first = watch.take_failures(|_| Some("not found".to_string()));
        assert_eq!(
            first,
            vec![("textures/broken.png".to_string(), "not found".to_string())]
        );

        let second = watch.take_failures(|_| Some("not found".to_string()));
        assert!(second.is_empty());
    }

    #[test]
    fn pending_assets_stay_watched() {
        let mut watch = AssetLoadWatch::default();
        let handle: Handle<Image> = Handle::default();
        watch.watch("models/v5.glb", handle.untyped());

        assert!(watch.take_failures(|_| None).is_empty());
        assert_eq!(watch.take_failures(|_| Some("io".to_string())).len(), 1);
    }
}
