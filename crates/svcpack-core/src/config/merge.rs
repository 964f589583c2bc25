//! Option layer merging logic
//!
//! Implements the 3-layer merge strategy:
//! Defaults -> Task -> Target

use super::schema::OptionsLayer;

/// Merge option layers, later layers taking precedence.
///
/// Scalar settings are replaced. `envVars` is merged key by key: an
/// overridden key keeps its original position and new keys are appended.
pub fn merge_layers<I>(layers: I) -> OptionsLayer
where
    I: IntoIterator<Item = OptionsLayer>,
{
    let mut merged = OptionsLayer::default();
    for layer in layers {
        merge_layer(&mut merged, layer);
    }
    merged
}

/// Merge a single overlay into `base`
fn merge_layer(base: &mut OptionsLayer, overlay: OptionsLayer) {
    if overlay.version.is_some() {
        base.version = overlay.version;
    }
    if overlay.working_path.is_some() {
        base.working_path = overlay.working_path;
    }
    if overlay.output_package.is_some() {
        base.output_package = overlay.output_package;
    }
    if overlay.exe_name.is_some() {
        base.exe_name = overlay.exe_name;
    }
    if overlay.svc_name.is_some() {
        base.svc_name = overlay.svc_name;
    }
    if overlay.vm_installutil_path.is_some() {
        base.vm_installutil_path = overlay.vm_installutil_path;
    }
    if overlay.local_msdeploy_path.is_some() {
        base.local_msdeploy_path = overlay.local_msdeploy_path;
    }

    // Deep merge env vars
    if let Some(env) = overlay.env_vars {
        let target = base.env_vars.get_or_insert_with(Default::default);
        for (key, value) in env {
            target.insert(key, value);
        }
    }
}
