use crate::types::Asset;

/// File name of the main installer.
pub const INSTALLER_NAME: &str = "XKey.dmg";

const PACKAGE_EXTENSION: &str = ".dmg";

/// Marks the input-method-only package, which is never offered as an update.
const EXCLUDED_MARKER: &str = "IM";

/// Picks the installer among a release's assets.
///
/// An exact [`INSTALLER_NAME`] match wins. Otherwise the first `.dmg` whose
/// name does not contain `IM` is used.
pub fn select_asset(assets: &[Asset]) -> Option<&Asset> {
    assets
        .iter()
        .find(|asset| asset.name == INSTALLER_NAME)
        .or_else(|| {
            assets.iter().find(|asset| {
                asset.name.ends_with(PACKAGE_EXTENSION) && !asset.name.contains(EXCLUDED_MARKER)
            })
        })
}
