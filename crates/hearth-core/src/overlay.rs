//! Photo overlay and the movement lock that comes with it.

use log::{debug, warn};

use hearth_logic::interact::PHOTO_DISMISS_PROMPT;
use hearth_logic::primitives::AssetRef;

use crate::host::{Host, PlayerControls};

/// At most one photo is open at a time. The controls saved on `open` are
/// restored exactly on the matching `close`.
#[derive(Debug, Default)]
pub struct PhotoOverlay {
    open: Option<(AssetRef, PlayerControls)>,
}

impl PhotoOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn texture(&self) -> Option<&AssetRef> {
        self.open.as_ref().map(|(texture, _)| texture)
    }

    /// Controls saved by the current `open`.
    pub fn saved_controls(&self) -> Option<PlayerControls> {
        self.open.as_ref().map(|(_, controls)| *controls)
    }

    /// Show `texture` and freeze the player. Refused while a photo is
    /// already open, so the saved controls are never overwritten.
    pub fn open(&mut self, host: &mut impl Host, texture: &AssetRef) -> bool {
        if let Some((current, _)) = &self.open {
            warn!(
                "photo '{}' requested while '{}' is open, ignoring",
                texture.as_str(),
                current.as_str()
            );
            return false;
        }
        let saved = host.player_controls();
        host.set_player_controls(PlayerControls::FROZEN);
        host.show_photo(texture);
        host.set_prompt(Some(PHOTO_DISMISS_PROMPT));
        debug!("photo '{}' opened, saved {:?}", texture.as_str(), saved);
        self.open = Some((texture.clone(), saved));
        true
    }

    /// Hide the photo and restore the saved controls. No-op when closed.
    pub fn close(&mut self, host: &mut impl Host) -> bool {
        let Some((texture, saved)) = self.open.take() else {
            return false;
        };
        host.hide_photo();
        host.set_player_controls(saved);
        host.set_prompt(None);
        debug!("photo '{}' closed, restored {:?}", texture.as_str(), saved);
        true
    }
}
