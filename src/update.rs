//! Update gate
//!
//! Decides between continuing startup on the current build and handing the
//! rest of the foreground session to the update-download flow. "Latest" is
//! whatever the feed said; no version comparison happens here.

use crate::feed::UpdateInfo;
use crate::locale::Locale;

/// Payload for the update-download flow once it owns the session.
#[derive(Clone, Debug)]
pub struct UpdateHandoff {
    pub download_url: String,
    pub version: String,
}

pub enum GateDecision {
    Continue,
    HandOff(UpdateHandoff),
}

pub fn run_update_gate(info: &UpdateInfo, locale: &dyn Locale) -> GateDecision {
    if info.is_latest {
        return GateDecision::Continue;
    }

    let accepted = locale.prompt(
        "NEW_VERSION_AVAILABLE",
        "NEW_VERSION_AVAILABLE_DESC",
        &[&info.version, &info.description],
    );
    if !accepted {
        // Running an outdated build is allowed; try again next start
        println!(
            "[windlass] update - user declined {}, continuing on the current build",
            info.version
        );
        return GateDecision::Continue;
    }

    GateDecision::HandOff(UpdateHandoff {
        download_url: info.download_url.clone(),
        version: info.version.clone(),
    })
}
