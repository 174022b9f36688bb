//! Final launcher composition
//!
//! Pure assembly of the value the host shell renders. Every part was built
//! by an earlier stage; nothing here does I/O.

use crate::channel::ChannelClient;
use crate::feed::ReleaseFeed;
use crate::locale::Locale;
use crate::runtime::RuntimeHandle;

use std::sync::Arc;

pub struct Launcher {
    pub runtime: RuntimeHandle,
    // Held for the shell's own dialogs and background update checks
    #[allow(dead_code)]
    pub locale: Arc<dyn Locale>,
    #[allow(dead_code)]
    pub feed: Arc<dyn ReleaseFeed>,
    pub channel: Box<dyn ChannelClient>,
}

impl Launcher {
    pub fn compose(
        runtime: RuntimeHandle,
        locale: Arc<dyn Locale>,
        feed: Arc<dyn ReleaseFeed>,
        channel: Box<dyn ChannelClient>,
    ) -> Launcher {
        Launcher {
            runtime,
            locale,
            feed,
            channel,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} via {} (prefix {})",
            self.channel.server().display_name,
            self.runtime.loader_bin.display(),
            self.runtime.prefix.display()
        )
    }
}
