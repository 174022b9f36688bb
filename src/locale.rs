//! Localized yes/no prompts
//!
//! String content is deliberately minimal; the orchestrator only needs
//! confirmation dialogs. Lookup falls back to the key itself so a missing
//! entry degrades to something greppable instead of panicking.

use dialog::{Choice, DialogBox};

pub trait Locale {
    fn prompt(&self, title_key: &str, body_key: &str, args: &[&str]) -> bool;
}

static STRINGS: &[(&str, &str)] = &[
    ("NEW_VERSION_AVAILABLE", "New version available"),
    (
        "NEW_VERSION_AVAILABLE_DESC",
        "Version {0} is available:\n\n{1}\n\nDownload it now? The launcher restarts after the update.",
    ),
    ("DOWNLOAD_GAME_PACKAGE", "Download game package"),
    (
        "DOWNLOAD_GAME_PACKAGE_DESC",
        "{0} is not installed. Queue the full game package for download?",
    ),
];

pub fn lookup(key: &str) -> &str {
    STRINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Fill `{0}`, `{1}`, … placeholders in registration order.
pub fn interpolate(template: &str, args: &[&str]) -> String {
    let mut text = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        text = text.replace(&format!("{{{i}}}"), arg);
    }
    text
}

/// Desktop provider backed by the system dialog tool.
pub struct DialogLocale;

impl Locale for DialogLocale {
    fn prompt(&self, title_key: &str, body_key: &str, args: &[&str]) -> bool {
        let title = interpolate(lookup(title_key), args);
        let body = interpolate(lookup(body_key), args);

        if let Ok(choice) = dialog::Question::new(body.as_str()).title(title.as_str()).show() {
            if choice == Choice::Yes {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_positional_args() {
        assert_eq!(
            interpolate("Version {0}: {1}", &["0.2.0", "bug fixes"]),
            "Version 0.2.0: bug fixes"
        );
    }

    #[test]
    fn missing_key_falls_back_to_the_key() {
        assert_eq!(lookup("NO_SUCH_KEY"), "NO_SUCH_KEY");
        assert_eq!(lookup("NEW_VERSION_AVAILABLE"), "New version available");
    }

    #[test]
    fn interpolate_leaves_unknown_placeholders() {
        assert_eq!(interpolate("{0} and {5}", &["a"]), "a and {5}");
    }
}
