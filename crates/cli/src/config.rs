//! Layered configuration for the report renderers.
//!
//! The tree is assembled from three layers, later ones overriding earlier
//! ones key by key: defaults embedded in the binary, the system file
//! `/etc/diffdir.conf`, and the user file `$XDG_CONFIG_HOME/diffdir/config`
//! (defaulting to `~/.config/diffdir/config`). Missing or unreadable layers
//! are skipped; the comparison core never consults the tree.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Defaults compiled into the binary.
const EMBEDDED_DEFAULTS: &str = include_str!("../diffdir.conf");

const SYSTEM_CONFIG_PATH: &str = "/etc/diffdir.conf";

/// Read-only key/value configuration tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct ConfigTree {
    values: BTreeMap<String, String>,
}

impl ConfigTree {
    /// Builds the tree from all three layers.
    pub(crate) fn load() -> Self {
        let mut tree = Self::default();
        tree.merge_text(EMBEDDED_DEFAULTS);
        if let Ok(text) = fs::read_to_string(SYSTEM_CONFIG_PATH) {
            tree.merge_text(&text);
        }
        if let Some(path) = user_config_path() {
            if let Ok(text) = fs::read_to_string(path) {
                tree.merge_text(&text);
            }
        }
        tree
    }

    /// Merges `key = value` lines into the tree, later keys overriding.
    /// Blank lines and `#` comments are skipped; lines without `=` are
    /// ignored.
    fn merge_text(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                self.values
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    /// Returns the boolean at `key`, or `default` when absent or not a
    /// recognisable boolean.
    pub(crate) fn bool_value(&self, key: &str, default: bool) -> bool {
        match self.values.get(key).map(String::as_str) {
            Some("true") | Some("yes") | Some("1") => true,
            Some("false") | Some("no") | Some("0") => false,
            _ => default,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("diffdir").join("config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let mut tree = ConfigTree::default();
        tree.merge_text(EMBEDDED_DEFAULTS);
        assert!(tree.bool_value("detail.owner-names", false));
        assert!(tree.bool_value("detail.human-sizes", false));
    }

    #[test]
    fn later_layers_override_key_by_key() {
        let mut tree = ConfigTree::default();
        tree.merge_text("a = true\nb = true\n");
        tree.merge_text("b = false\n");
        assert!(tree.bool_value("a", false));
        assert!(!tree.bool_value("b", true));
    }

    #[test]
    fn comments_and_noise_are_skipped() {
        let mut tree = ConfigTree::default();
        tree.merge_text("# comment\n\nnot a pair\nkey = yes\n");
        assert!(tree.bool_value("key", false));
        assert_eq!(tree.values.len(), 1);
    }

    #[test]
    fn unknown_keys_fall_back_to_default() {
        let tree = ConfigTree::default();
        assert!(tree.bool_value("missing", true));
        assert!(!tree.bool_value("missing", false));
    }

    #[test]
    fn unparseable_booleans_fall_back_to_default() {
        let mut tree = ConfigTree::default();
        tree.merge_text("key = maybe\n");
        assert!(tree.bool_value("key", true));
    }
}
