//! Canonical on-disk names for penguin.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ## Layout
//!
//! | Location | Purpose |
//! |----------|---------|
//! | `<data>/creative_ideas.json` | Idea library collection |
//! | `<data>/history.json` | Generation history (newest first) |
//! | `<data>/desktop_items.json` | Desktop layout items |
//! | `<home>/creative_images/` | Images extracted from ideas |
//! | `<home>/input/` | User-supplied input images |
//! | `<home>/output/` | Generated output images |

/// Home directory name under the user's home (~/.penguin)
pub const HOME_DIR_NAME: &str = ".penguin";

/// Config file location relative to a project root
pub const CONFIG_DIR_NAME: &str = ".penguin";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment override for the home directory
pub const HOME_ENV: &str = "PENGUIN_HOME";

pub const DATA_DIR_NAME: &str = "data";
pub const INPUT_DIR_NAME: &str = "input";
pub const OUTPUT_DIR_NAME: &str = "output";
pub const CREATIVE_DIR_NAME: &str = "creative_images";

pub const IDEAS_FILE: &str = "creative_ideas.json";
pub const HISTORY_FILE: &str = "history.json";
pub const LAYOUT_FILE: &str = "desktop_items.json";

/// Prefix shared by every asset reference
pub const FILES_PREFIX: &str = "/files/";

/// Extensions recognised as images when listing a scope directory
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp", ".gif"];

/// Default number of history entries retained
pub const DEFAULT_HISTORY_LIMIT: usize = 500;
