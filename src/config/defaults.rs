//! Default configuration values

/// Project manifest file name
pub const MANIFEST_FILE: &str = "multibuild.toml";

/// Per-project state directory
pub const STATE_DIR: &str = ".multibuild";

/// Selection file name inside the state directory
pub const SELECTION_FILE: &str = "selection.toml";

/// Active target file name inside the state directory
pub const ACTIVE_TARGET_FILE: &str = "active-target";

/// Selection file format version
pub const SELECTION_FORMAT_VERSION: u32 = 1;

/// Selected flag given to targets that newly appear in the catalog
pub const DEFAULT_SELECTED: bool = true;

/// Default output directory, relative to the project
pub const DEFAULT_OUTPUT_DIR: &str = "builds";

/// Default cargo profile
pub const DEFAULT_PROFILE: &str = "release";

/// Number of stderr lines kept as a failure diagnostic
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;
