use fl_core::User;

/// Result of loading the user cache - distinguishes "not found" from errors.
#[derive(Debug, Default)]
pub struct LoadResult {
    /// Most recently updated first.
    pub users: Vec<User>,
    /// Present if file exists but is corrupted
    pub corruption_error: Option<String>,
}
