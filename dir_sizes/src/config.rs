/// Puzzle constants for the two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskConfig {
    /// Part 1 counts directories strictly smaller than this.
    pub small_dir_threshold: u64,
    pub capacity: u64,
    pub required_free: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            small_dir_threshold: 100000,
            capacity: 70000000,
            required_free: 30000000,
        }
    }
}
