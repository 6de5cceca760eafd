pub const SECOND_IN_MS: u64 = 1000;
pub const MINUTE_IN_MS: u64 = 60 * SECOND_IN_MS;
