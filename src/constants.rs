pub mod keys {

    /// Key holding the ordered array of account records.
    pub const REGISTRATIONS: &str = "registrations";

    pub const OCCUPANCY_SUFFIX: &str = "data";

    /// Layout documents live under the bare username.
    #[must_use]
    pub fn layout(username: &str) -> String {
        username.to_string()
    }

    #[must_use]
    pub fn occupancy(username: &str) -> String {
        format!("{username}{OCCUPANCY_SUFFIX}")
    }
}

pub mod registration {

    pub const DEFAULT_USERNAME_PREFIX: &str = "PG";

    pub const DEFAULT_USERNAME_DIGITS: usize = 3;

    pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
}

pub mod config {

    pub const FILE_NAME: &str = "config.toml";

    /// Directory name under the platform config dir.
    pub const APP_DIR: &str = "digipg";

    /// Dot-directory under `$HOME`.
    pub const HOME_DIR: &str = ".digipg";
}
