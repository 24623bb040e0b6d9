/// Production endpoint of the Fireblocks API.
pub const DEFAULT_BASE_URL: &str = "https://api.fireblocks.io";

/// Timeout applied by the default transport, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Env values used to configure the client.
/// Env overriding the base url requests are sent to.
pub const FIREBLOCKS_API_BASE_URL: &str = "FIREBLOCKS_API_BASE_URL";
pub use fireblocks_token::constants::{
    FIREBLOCKS_API_KEY, FIREBLOCKS_SECRET_KEY, FIREBLOCKS_SECRET_KEY_PATH,
};
