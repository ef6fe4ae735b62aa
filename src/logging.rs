//! `env_logger` setup for binaries and tests using this crate

use std::sync::Once;

/// Filter variable, e.g. `FOGL_LOG=fogl=trace`
pub const LOG_ENV: &str = "FOGL_LOG";
pub const LOG_STYLE_ENV: &str = "FOGL_LOG_STYLE";

static INIT: Once = Once::new();

/// Install the logger once; later calls do nothing
pub fn init() {
    INIT.call_once(|| {
        env_logger::init_from_env(
            env_logger::Env::new()
                .filter_or(LOG_ENV, "opengl=debug,fogl=debug")
                .write_style(LOG_STYLE_ENV),
        );
    });
}
