mod smoke;

use std::sync::Once;

/// Installs a logger once per test binary. `RUST_LOG=debug` shows buffer transfers and growth.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
