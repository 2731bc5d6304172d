//! One embedded PostgreSQL cluster per test binary.
//!
//! The library keeps the cluster alive for the life of the process; each test
//! then clones its own database from a migrated template.

use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const TEST_CLUSTER_PASSWORD: &str = "fishing_embedded_test";

/// Start the shared cluster, or return the one already running.
///
/// Bootstrap is retried because the first run downloads PostgreSQL binaries
/// and parallel suites can race on the shared data directory.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pin `PG_PASSWORD` so a data directory left by an earlier run still
/// accepts the password the library generates settings with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the library starts any threads; the shared
        // handle is initialised at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", TEST_CLUSTER_PASSWORD);
        }
    }
}
