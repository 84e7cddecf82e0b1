//! Run configuration for differential API testing
//!
//! A [`RunConfig`] names the two servers under comparison and the pacing
//! knobs of the run controller. It can be built in code, loaded from a YAML
//! file and overridden from environment variables:
//!
//! ```yaml
//! server_a: http://localhost:5000
//! server_b: http://localhost:6000
//! delay_ms: 100
//! pause_after_failure: true
//! ```
//!
//! | Variable                       | Field                  |
//! |--------------------------------|------------------------|
//! | `DELTAPI_SERVER_A`             | `server_a`             |
//! | `DELTAPI_SERVER_B`             | `server_b`             |
//! | `DELTAPI_DELAY_MS`             | `delay_ms`             |
//! | `DELTAPI_PAUSE_AFTER_FAILURE`  | `pause_after_failure`  |
//! | `DELTAPI_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |

mod error;
mod run_config;

pub use error::{ConfigError, ConfigResult};
pub use run_config::{
    RunConfig, DEFAULT_DELAY_MS, DEFAULT_PAUSE_POLL_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
