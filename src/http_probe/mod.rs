pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::probe::probe_endpoint;
    pub use super::result::{ProbeResult, Status};
}

use std::fmt::Write;

/// Flatten an error and its sources into one string.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
