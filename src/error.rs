//! Terminal conditions a provisioning run can end in.

use thiserror::Error;

/// Failures that mean more than "an I/O call failed".
///
/// Ordinary I/O faults during artifact writes propagate as
/// `anyhow::Error` with context naming the step. These two variants
/// are the conditions callers need to tell apart: one is a hard
/// platform limitation, the other is the benign "nothing to do" state.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Neither mount-enumeration mechanism exists on this host.
    #[error(
        "couldn't list mounts: neither /Volumes nor /proc/mounts exists. \
         Maybe you're on Windows (not supported)"
    )]
    UnsupportedPlatform,

    /// Every mount was scanned and none carried a readable marker.
    #[error(
        "couldn't find the flashed drive: no mounted volume carries '.configure_me'. \
         Maybe it's already configured, or not plugged in"
    )]
    TargetNotFound,
}
