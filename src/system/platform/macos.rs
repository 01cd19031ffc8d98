use libproc::libproc::pid_rusage::{RUsageInfoV2, pidrusage};

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn private_memory(pid: u32) -> Option<u64> {
        // phys_footprint is what Activity Monitor reports as "Memory"
        pidrusage::<RUsageInfoV2>(pid as i32)
            .ok()
            .map(|usage| usage.ri_phys_footprint)
    }
}
