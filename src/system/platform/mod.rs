/// Per-OS readers for metrics `sysinfo` does not expose.
pub trait PlatformExtensions {
    /// Bytes charged exclusively to the process, when the OS reports them.
    fn private_memory(pid: u32) -> Option<u64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod fallback;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use fallback as platform_impl;

pub fn private_memory(pid: u32) -> Option<u64> {
    platform_impl::Platform::private_memory(pid)
}
