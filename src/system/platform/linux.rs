use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn private_memory(pid: u32) -> Option<u64> {
        // smaps_rollup needs ptrace-read access; other users' processes fall back to RSS
        let path = format!("/proc/{pid}/smaps_rollup");
        let contents = std::fs::read_to_string(path).ok()?;
        parse_private_kib(&contents).map(|kib| kib * 1024)
    }
}

fn parse_private_kib(contents: &str) -> Option<u64> {
    let mut clean = None;
    let mut dirty = None;
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("Private_Clean:") {
            clean = parse_kib_field(rest);
        } else if let Some(rest) = line.strip_prefix("Private_Dirty:") {
            dirty = parse_kib_field(rest);
        }
    }
    Some(clean? + dirty?)
}

fn parse_kib_field(rest: &str) -> Option<u64> {
    rest.split_whitespace().next()?.parse().ok()
}
