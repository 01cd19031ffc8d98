use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use grouptop::system::collector::Collector;
use grouptop::system::kill::{KillResult, kill_process};
use grouptop::system::source::ProcessSource;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

fn spawn_long_lived_child() -> Child {
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("powershell");
        c.args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "Start-Sleep -Seconds 30",
        ]);
        c
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.args(["-c", "sleep 30"]);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn child process")
}

fn wait_for_pid(pid: u32, timeout: Duration) -> bool {
    let mut sys = System::new();
    let sys_pid = Pid::from_u32(pid);
    let deadline = Instant::now() + timeout;
    loop {
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        if sys.process(sys_pid).is_some() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

fn wait_for_exit(child: &mut Child, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(50)),
            Ok(None) => {
                let _ = child.kill();
                panic!("child process did not exit before timeout");
            }
            Err(err) => {
                let _ = child.kill();
                panic!("failed waiting for child exit: {err}");
            }
        }
    }
}

#[test]
fn kill_nonexistent_pid_returns_not_found() {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let result = kill_process(&sys, u32::MAX, Signal::Term);
    assert!(matches!(result, KillResult::NotFound(_)));
}

#[test]
fn collector_terminates_spawned_child() {
    let mut child = spawn_long_lived_child();
    let pid = child.id();

    if !wait_for_pid(pid, Duration::from_secs(3)) {
        let _ = child.kill();
        panic!("child process PID {pid} was not observed before kill attempt");
    }

    let collector = Collector::new();
    match collector.terminate(pid) {
        KillResult::Success(reported, _) => {
            assert_eq!(reported, pid);
            wait_for_exit(&mut child, Duration::from_secs(5));
        }
        KillResult::Failed(_, err) => {
            let _ = child.kill();
            panic!("terminate reported failure: {err}");
        }
        KillResult::NotFound(_) => {
            let _ = child.kill();
            panic!("child process not found by the collector");
        }
    }
}
