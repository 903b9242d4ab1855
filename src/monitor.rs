//! Periodic CPU and memory heartbeat in the logs.

use std::time::Duration;

use sysinfo::System;

/// Spawns a task that logs resource usage at the given interval.
pub fn spawn_monitor(interval: Duration) {
    tokio::spawn(async move {
        let mut sys = System::new_all();
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            sys.refresh_all();

            let cpus = sys.cpus();
            let cpu_percent = if cpus.is_empty() {
                0.0
            } else {
                cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
            };
            let total = sys.total_memory();
            let used = sys.used_memory();
            let memory_percent = if total == 0 {
                0.0
            } else {
                used as f64 * 100.0 / total as f64
            };

            tracing::info!(
                cpu_percent = (cpu_percent * 10.0).round() as f64 / 10.0,
                memory_percent = (memory_percent * 10.0).round() / 10.0,
                used_mb = used / 1024 / 1024,
                total_mb = total / 1024 / 1024,
                "resource usage"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_reports_nonzero_memory() {
        let mut sys = System::new_all();
        sys.refresh_memory();
        assert!(sys.total_memory() > 0);
    }
}
