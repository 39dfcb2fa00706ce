use crate::core::system_monitor::{CpuTimeSnapshot, CpuTimes};
use crate::error::{MonitorError, Result};

/// Parse one `cpu`/`cpuN` line of `/proc/stat` into its label and counters.
///
/// Kernels older than 2.6.11 omit `steal` (and older still omit `iowait`,
/// `irq` and `softirq`); missing trailing fields read as zero.
pub fn parse_cpu_line(line: &str, path: &str) -> Result<(String, CpuTimes)> {
    let mut parts = line.split_whitespace();
    let label = parts
        .next()
        .filter(|l| l.starts_with("cpu"))
        .ok_or_else(|| MonitorError::parse_anomaly(path, format!("not a cpu line: {:?}", line)))?;

    let values = parts
        .take(8)
        .map(|v| v.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MonitorError::parse_anomaly(path, format!("{}: {}", label, e)))?;

    if values.len() < 4 {
        return Err(MonitorError::parse_anomaly(
            path,
            format!("{}: expected at least 4 counters, got {}", label, values.len()),
        ));
    }

    let field = |i: usize| values.get(i).copied().unwrap_or(0);
    Ok((
        label.to_string(),
        CpuTimes {
            user: field(0),
            nice: field(1),
            system: field(2),
            idle: field(3),
            iowait: field(4),
            irq: field(5),
            softirq: field(6),
            steal: field(7),
        },
    ))
}

/// Parse the aggregate and per-core lines of `/proc/stat`.
///
/// A malformed per-core line is skipped. A missing or malformed aggregate
/// line is an error since every CPU metric depends on it.
pub fn parse_proc_stat(content: &str, path: &str) -> Result<CpuTimeSnapshot> {
    let mut aggregate = None;
    let mut cores = Vec::new();

    for line in content.lines().filter(|l| l.starts_with("cpu")) {
        let is_aggregate = line.split_whitespace().next() == Some("cpu");
        match parse_cpu_line(line, path) {
            Ok((_, times)) if is_aggregate => aggregate = Some(times),
            Ok((_, times)) => cores.push(times),
            Err(e) if is_aggregate => return Err(e),
            Err(e) => log::debug!("Skipping core line: {}", e),
        }
    }

    let aggregate = aggregate
        .ok_or_else(|| MonitorError::parse_anomaly(path, "no aggregate cpu line"))?;

    Ok(CpuTimeSnapshot { aggregate, cores })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  4705 356 584 3699176 23060 0 277 0 0 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 0 0
cpu1 1335 38 152 924411 4577 0 13 7 0 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
ctxt 1990473
btime 1062191376
processes 2915
";

    #[test]
    fn test_parse_proc_stat() {
        let snapshot = parse_proc_stat(STAT, "/proc/stat").unwrap();
        assert_eq!(snapshot.core_count(), 2);
        assert_eq!(snapshot.aggregate.user, 4705);
        assert_eq!(snapshot.aggregate.idle, 3699176);
        assert_eq!(snapshot.aggregate.softirq, 277);
        assert_eq!(snapshot.cores[1].steal, 7);
    }

    #[test]
    fn test_short_line_defaults_trailing_fields() {
        let (label, times) = parse_cpu_line("cpu3 10 20 30 40", "/proc/stat").unwrap();
        assert_eq!(label, "cpu3");
        assert_eq!(times.total(), 100);
        assert_eq!(times.steal, 0);
    }

    #[test]
    fn test_malformed_core_line_is_skipped() {
        let content = "cpu 1 2 3 4 5 6 7 8\ncpu0 1 two 3 4\ncpu1 1 2 3 4 5 6 7 8\n";
        let snapshot = parse_proc_stat(content, "/proc/stat").unwrap();
        assert_eq!(snapshot.core_count(), 1);
    }

    #[test]
    fn test_missing_aggregate_is_an_error() {
        let err = parse_proc_stat("cpu0 1 2 3 4\nctxt 5\n", "/proc/stat").unwrap_err();
        assert!(matches!(err, MonitorError::ParseAnomaly { .. }));
    }
}
