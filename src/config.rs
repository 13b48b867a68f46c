use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static FINDER_CANDIDATE_BUDGET: OnceLock<usize> = OnceLock::new();

/// How many top-scoring finder candidates the locator pairs up when
/// searching for the finder triple
pub(crate) fn finder_candidate_budget() -> usize {
    *FINDER_CANDIDATE_BUDGET
        .get_or_init(|| parse_env_usize("QRCODEC_FINDER_CANDIDATES", 4).clamp(3, 16))
}

static PARALLEL_SCAN_MIN_HEIGHT: OnceLock<usize> = OnceLock::new();

/// Image height above which the locator scans rows on the rayon pool
pub(crate) fn parallel_scan_min_height() -> usize {
    *PARALLEL_SCAN_MIN_HEIGHT.get_or_init(|| parse_env_usize("QRCODEC_PARALLEL_MIN_HEIGHT", 1024))
}
