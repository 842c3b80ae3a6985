use serde::Serialize;
use std::time::Instant;

/// Counters for the frames presented to one view.
pub struct RenderStats {
    frame_count: u64,
    drop_count: u64,
    total_bytes: u64,
    start_time: Instant,
    last_frame_time: Option<Instant>,
    last_error: Option<String>,
}

/// Snapshot of render stats for IPC serialisation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStatsSnapshot {
    pub fps: f64,
    pub frame_count: u64,
    pub drop_count: u64,
    pub drop_rate: f64,
    pub bandwidth_bps: u64,
    pub ms_since_last_frame: Option<u64>,
    pub last_error: Option<String>,
}

impl RenderStats {
    /// Create new stats with zeroed counters.
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            drop_count: 0,
            total_bytes: 0,
            start_time: Instant::now(),
            last_frame_time: None,
            last_error: None,
        }
    }

    /// Record a frame packaged into a container of `bytes` length.
    pub fn record_frame(&mut self, bytes: usize) {
        self.frame_count += 1;
        self.total_bytes += bytes as u64;
        self.last_frame_time = Some(Instant::now());
    }

    /// Record a frame that failed conversion and was skipped.
    pub fn record_drop(&mut self, reason: impl Into<String>) {
        self.drop_count += 1;
        self.last_error = Some(reason.into());
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn drop_count(&self) -> u64 {
        self.drop_count
    }

    /// Presented frames per second since the view was created.
    pub fn fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0.0;
        }
        self.frame_count as f64 / elapsed
    }

    /// Drop rate as a percentage (0.0 - 100.0).
    pub fn drop_rate(&self) -> f64 {
        let total = self.frame_count + self.drop_count;
        if total == 0 {
            return 0.0;
        }
        (self.drop_count as f64 / total as f64) * 100.0
    }

    /// Container bytes per second.
    pub fn bandwidth_bps(&self) -> u64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0;
        }
        (self.total_bytes as f64 / elapsed) as u64
    }

    /// Take a serialisable snapshot.
    pub fn snapshot(&self) -> RenderStatsSnapshot {
        RenderStatsSnapshot {
            fps: self.fps(),
            frame_count: self.frame_count,
            drop_count: self.drop_count,
            drop_rate: self.drop_rate(),
            bandwidth_bps: self.bandwidth_bps(),
            ms_since_last_frame: self
                .last_frame_time
                .map(|t| t.elapsed().as_millis() as u64),
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for RenderStats {
    fn default() -> Self {
        Self::new()
    }
}
