//! SNTP wall-clock adapter.
//!
//! Implements [`TimePort`] for the schedule monitor.  The dashboard sends
//! trigger times in local epoch seconds, so the configured UTC offset is
//! folded in here — the domain never sees timezone arithmetic.
//!
//! - **`target_os = "espidf"`** — starts the ESP-IDF SNTP service and
//!   reports `None` until the first sync completes.
//! - **`not(target_os = "espidf")`** — uses the host system clock with the
//!   same offset, for simulation runs.  Tests use their own mock clock.

use crate::app::ports::TimePort;
use crate::error::CommsError;

/// Reject obviously unsynced time (before 2020-01-01).
const EPOCH_2020: u64 = 1_577_836_800;

pub struct SntpTimeAdapter {
    offset_secs: i64,
    #[cfg(target_os = "espidf")]
    sntp: esp_idf_svc::sntp::EspSntp<'static>,
}

impl SntpTimeAdapter {
    /// Start the SNTP service with the given local-time offset.
    #[cfg(target_os = "espidf")]
    pub fn new(offset_secs: i32) -> Result<Self, CommsError> {
        let sntp =
            esp_idf_svc::sntp::EspSntp::new_default().map_err(|_| CommsError::SntpNotSynced)?;
        Ok(Self {
            offset_secs: offset_secs as i64,
            sntp,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(offset_secs: i32) -> Result<Self, CommsError> {
        Ok(Self {
            offset_secs: offset_secs as i64,
        })
    }

    #[cfg(target_os = "espidf")]
    fn synced(&self) -> bool {
        self.sntp.get_sync_status() == esp_idf_svc::sntp::SyncStatus::Completed
    }

    #[cfg(not(target_os = "espidf"))]
    fn synced(&self) -> bool {
        true
    }

    fn system_epoch(&self) -> Option<u64> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?
            .as_secs();
        let local = now.checked_add_signed(self.offset_secs)?;
        (local >= EPOCH_2020).then_some(local)
    }
}

impl TimePort for SntpTimeAdapter {
    fn now_epoch_secs(&self) -> Option<u64> {
        if !self.synced() {
            return None;
        }
        self.system_epoch()
    }
}
