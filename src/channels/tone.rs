use std::io::Write;

use crate::{
    channels::{error::ChannelError, traits::NotificationChannel},
    models::{alert::AlertEvent, channel::ToneConfig},
};

/// ASCII BEL, which the controlling terminal renders as an audible beep.
const BELL: &[u8] = b"\x07";

/// A channel that sounds the terminal bell a configured number of times.
pub struct ToneChannel {
    config: ToneConfig,
}

impl ToneChannel {
    /// Creates a new `ToneChannel` with the given configuration.
    pub fn new(config: ToneConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl NotificationChannel for ToneChannel {
    async fn notify(&self, _event: &AlertEvent) -> Result<(), ChannelError> {
        for strike in 0..self.config.repeats {
            if strike > 0 {
                tokio::time::sleep(self.config.interval_ms).await;
            }

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(BELL)?;
            stdout.flush()?;
        }
        Ok(())
    }
}
