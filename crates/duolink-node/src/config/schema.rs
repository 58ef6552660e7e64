use serde::Deserialize;
use duolink_core::error::{DuolinkError, Result};

/// Reference clock of the UART divisor latch.
pub const UART_CLOCK_DIVISOR: u32 = 115_200;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    #[serde(default)]
    pub line: LineConfig,

    #[serde(default)]
    pub session: SessionTiming,

    #[serde(default)]
    pub transport: TransportConfig,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DuolinkError::UnsupportedVersion);
        }
        self.line.validate()?;
        self.session.validate()?;
        self.transport.validate()?;
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            line: LineConfig::default(),
            session: SessionTiming::default(),
            transport: TransportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
    Mark,
    Space,
}

impl Parity {
    /// LCR bits 3-5.
    pub fn lcr_bits(self) -> u8 {
        match self {
            Parity::None => 0b000,
            Parity::Odd => 0b001,
            Parity::Even => 0b011,
            Parity::Mark => 0b101,
            Parity::Space => 0b111,
        }
    }
}

/// Serial line settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    #[serde(default = "default_baud")]
    pub baud: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default = "default_parity")]
    pub parity: Parity,
    #[serde(default = "default_fifo")]
    pub fifo: bool,
    #[serde(default = "default_rx_trigger")]
    pub rx_trigger: u8,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            baud: default_baud(),
            data_bits: default_data_bits(),
            stop_bits: default_stop_bits(),
            parity: default_parity(),
            fifo: default_fifo(),
            rx_trigger: default_rx_trigger(),
        }
    }
}

impl LineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=UART_CLOCK_DIVISOR).contains(&self.baud) {
            return Err(DuolinkError::BadConfig(
                "line.baud must be between 1 and 115200".into(),
            ));
        }
        if !(5..=8).contains(&self.data_bits) {
            return Err(DuolinkError::BadConfig(
                "line.data_bits must be between 5 and 8".into(),
            ));
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(DuolinkError::BadConfig(
                "line.stop_bits must be 1 or 2".into(),
            ));
        }
        if ![1, 4, 8, 14].contains(&self.rx_trigger) {
            return Err(DuolinkError::BadConfig(
                "line.rx_trigger must be one of 1, 4, 8, 14".into(),
            ));
        }
        Ok(())
    }

    /// Divisor latch value as (DLL, DLM).
    pub fn divisor(&self) -> (u8, u8) {
        let dl = UART_CLOCK_DIVISOR / self.baud.max(1);
        ((dl & 0xFF) as u8, ((dl >> 8) & 0xFF) as u8)
    }

    /// Line Control Register value (DLAB clear).
    pub fn lcr(&self) -> u8 {
        let word = self.data_bits.saturating_sub(5) & 0b11;
        let stop = (self.stop_bits.saturating_sub(1) & 0b1) << 2;
        word | stop | (self.parity.lcr_bits() << 3)
    }

    /// FIFO Control Register value: enable, clear both FIFOs, trigger level.
    pub fn fcr(&self) -> u8 {
        if !self.fifo {
            return 0;
        }
        let trigger = match self.rx_trigger {
            1 => 0x00,
            4 => 0x40,
            8 => 0x80,
            _ => 0xC0,
        };
        0b0000_0111 | trigger
    }
}

fn default_baud() -> u32 {
    1200
}
fn default_data_bits() -> u8 {
    8
}
fn default_stop_bits() -> u8 {
    1
}
fn default_parity() -> Parity {
    Parity::Odd
}
fn default_fifo() -> bool {
    true
}
fn default_rx_trigger() -> u8 {
    4
}

/// Handshake and clock-sync timing, all in ticks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionTiming {
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Wait before the first `Search`.
    #[serde(default = "default_discovery_grace_ticks")]
    pub discovery_grace_ticks: u32,
    /// Interval between `Search`/`Reply` beacons.
    #[serde(default = "default_heartbeat_ticks")]
    pub heartbeat_ticks: u32,
    /// Interval between Host's `Sync` messages.
    #[serde(default = "default_sync_interval_ticks")]
    pub sync_interval_ticks: u32,
    /// Consecutive matching `Sync`s before Peer reports `Synced`.
    #[serde(default = "default_sync_streak_required")]
    pub sync_streak_required: u32,
    /// Added to Host's clock to pick the start tick.
    #[serde(default = "default_start_margin_ticks")]
    pub start_margin_ticks: u64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            discovery_grace_ticks: default_discovery_grace_ticks(),
            heartbeat_ticks: default_heartbeat_ticks(),
            sync_interval_ticks: default_sync_interval_ticks(),
            sync_streak_required: default_sync_streak_required(),
            start_margin_ticks: default_start_margin_ticks(),
        }
    }
}

impl SessionTiming {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.tick_hz) {
            return Err(DuolinkError::BadConfig(
                "session.tick_hz must be between 1 and 1000".into(),
            ));
        }
        if self.heartbeat_ticks == 0 || self.sync_interval_ticks == 0 {
            return Err(DuolinkError::BadConfig(
                "session.heartbeat_ticks and session.sync_interval_ticks must be at least 1".into(),
            ));
        }
        if self.sync_streak_required == 0 {
            return Err(DuolinkError::BadConfig(
                "session.sync_streak_required must be at least 1".into(),
            ));
        }
        if self.start_margin_ticks == 0 {
            return Err(DuolinkError::BadConfig(
                "session.start_margin_ticks must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_tick_hz() -> u32 {
    60
}
fn default_discovery_grace_ticks() -> u32 {
    60
}
fn default_heartbeat_ticks() -> u32 {
    15
}
fn default_sync_interval_ticks() -> u32 {
    10
}
fn default_sync_streak_required() -> u32 {
    6
}
fn default_start_margin_ticks() -> u64 {
    239
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Attempts per byte while the transmitter reports busy.
    #[serde(default = "default_transmit_attempts")]
    pub transmit_attempts: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transmit_attempts: default_transmit_attempts(),
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.transmit_attempts) {
            return Err(DuolinkError::BadConfig(
                "transport.transmit_attempts must be between 1 and 64".into(),
            ));
        }
        Ok(())
    }
}

fn default_transmit_attempts() -> u32 {
    4
}
