//! Command translation: HTTP intents into bus primitive sequences

use crate::error::{GatewayError, Result};
use crate::resolver::AddressResolver;
use cec_bus::{KeyCode, RawCommand, SharedBus};
use tracing::{debug, warn};

/// Bus-wide volume intents. Volume is handled by the audio system for the
/// whole bus, so no device addressing is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCommand {
    Up,
    Down,
    Mute,
}

impl VolumeCommand {
    /// Parses the volume path segment ("up", "down", "mute").
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "up" => Some(VolumeCommand::Up),
            "down" => Some(VolumeCommand::Down),
            "mute" => Some(VolumeCommand::Mute),
            _ => None,
        }
    }
}

/// Turns each HTTP intent into one or more bus primitive calls
///
/// Single-primitive operations (power, volume, key press) propagate the bus
/// result directly. Multi-step operations (channel digit sequences, raw
/// transmit batches) abort on the first failing step and report it; steps
/// already issued are not rolled back, because the bus has no transactions.
#[derive(Clone)]
pub struct CommandTranslator {
    bus: SharedBus,
    resolver: AddressResolver,
}

impl CommandTranslator {
    pub fn new(bus: SharedBus) -> Self {
        let resolver = AddressResolver::new(bus.clone());
        Self { bus, resolver }
    }

    /// Powers a device on. Fire-and-forget: no acknowledgment polling.
    pub async fn power_on(&self, device: &str) -> Result<()> {
        let address = self.resolver.resolve(device).await?;
        self.bus.power_on(address).await?;
        debug!(device, %address, "Sent power on");
        Ok(())
    }

    /// Puts a device into standby.
    pub async fn power_off(&self, device: &str) -> Result<()> {
        let address = self.resolver.resolve(device).await?;
        self.bus.standby(address).await?;
        debug!(device, %address, "Sent standby");
        Ok(())
    }

    /// Issues one bus-wide volume primitive.
    pub async fn volume(&self, command: VolumeCommand) -> Result<()> {
        match command {
            VolumeCommand::Up => self.bus.volume_up().await?,
            VolumeCommand::Down => self.bus.volume_down().await?,
            VolumeCommand::Mute => self.bus.mute().await?,
        }
        Ok(())
    }

    /// Sends one key press identified by name or hex code literal.
    ///
    /// The identifier is parsed into the typed key vocabulary before
    /// anything touches the bus; an unparseable identifier is a client
    /// error and transmits nothing.
    pub async fn send_key(&self, device: &str, key: &str) -> Result<()> {
        let address = self.resolver.resolve(device).await?;
        let key_code =
            KeyCode::parse(key).ok_or_else(|| GatewayError::InvalidKey(key.to_string()))?;
        self.bus.send_key(address, key_code).await?;
        debug!(device, %address, %key_code, "Sent key press");
        Ok(())
    }

    /// Changes channel by sending one digit key press per channel character,
    /// in left-to-right order.
    ///
    /// CEC has no composite "tune to channel N" command; multi-digit entry
    /// is a sequence of discrete digit key presses, and the order is the
    /// channel. The whole string is validated up front, so a non-digit
    /// character rejects the request before any key is sent. On a mid-
    /// sequence bus failure the remaining digits are not sent and the error
    /// names the failing position.
    ///
    /// Returns the channel string for the response to echo.
    pub async fn change_channel(&self, device: &str, channel: &str) -> Result<String> {
        let address = self.resolver.resolve(device).await?;

        let digits = channel
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .and_then(|d| KeyCode::digit(d as u8))
                    .ok_or_else(|| GatewayError::InvalidChannel {
                        channel: channel.to_string(),
                        offending: c,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_steps = digits.len();
        for (index, digit) in digits.into_iter().enumerate() {
            self.bus.send_key(address, digit).await.map_err(|source| {
                warn!(device, channel, step = index + 1, "Channel digit failed");
                GatewayError::SequenceAborted {
                    failed_step: index + 1,
                    total_steps,
                    source,
                }
            })?;
        }

        debug!(device, channel, "Channel change sent");
        Ok(channel.to_string())
    }

    /// Forwards a batch of raw frames, in order, unmodified.
    ///
    /// The escape hatch for bus frames the gateway vocabulary does not
    /// model: no validation happens here. Same abort-and-report policy as
    /// channel sequences; the error names the failing frame index.
    pub async fn transmit(&self, commands: &[String]) -> Result<()> {
        let total_steps = commands.len();
        for (index, command) in commands.iter().enumerate() {
            self.bus
                .transmit(RawCommand::new(command.clone()))
                .await
                .map_err(|source| {
                    warn!(frame = %command, step = index + 1, "Raw transmit failed");
                    GatewayError::SequenceAborted {
                        failed_step: index + 1,
                        total_steps,
                        source,
                    }
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cec_bus::{BusCall, CecBus, LogicalAddress, PowerStatus, SimBus, SimDevice};
    use std::sync::Arc;

    fn topology() -> SimBus {
        SimBus::new()
            .with_device(
                SimDevice::new(LogicalAddress::TV, "TV")
                    .at("0.0.0.0")
                    .powered(PowerStatus::Standby),
            )
            .with_device(
                SimDevice::new(LogicalAddress::PLAYBACK_1, "Kodi")
                    .at("1.0.0.0")
                    .powered(PowerStatus::On),
            )
    }

    #[tokio::test]
    async fn test_power_on_resolves_then_issues_single_call() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        translator.power_on("tv").await.unwrap();
        assert_eq!(bus.calls().await, vec![BusCall::PowerOn(LogicalAddress::TV)]);
    }

    #[tokio::test]
    async fn test_power_on_unknown_device_transmits_nothing() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        let err = translator.power_on("vcr").await.unwrap_err();
        assert!(matches!(err, GatewayError::UnknownDevice(_)));
        assert!(bus.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_power_on_is_idempotent_against_running_device() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        translator.power_on("kodi").await.unwrap();
        translator.power_on("kodi").await.unwrap();
        assert_eq!(
            bus.power_status(LogicalAddress::PLAYBACK_1).await.unwrap(),
            PowerStatus::On
        );
    }

    #[tokio::test]
    async fn test_volume_commands_are_unaddressed() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        translator.volume(VolumeCommand::Up).await.unwrap();
        translator.volume(VolumeCommand::Down).await.unwrap();
        translator.volume(VolumeCommand::Mute).await.unwrap();
        assert_eq!(
            bus.calls().await,
            vec![BusCall::VolumeUp, BusCall::VolumeDown, BusCall::Mute]
        );
    }

    #[tokio::test]
    async fn test_send_key_by_name_and_hex() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        translator.send_key("tv", "volup").await.unwrap();
        translator.send_key("tv", "0x44").await.unwrap();
        assert_eq!(
            bus.calls().await,
            vec![
                BusCall::Key(LogicalAddress::TV, 0x41),
                BusCall::Key(LogicalAddress::TV, 0x44),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_key_rejects_unknown_identifier_before_bus() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        let err = translator.send_key("tv", "frobnicate").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidKey(_)));
        assert!(bus.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_channel_digits_sent_in_order() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        let echoed = translator.change_channel("tv", "123").await.unwrap();
        assert_eq!(echoed, "123");
        assert_eq!(
            bus.calls().await,
            vec![
                BusCall::Key(LogicalAddress::TV, 0x21),
                BusCall::Key(LogicalAddress::TV, 0x22),
                BusCall::Key(LogicalAddress::TV, 0x23),
            ]
        );
    }

    #[tokio::test]
    async fn test_channel_rejects_non_digit_before_any_key() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        let err = translator.change_channel("tv", "1a3").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidChannel { offending: 'a', .. }
        ));
        assert!(bus.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_channel_aborts_on_mid_sequence_failure() {
        let bus = Arc::new(topology().fail_after(1));
        let translator = CommandTranslator::new(bus.clone());

        let err = translator.change_channel("tv", "123").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::SequenceAborted {
                failed_step: 2,
                total_steps: 3,
                ..
            }
        ));
        // The first digit went out and stays out; the third was never sent.
        assert_eq!(
            bus.calls().await,
            vec![BusCall::Key(LogicalAddress::TV, 0x21)]
        );
    }

    #[tokio::test]
    async fn test_transmit_forwards_each_frame_in_order() {
        let bus = Arc::new(topology());
        let translator = CommandTranslator::new(bus.clone());

        let frames = vec!["10:04".to_string(), "10:36".to_string()];
        translator.transmit(&frames).await.unwrap();
        assert_eq!(
            bus.calls().await,
            vec![
                BusCall::Transmit("10:04".to_string()),
                BusCall::Transmit("10:36".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_transmit_aborts_on_first_failure() {
        let bus = Arc::new(topology().fail_after(1));
        let translator = CommandTranslator::new(bus.clone());

        let frames = vec![
            "10:04".to_string(),
            "10:36".to_string(),
            "10:8c".to_string(),
        ];
        let err = translator.transmit(&frames).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::SequenceAborted {
                failed_step: 2,
                total_steps: 3,
                ..
            }
        ));
        assert_eq!(bus.calls().await, vec![BusCall::Transmit("10:04".to_string())]);
    }
}
