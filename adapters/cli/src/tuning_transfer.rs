use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use dune_defence_core::{DifficultyParams, RangePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "dune";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "dune:v1";
/// Delimiter used to separate the prefix, arena dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the session tuning suitable for clipboard transfer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TuningSnapshot {
    /// Horizontal arena extent in arena units.
    pub width: u32,
    /// Vertical arena extent in arena units.
    pub height: u32,
    /// Difficulty parameters in force when the snapshot was taken.
    pub params: DifficultyParams,
    /// Cap on the active tower count.
    pub max_towers: u32,
    /// Range policy applied during attack passes.
    pub range_policy: RangePolicy,
}

impl TuningSnapshot {
    /// Encodes the snapshot into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            params: self.params,
            max_towers: self.max_towers,
            range_policy: self.range_policy,
        };
        let json = serde_json::to_vec(&payload).expect("tuning snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.width, self.height)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, TuningTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TuningTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(TuningTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(TuningTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(TuningTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(TuningTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(TuningTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(TuningTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: SerializableSnapshot = serde_json::from_slice(&bytes)?;

        Ok(Self {
            width,
            height,
            params: decoded.params,
            max_towers: decoded.max_towers,
            range_policy: decoded.range_policy,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    params: DifficultyParams,
    max_towers: u32,
    range_policy: RangePolicy,
}

/// Errors that can occur while decoding tuning transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TuningTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("tuning payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("tuning string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("tuning string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include arena dimensions.
    #[error("tuning string is missing the arena dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("tuning string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("tuning prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("tuning version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The arena dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse arena dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode tuning payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse tuning payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), TuningTransferError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| TuningTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| TuningTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| TuningTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if width == 0 || height == 0 {
        return Err(TuningTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn round_trip_default_tuning() {
        let snapshot = TuningSnapshot {
            width: 800,
            height: 600,
            params: DifficultyParams::default(),
            max_towers: 5,
            range_policy: RangePolicy::Live,
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:800x600:")));

        let decoded = TuningSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_tuned_session() {
        let snapshot = TuningSnapshot {
            width: 1024,
            height: 768,
            params: DifficultyParams {
                enemy_speed_min: 2,
                enemy_speed_max: 7,
                enemies_per_wave: 9,
                enemy_health: 14,
                tower_health: 130,
                spawn_interval: Duration::from_millis(750),
                wave_interval: Duration::from_millis(8000),
            },
            max_towers: 8,
            range_policy: RangePolicy::TickStart,
        };

        let encoded = snapshot.encode();
        let decoded = TuningSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn decode_rejects_foreign_prefixes() {
        let error = TuningSnapshot::decode("oasis:v1:2x2:e30").expect_err("prefix must fail");
        assert!(matches!(error, TuningTransferError::InvalidPrefix(_)));
    }

    #[test]
    fn decode_rejects_zero_dimensions() {
        let error = TuningSnapshot::decode("dune:v1:0x600:e30").expect_err("dimensions must fail");
        assert!(matches!(error, TuningTransferError::InvalidDimensions(_)));
    }

    #[test]
    fn decode_rejects_empty_input() {
        let error = TuningSnapshot::decode("   ").expect_err("empty input must fail");
        assert!(matches!(error, TuningTransferError::EmptyPayload));
    }
}
