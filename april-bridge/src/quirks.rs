//! Hardware quirk table.
//!
//! ## Usage
//!
//! Build a [`QuirkCache`] from the device's [`HardwareIdentity`] once and
//! share it; collaborators read flags from the resolved [`QuirkProfile`]
//! instead of comparing board or model names themselves.

use std::sync::OnceLock;

use tracing::debug;

/// Identifiers the OS reports for the running hardware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardwareIdentity {
    /// Device manufacturer, e.g. `HTC`.
    pub manufacturer: String,
    /// Marketing model name, e.g. `HTC One X`.
    pub model: String,
    /// Board name, e.g. `mecha`.
    pub board: String,
    /// OS API level.
    pub sdk_version: u32,
}

impl HardwareIdentity {
    /// Normalized `board:<board>` key.
    pub fn board_key(&self) -> String {
        format!("board:{}", normalize(&self.board))
    }

    /// Normalized `device:<manufacturer>/<model>` key.
    pub fn device_key(&self) -> String {
        format!(
            "device:{}/{}",
            normalize(&self.manufacturer),
            normalize(&self.model)
        )
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Workarounds that apply to the running device. Immutable once resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuirkProfile {
    /// The input method needs one hide/show cycle after becoming visible.
    pub hack_keyboard_toggle: bool,
    /// The OS reports a wrong DPI; use this one instead.
    pub dpi_override: Option<f32>,
    /// Pixels to add to the usable surface height.
    pub height_correction_px: Option<i32>,
}

/// API level constraint of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SdkRange {
    Any,
    Below(u32),
    AtLeast(u32),
}

impl SdkRange {
    fn contains(self, sdk_version: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Below(limit) => sdk_version < limit,
            Self::AtLeast(limit) => sdk_version >= limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum QuirkEffect {
    KeyboardToggle,
    DpiOverride(f32),
    HeightCorrection(i32),
}

#[derive(Debug, Clone, Copy)]
struct QuirkEntry {
    key: &'static str,
    sdk: SdkRange,
    effect: QuirkEffect,
}

const BUILTIN_ENTRIES: &[QuirkEntry] = &[
    // Thunderbolt, Wildfire S
    keyboard("board:mecha", SdkRange::Any),
    keyboard("board:marvel", SdkRange::Any),
    keyboard("board:marvelc", SdkRange::Any),
    // EVO 3D on early firmware, EVO 4G
    keyboard("board:shooteru", SdkRange::Below(10)),
    keyboard("board:supersonic", SdkRange::Any),
    // Droid Incredible
    keyboard("board:inc", SdkRange::AtLeast(10)),
    QuirkEntry {
        key: "device:htc/htc one x",
        sdk: SdkRange::Any,
        effect: QuirkEffect::DpiOverride(312.0),
    },
    // The system menu bar covers the bottom 20 pixels.
    QuirkEntry {
        key: "device:amazon/kindle fire",
        sdk: SdkRange::Any,
        effect: QuirkEffect::HeightCorrection(-20),
    },
];

const fn keyboard(key: &'static str, sdk: SdkRange) -> QuirkEntry {
    QuirkEntry {
        key,
        sdk,
        effect: QuirkEffect::KeyboardToggle,
    }
}

/// Static lookup from normalized hardware keys to workaround flags.
#[derive(Debug, Clone, Copy)]
pub struct DeviceQuirkTable {
    entries: &'static [QuirkEntry],
}

impl DeviceQuirkTable {
    /// The table of known defective devices.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES,
        }
    }

    /// Collects every entry that matches `identity` into one profile.
    pub fn resolve(&self, identity: &HardwareIdentity) -> QuirkProfile {
        let keys = [identity.board_key(), identity.device_key()];
        let mut profile = QuirkProfile::default();
        for entry in self.entries.iter().filter(|entry| {
            keys.iter().any(|key| key == entry.key) && entry.sdk.contains(identity.sdk_version)
        }) {
            match entry.effect {
                QuirkEffect::KeyboardToggle => profile.hack_keyboard_toggle = true,
                QuirkEffect::DpiOverride(dpi) => profile.dpi_override = Some(dpi),
                QuirkEffect::HeightCorrection(px) => profile.height_correction_px = Some(px),
            }
        }
        profile
    }
}

impl Default for DeviceQuirkTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lazily resolved [`QuirkProfile`] for one device.
#[derive(Debug)]
pub struct QuirkCache {
    identity: HardwareIdentity,
    table: DeviceQuirkTable,
    profile: OnceLock<QuirkProfile>,
}

impl QuirkCache {
    /// Uses the builtin table.
    pub fn new(identity: HardwareIdentity) -> Self {
        Self::with_table(identity, DeviceQuirkTable::builtin())
    }

    /// Uses a specific table.
    pub fn with_table(identity: HardwareIdentity, table: DeviceQuirkTable) -> Self {
        Self {
            identity,
            table,
            profile: OnceLock::new(),
        }
    }

    /// The identity the profile is resolved for.
    pub fn identity(&self) -> &HardwareIdentity {
        &self.identity
    }

    /// Resolves on first use, then returns the cached profile.
    pub fn profile(&self) -> &QuirkProfile {
        self.profile.get_or_init(|| {
            let profile = self.table.resolve(&self.identity);
            debug!(
                board = %self.identity.board,
                model = %self.identity.model,
                ?profile,
                "resolved device quirks"
            );
            profile
        })
    }
}
