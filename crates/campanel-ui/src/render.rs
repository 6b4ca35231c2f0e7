//! Declarative renderers for device replies.

use campanel_core::{FileListing, HardwareSnapshot, StorageSummary};
use serde_json::Value;

use crate::{InfoRow, Locale, Message};

/// Shown in place of storage values when the summary could not be loaded.
pub const STORAGE_ERROR_TEXT: &str = "Error";

const MISSING: &str = "-";
const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Renders the hardware snapshot as labelled rows in display order.
pub fn hardware_rows(snapshot: &HardwareSnapshot, locale: Locale) -> Vec<InfoRow> {
    let ja = locale == Locale::Japanese;
    let rows = [
        (("Chip model", "チップモデル"), scalar(&snapshot.chip_model)),
        (
            ("Chip revision", "チップリビジョン"),
            decorated(&snapshot.chip_revision, "v", ""),
        ),
        (
            ("CPU cores", "CPUコア数"),
            decorated(&snapshot.cpu_cores, "", " cores"),
        ),
        (
            ("CPU frequency", "CPU周波数"),
            decorated(&snapshot.cpu_freq_mhz, "", "MHz"),
        ),
        (
            ("Flash size", "フラッシュサイズ"),
            decorated(&snapshot.flash_size_mb, "", "MB"),
        ),
        (
            ("PSRAM size", "PSRAMサイズ"),
            decorated(&snapshot.psram_size_kb, "", "KB"),
        ),
        (
            ("MAC address", "MACアドレス"),
            scalar(&snapshot.mac_address).to_uppercase(),
        ),
        (("Board type", "ボードタイプ"), scalar(&snapshot.board_type)),
        (("Camera sensor", "カメラセンサー"), scalar(&snapshot.camera_sensor)),
        (("Frame size", "画像サイズ"), scalar(&snapshot.frame_size)),
        (("JPEG quality", "JPEG品質"), scalar(&snapshot.jpeg_quality)),
    ];

    rows.into_iter()
        .map(|((en, ja_label), value)| InfoRow {
            label: (if ja { ja_label } else { en }).to_string(),
            value,
        })
        .collect()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 => format!("{float:.0}"),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

fn decorated(value: &Value, prefix: &str, suffix: &str) -> String {
    if value.is_null() {
        return MISSING.to_string();
    }
    format!("{prefix}{}{suffix}", scalar(value))
}

/// Formats a byte count with binary units up to GB and at most one decimal.
///
/// A trailing `.0` is dropped: `1024` renders as `1 KB`, `1536` as `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1_u64;
    while unit + 1 < BYTE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = ((bytes as f64 / scale as f64) * 10.0).round() / 10.0;
    if value.fract() == 0.0 {
        format!("{value:.0} {}", BYTE_UNITS[unit])
    } else {
        format!("{value:.1} {}", BYTE_UNITS[unit])
    }
}

/// Formats a file size for the file list: whole KB below 100 KB, else MB.
pub fn format_file_size(size: u64) -> String {
    let kb = size / 1024;
    if kb < 100 {
        return format!("{kb}KB");
    }
    format!("{:.1}MB", size as f64 / 1024.0 / 1024.0)
}

/// Card usage band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    /// Below 70 percent.
    Normal,
    /// Below 90 percent.
    Warning,
    /// 90 percent or more.
    Critical,
}

impl UsageLevel {
    /// Classifies a usage percentage.
    pub fn from_percent(percent: f64) -> Self {
        if percent < 70.0 {
            Self::Normal
        } else if percent < 90.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Rendered storage summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageView {
    /// Card capacity text.
    pub total: String,
    /// Used space text.
    pub used: String,
    /// File count text.
    pub file_count: String,
    /// Usage bar fill; `None` after a failed load.
    pub usage_percent: Option<f64>,
    /// Usage bar colour band; `None` after a failed load.
    pub level: Option<UsageLevel>,
}

impl StorageView {
    /// View shown when the summary request failed.
    pub fn failed() -> Self {
        Self {
            total: STORAGE_ERROR_TEXT.to_string(),
            used: STORAGE_ERROR_TEXT.to_string(),
            file_count: STORAGE_ERROR_TEXT.to_string(),
            usage_percent: None,
            level: None,
        }
    }
}

/// Renders the storage summary.
pub fn storage_view(summary: &StorageSummary) -> StorageView {
    StorageView {
        total: format_bytes(summary.total_bytes),
        used: format_bytes(summary.used_bytes),
        file_count: format!("{} files", summary.file_count),
        usage_percent: Some(summary.usage_percent),
        level: Some(UsageLevel::from_percent(summary.usage_percent)),
    }
}

/// One file list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// File name; also the preview and delete argument.
    pub name: String,
    /// Size text.
    pub size_text: String,
}

/// Rendered file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileListView {
    /// No files stored.
    Empty {
        /// Heading.
        title: String,
        /// Call to action.
        hint: String,
    },
    /// Files in device order.
    Rows(Vec<FileRow>),
}

/// Renders the file listing.
pub fn file_list_view(listing: &FileListing, locale: Locale) -> FileListView {
    if listing.files.is_empty() {
        return FileListView::Empty {
            title: Message::NoPhotos.text(locale),
            hint: Message::NoPhotosHint.text(locale),
        };
    }

    FileListView::Rows(
        listing
            .files
            .iter()
            .map(|file| FileRow {
                name: file.name.clone(),
                size_text: format_file_size(file.size),
            })
            .collect(),
    )
}

/// File list panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileListState {
    /// Not fetched yet.
    #[default]
    NotLoaded,
    /// Latest successful fetch.
    Loaded(FileListView),
    /// Latest fetch failed.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use campanel_core::FileEntry;

    #[test]
    fn byte_formatting_drops_trailing_zero_decimal() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(15_931_539_456), "14.8 GB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn file_sizes_switch_to_megabytes_at_one_hundred_kilobytes() {
        assert_eq!(format_file_size(0), "0KB");
        assert_eq!(format_file_size(99 * 1024 + 1023), "99KB");
        assert_eq!(format_file_size(100 * 1024), "0.1MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 / 2), "1.5MB");
    }

    #[test]
    fn usage_levels_follow_seventy_and_ninety_percent() {
        assert_eq!(UsageLevel::from_percent(69.9), UsageLevel::Normal);
        assert_eq!(UsageLevel::from_percent(70.0), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(89.9), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(90.0), UsageLevel::Critical);
    }

    #[test]
    fn storage_view_renders_counts_and_failure() {
        let view = storage_view(&StorageSummary {
            total_bytes: 2048,
            used_bytes: 0,
            file_count: 3,
            usage_percent: 0.0,
        });
        assert_eq!(view.total, "2 KB");
        assert_eq!(view.used, "0 B");
        assert_eq!(view.file_count, "3 files");
        assert_eq!(view.level, Some(UsageLevel::Normal));

        let failed = StorageView::failed();
        assert_eq!(failed.total, "Error");
        assert_eq!(failed.level, None);
    }

    #[test]
    fn hardware_rows_decorate_values_and_mark_missing_fields() {
        let snapshot = HardwareSnapshot {
            chip_model: Value::from("ESP32"),
            chip_revision: Value::from(3),
            cpu_cores: Value::from(2),
            cpu_freq_mhz: Value::from(240),
            flash_size_mb: Value::from(4.0),
            mac_address: Value::from("a4:cf:12:00:be:ef"),
            ..HardwareSnapshot::default()
        };
        let rows = hardware_rows(&snapshot, Locale::English);
        let values: Vec<&str> = rows.iter().map(|row| row.value.as_str()).collect();

        assert_eq!(
            values,
            vec![
                "ESP32",
                "v3",
                "2 cores",
                "240MHz",
                "4MB",
                "-",
                "A4:CF:12:00:BE:EF",
                "-",
                "-",
                "-",
                "-"
            ]
        );
        assert_eq!(hardware_rows(&snapshot, Locale::Japanese)[0].label, "チップモデル");
    }

    #[test]
    fn empty_listing_renders_empty_state() {
        let view = file_list_view(&FileListing::default(), Locale::English);
        assert!(matches!(view, FileListView::Empty { ref title, .. } if title == "No Photos"));

        let listing = FileListing {
            files: vec![FileEntry {
                name: "photo_001.jpg".to_string(),
                size: 52_000,
            }],
        };
        assert_eq!(
            file_list_view(&listing, Locale::English),
            FileListView::Rows(vec![FileRow {
                name: "photo_001.jpg".to_string(),
                size_text: "50KB".to_string(),
            }])
        );
    }
}
