//! Localized message catalog.

use campanel_core::ErrorKind;

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English.
    #[default]
    English,
    /// Japanese.
    Japanese,
}

impl Locale {
    /// Parses a language tag such as `en`, `ja` or `ja-JP`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::English),
            "ja" => Some(Self::Japanese),
            _ => None,
        }
    }

    /// Returns the primary language tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
        }
    }
}

/// Why the capture control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisableReason {
    /// No preview has been started since the panel loaded.
    NotStarted,
    /// The user or a coordinator stopped the preview.
    PreviewStopped,
    /// The stream reported an error.
    StreamFailed,
    /// No frame arrived before the watchdog fired.
    StreamTimeout,
    /// The stream is connecting.
    Connecting,
    /// A capture is in flight.
    Capturing,
}

/// Every user-facing text of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Info toast while a capture runs.
    Capturing,
    /// Capture stored a file.
    CaptureSaved {
        /// Stored file name.
        filename: String,
    },
    /// Device refused the capture.
    CaptureRejected {
        /// Device message, shown verbatim.
        message: String,
    },
    /// Capture request failed in transport.
    CaptureFailed {
        /// Failure class.
        kind: ErrorKind,
    },
    /// File listing request failed.
    FileListFailed,
    /// A file was deleted.
    FileDeleted {
        /// Deleted file name.
        filename: String,
    },
    /// Device refused the delete.
    DeleteRejected {
        /// Device message, shown verbatim.
        message: String,
    },
    /// Delete request failed in transport.
    DeleteFailed {
        /// Transport error text.
        detail: String,
    },
    /// Hardware snapshot loaded.
    HardwareLoaded,
    /// Hardware snapshot failed; toast text with summary and hint.
    HardwareFailed {
        /// Failure class.
        kind: ErrorKind,
    },
    /// Modal body while the snapshot loads.
    HardwareLoading,
    /// Modal heading for a failed snapshot.
    HardwareUnavailable,
    /// One-line failure summary inside the modal.
    HardwareErrorSummary {
        /// Failure class.
        kind: ErrorKind,
    },
    /// Troubleshooting hint inside the modal; empty when there is none.
    HardwareErrorHint {
        /// Failure class.
        kind: ErrorKind,
    },
    /// Info toast when a reboot starts.
    Rebooting,
    /// Persistent error toast when the device never came back.
    RebootUnreachable,
    /// Reboot confirmation prompt.
    ConfirmReboot,
    /// Delete confirmation prompt.
    ConfirmDelete {
        /// File to delete.
        filename: String,
    },
    /// Idle preview placeholder.
    SelectFilePlaceholder,
    /// Preview placeholder while connecting.
    ConnectingPlaceholder,
    /// Preview placeholder after a stream error.
    StreamFailedPlaceholder,
    /// Preview placeholder after a watchdog timeout.
    StreamTimeoutPlaceholder,
    /// Preview placeholder while a stored photo loads.
    PhotoLoadingPlaceholder,
    /// Preview placeholder after a stored photo failed to load.
    PhotoFailedPlaceholder {
        /// File that failed.
        name: String,
    },
    /// Preview toggle label while stopped.
    StartPreviewLabel,
    /// Preview toggle label while live.
    StopPreviewLabel,
    /// Capture control label.
    CaptureLabel,
    /// Capture control label while a capture runs.
    CapturingLabel,
    /// Capture control hint while disabled.
    CaptureDisabled {
        /// Disable reason.
        reason: DisableReason,
    },
    /// Empty file list heading.
    NoPhotos,
    /// Empty file list hint.
    NoPhotosHint,
}

impl Message {
    /// Renders the message in `locale`.
    pub fn text(&self, locale: Locale) -> String {
        let ja = locale == Locale::Japanese;
        match self {
            Self::Capturing => pick(ja, "Capturing photo...", "写真を撮影中...").to_string(),
            Self::CaptureSaved { filename } => {
                if ja {
                    format!("画像キャプチャ成功！\nファイル名: {filename}")
                } else {
                    format!("Photo captured!\nFile: {filename}")
                }
            }
            Self::CaptureRejected { message } => {
                format!("{}\n{message}", pick(ja, "Capture failed", "キャプチャに失敗しました"))
            }
            Self::CaptureFailed { kind } => {
                let reason = capture_failure_reason(*kind, ja);
                if ja {
                    format!("キャプチャに失敗しました\nエラー: {reason}")
                } else {
                    format!("Capture failed\nError: {reason}")
                }
            }
            Self::FileListFailed => pick(
                ja,
                "Failed to load the file list",
                "ファイル一覧の取得に失敗しました",
            )
            .to_string(),
            Self::FileDeleted { filename } => {
                format!("{}\n{filename}", pick(ja, "File deleted", "ファイルを削除しました"))
            }
            Self::DeleteRejected { message } => {
                format!("{}\n{message}", pick(ja, "Delete failed", "ファイル削除に失敗しました"))
            }
            Self::DeleteFailed { detail } => {
                if ja {
                    format!("ファイル削除に失敗しました\nネットワークエラー: {detail}")
                } else {
                    format!("Delete failed\nNetwork error: {detail}")
                }
            }
            Self::HardwareLoaded => {
                pick(ja, "Hardware info updated", "ハードウェア情報を更新しました").to_string()
            }
            Self::HardwareFailed { kind } => {
                let mut text = format!(
                    "{}\n{}",
                    pick(
                        ja,
                        "Failed to load hardware info",
                        "ハードウェア情報の取得に失敗しました"
                    ),
                    hardware_summary(*kind, ja)
                );
                if let Some(hint) = hardware_hint(*kind, ja) {
                    text.push('\n');
                    text.push_str(hint);
                }
                text
            }
            Self::HardwareLoading => pick(ja, "Loading info...", "情報を読み込み中...").to_string(),
            Self::HardwareUnavailable => {
                pick(ja, "Failed to load info", "情報の取得に失敗しました").to_string()
            }
            Self::HardwareErrorSummary { kind } => hardware_summary(*kind, ja),
            Self::HardwareErrorHint { kind } => {
                hardware_hint(*kind, ja).unwrap_or_default().to_string()
            }
            Self::Rebooting => pick(
                ja,
                "Rebooting ESP32-CAM...\nThe panel reloads as soon as it reconnects.",
                "ESP32-CAM を再起動します…\n再接続でき次第、このページを更新します。",
            )
            .to_string(),
            Self::RebootUnreachable => pick(
                ja,
                "Reconnection failed.\nPlease reload the panel manually.",
                "再接続に失敗しました。\n手動でページを再読み込みしてください。",
            )
            .to_string(),
            Self::ConfirmReboot => pick(
                ja,
                "Reboot the ESP32-CAM. Continue?",
                "ESP32-CAM を再起動します。よろしいですか？",
            )
            .to_string(),
            Self::ConfirmDelete { filename } => {
                if ja {
                    format!("{filename} を削除しますか？")
                } else {
                    format!("Delete {filename}?")
                }
            }
            Self::SelectFilePlaceholder => {
                pick(ja, "Select a file to preview", "プレビューするファイルを選択してください")
                    .to_string()
            }
            Self::ConnectingPlaceholder => {
                pick(ja, "Connecting to stream...", "ストリームに接続中...").to_string()
            }
            Self::StreamFailedPlaceholder => pick(
                ja,
                "Stream connection failed\nPlease check ESP32-CAM status",
                "ストリーム接続に失敗しました\nESP32-CAM の状態を確認してください",
            )
            .to_string(),
            Self::StreamTimeoutPlaceholder => pick(
                ja,
                "Stream timeout\nESP32-CAM may be busy or offline",
                "ストリームがタイムアウトしました\nESP32-CAM が応答していない可能性があります",
            )
            .to_string(),
            Self::PhotoLoadingPlaceholder => {
                pick(ja, "Loading image...", "画像を読み込み中...").to_string()
            }
            Self::PhotoFailedPlaceholder { name } => {
                if ja {
                    format!("画像の読み込みに失敗しました\n{name}\n(show {name} で再試行)")
                } else {
                    format!("Failed to load image\n{name}\n(retry with: show {name})")
                }
            }
            Self::StartPreviewLabel => pick(ja, "Start Preview", "プレビュー開始").to_string(),
            Self::StopPreviewLabel => pick(ja, "Stop Preview", "プレビュー停止").to_string(),
            Self::CaptureLabel => pick(ja, "Capture", "撮影").to_string(),
            Self::CapturingLabel => pick(ja, "Capturing...", "撮影中...").to_string(),
            Self::CaptureDisabled { reason } => {
                format!("{}: {}", pick(ja, "Unavailable", "使用不可"), reason_text(*reason, ja))
            }
            Self::NoPhotos => pick(ja, "No Photos", "写真がありません").to_string(),
            Self::NoPhotosHint => pick(
                ja,
                "Capture your first photo to get started!",
                "最初の写真を撮影してみましょう！",
            )
            .to_string(),
        }
    }
}

fn pick(ja: bool, en: &'static str, ja_text: &'static str) -> &'static str {
    if ja { ja_text } else { en }
}

fn capture_failure_reason(kind: ErrorKind, ja: bool) -> String {
    match kind {
        ErrorKind::Timeout => pick(ja, "Timed out (15 s)", "タイムアウト（15秒経過）").to_string(),
        ErrorKind::Unreachable => pick(
            ja,
            "Network error (cannot reach the camera)",
            "ネットワークエラー（ESP32に接続できません）",
        )
        .to_string(),
        ErrorKind::Http { status } => format!("HTTP {status}"),
        ErrorKind::Malformed => pick(ja, "Invalid response", "レスポンス形式エラー").to_string(),
        ErrorKind::Other => pick(ja, "Unknown error", "不明なエラー").to_string(),
    }
}

fn hardware_summary(kind: ErrorKind, ja: bool) -> String {
    match kind {
        ErrorKind::Timeout => pick(
            ja,
            "Request timed out (20 s)",
            "リクエストがタイムアウトしました（20秒）",
        )
        .to_string(),
        ErrorKind::Unreachable => {
            pick(ja, "Network connection error", "ネットワーク接続エラー").to_string()
        }
        ErrorKind::Malformed => pick(ja, "Response format error", "レスポンス形式エラー").to_string(),
        ErrorKind::Http { status } => format!("HTTP {status}"),
        ErrorKind::Other => pick(ja, "Unknown error", "不明なエラー").to_string(),
    }
}

fn hardware_hint(kind: ErrorKind, ja: bool) -> Option<&'static str> {
    match kind {
        ErrorKind::Timeout => Some(pick(
            ja,
            "The ESP32 may not be responding. Check the serial monitor.",
            "ESP32が応答していない可能性があります。シリアルモニタを確認してください。",
        )),
        ErrorKind::Unreachable => Some(pick(
            ja,
            "Could not connect to the ESP32-CAM. Check its IP address.",
            "ESP32-CAMへの接続に失敗しました。IPアドレスを確認してください。",
        )),
        ErrorKind::Malformed => Some(pick(
            ja,
            "The ESP32 sent an invalid reply. Check the firmware.",
            "ESP32からの応答が正しくありません。ファームウェアを確認してください。",
        )),
        ErrorKind::Http { .. } | ErrorKind::Other => None,
    }
}

fn reason_text(reason: DisableReason, ja: bool) -> &'static str {
    match reason {
        DisableReason::NotStarted => pick(
            ja,
            "start live preview first",
            "ライブプレビューを開始してください",
        ),
        DisableReason::PreviewStopped => pick(ja, "preview stopped", "プレビュー停止中"),
        DisableReason::StreamFailed => pick(ja, "stream connection failed", "ストリーム接続失敗"),
        DisableReason::StreamTimeout => pick(ja, "stream timeout", "ストリームタイムアウト"),
        DisableReason::Connecting => pick(ja, "connecting", "接続中"),
        DisableReason::Capturing => pick(ja, "capturing", "撮影中"),
    }
}
