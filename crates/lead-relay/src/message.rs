use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Tehran is UTC+03:30 all year.
const TEHRAN_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

/// Request body of `POST /api/submit-lead`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub source: Option<String>,
    /// RFC 3339 string or epoch milliseconds, as sent by the browser.
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LeadSubmission {
    /// The trimmed source, if one was given.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Where the visitor heard about us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadSource {
    Instagram,
    Telegram,
    YouTube,
    Friend,
    Google,
    Other(String),
}

impl LeadSource {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "instagram" => LeadSource::Instagram,
            "telegram" => LeadSource::Telegram,
            "youtube" => LeadSource::YouTube,
            "friend" => LeadSource::Friend,
            "google" => LeadSource::Google,
            other => LeadSource::Other(other.to_string()),
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            LeadSource::Instagram => "📸",
            LeadSource::Telegram => "✈️",
            LeadSource::YouTube => "▶️",
            LeadSource::Friend => "👥",
            LeadSource::Google => "🔍",
            LeadSource::Other(_) => "📌",
        }
    }

    pub fn label(&self) -> String {
        match self {
            LeadSource::Instagram => "Instagram".to_string(),
            LeadSource::Telegram => "Telegram".to_string(),
            LeadSource::YouTube => "YouTube".to_string(),
            LeadSource::Friend => "Referred by a friend".to_string(),
            LeadSource::Google => "Google search".to_string(),
            LeadSource::Other(text) => escape_markdown(text),
        }
    }
}

/// Coarse device class derived from a user agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    AndroidMobile,
    IosMobile,
    Mobile,
    Tablet,
    WindowsDesktop,
    MacDesktop,
    LinuxDesktop,
    Desktop,
    Unknown,
}

impl DeviceClass {
    /// Mobile is checked first, then tablet, then desktop OS.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let ua = match user_agent.map(str::trim) {
            Some(ua) if !ua.is_empty() => ua.to_lowercase(),
            _ => return DeviceClass::Unknown,
        };
        let has = |needle: &str| ua.contains(needle);

        if has("mobile") {
            if has("android") {
                DeviceClass::AndroidMobile
            } else if has("iphone") || has("ipad") || has("ipod") {
                DeviceClass::IosMobile
            } else {
                DeviceClass::Mobile
            }
        } else if has("tablet") || has("ipad") {
            DeviceClass::Tablet
        } else if has("windows") {
            DeviceClass::WindowsDesktop
        } else if has("mac") {
            DeviceClass::MacDesktop
        } else if has("linux") {
            DeviceClass::LinuxDesktop
        } else {
            DeviceClass::Desktop
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceClass::AndroidMobile => "Android mobile",
            DeviceClass::IosMobile => "iOS mobile",
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Tablet => "Tablet",
            DeviceClass::WindowsDesktop => "Windows desktop",
            DeviceClass::MacDesktop => "Mac desktop",
            DeviceClass::LinuxDesktop => "Linux desktop",
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Parse the submitted timestamp. Strings must be RFC 3339, numbers are
/// epoch milliseconds.
pub fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Render a timestamp in Tehran local time, e.g. `2024-06-10 18:00`.
pub fn format_tehran(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(TEHRAN_OFFSET_SECS) {
        Some(tz) => at.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string(),
        None => at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Telegram message (legacy Markdown) announcing a lead.
pub fn compose(submission: &LeadSubmission, source: &str) -> String {
    let source = LeadSource::parse(source);
    let when = parse_timestamp(submission.timestamp.as_ref())
        .map(format_tehran)
        .unwrap_or_else(|| "unknown".to_string());
    let device = DeviceClass::from_user_agent(submission.user_agent.as_deref());

    format!(
        "🎯 *New lead - ARQ Coaching*\n\n\
         {} *Source:* {}\n\
         ⏰ *Time:* {when} (Tehran)\n\
         📱 *Device:* {device}\n\n\
         ---\n\
         ✅ Entered into the prize draw",
        source.marker(),
        source.label(),
    )
}

/// Escape the characters legacy Telegram Markdown treats as markup.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

