// ═══════════════════════════════════════════════════════════════════
// Message Tests: source labels, device classes, Tehran time, config
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use serde_json::{json, Value};

use lead_relay::config::{RelayConfig, ADDR_VAR, CHAT_ID_VAR, DEFAULT_ADDR, TOKEN_VAR};
use lead_relay::message::{compose, format_tehran, parse_timestamp, DeviceClass, LeadSource, LeadSubmission};

// ═══════════════════════════════════════════════════════════════════
// Sources
// ═══════════════════════════════════════════════════════════════════

mod sources {
    use super::*;

    #[test]
    fn known_sources_have_label_and_marker() {
        assert_eq!(LeadSource::parse("instagram"), LeadSource::Instagram);
        assert_eq!(LeadSource::parse("instagram").label(), "Instagram");
        assert_eq!(LeadSource::parse("telegram").marker(), "✈️");
        assert_eq!(LeadSource::parse("google").label(), "Google search");
        assert_eq!(LeadSource::parse("friend").marker(), "👥");
    }

    #[test]
    fn unknown_source_passes_through() {
        let source = LeadSource::parse("podcast");
        assert_eq!(source, LeadSource::Other("podcast".into()));
        assert_eq!(source.marker(), "📌");
        assert_eq!(source.label(), "podcast");
    }

    #[test]
    fn free_text_markup_is_escaped() {
        assert_eq!(LeadSource::parse("tiktok_ads").label(), "tiktok\\_ads");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Devices
// ═══════════════════════════════════════════════════════════════════

mod devices {
    use super::*;

    fn classify(ua: &str) -> DeviceClass {
        DeviceClass::from_user_agent(Some(ua))
    }

    #[test]
    fn mobile_variants() {
        assert_eq!(classify("Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari"), DeviceClass::AndroidMobile);
        assert_eq!(classify("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile/15E148"), DeviceClass::IosMobile);
        assert_eq!(classify("SomeBrowser Mobile"), DeviceClass::Mobile);
    }

    #[test]
    fn tablet_without_mobile_token() {
        assert_eq!(classify("Mozilla/5.0 (iPad; CPU OS 17_0)"), DeviceClass::Tablet);
    }

    #[test]
    fn desktop_variants() {
        assert_eq!(classify("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"), DeviceClass::WindowsDesktop);
        assert_eq!(classify("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)"), DeviceClass::MacDesktop);
        assert_eq!(classify("Mozilla/5.0 (X11; Linux x86_64)"), DeviceClass::LinuxDesktop);
        assert_eq!(classify("curl/8.0"), DeviceClass::Desktop);
    }

    #[test]
    fn missing_user_agent_is_unknown() {
        assert_eq!(DeviceClass::from_user_agent(None), DeviceClass::Unknown);
        assert_eq!(DeviceClass::from_user_agent(Some("")), DeviceClass::Unknown);
        assert_eq!(DeviceClass::Unknown.to_string(), "Unknown");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Timestamps & Composition
// ═══════════════════════════════════════════════════════════════════

mod timestamps {
    use super::*;

    #[test]
    fn rfc3339_string_in_tehran_time() {
        let at = parse_timestamp(Some(&json!("2024-06-10T14:30:00Z"))).unwrap();
        assert_eq!(format_tehran(at), "2024-06-10 18:00");
    }

    #[test]
    fn epoch_millis_accepted() {
        // 2024-01-01T00:00:00Z
        let at = parse_timestamp(Some(&json!(1_704_067_200_000_i64))).unwrap();
        assert_eq!(format_tehran(at), "2024-01-01 03:30");
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp(Some(&json!("yesterday"))).is_none());
        assert!(parse_timestamp(Some(&Value::Bool(true))).is_none());
        assert!(parse_timestamp(None).is_none());
    }

    #[test]
    fn compose_includes_every_line() {
        let submission = LeadSubmission {
            source: Some("youtube".into()),
            timestamp: Some(json!("2024-06-10T14:30:00Z")),
            user_agent: Some("Mozilla/5.0 (Windows NT 10.0)".into()),
        };
        let text = compose(&submission, "youtube");

        assert!(text.starts_with("🎯 *New lead - ARQ Coaching*"));
        assert!(text.contains("▶️ *Source:* YouTube"));
        assert!(text.contains("*Time:* 2024-06-10 18:00"));
        assert!(text.contains("*Device:* Windows desktop"));
    }

    #[test]
    fn compose_without_timestamp() {
        let text = compose(&LeadSubmission::default(), "friend");
        assert!(text.contains("*Time:* unknown"));
        assert!(text.contains("*Device:* Unknown"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Config
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_credentials_and_address() {
        let config = RelayConfig::from_lookup(lookup(&[
            (TOKEN_VAR, "123:abc"),
            (CHAT_ID_VAR, "-1001"),
            (ADDR_VAR, "0.0.0.0:8080"),
        ]));
        assert_eq!(config.credentials(), Some(("123:abc", "-1001")));
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn partial_credentials_are_none() {
        let config = RelayConfig::from_lookup(lookup(&[(TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, " ")]));
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn bad_address_falls_back() {
        let config = RelayConfig::from_lookup(lookup(&[(ADDR_VAR, "not-an-addr")]));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_ADDR);
        assert_eq!(RelayConfig::default().bind_addr.to_string(), DEFAULT_ADDR);
    }
}
