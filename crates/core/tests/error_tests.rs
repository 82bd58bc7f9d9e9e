// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use trading_journal_core::errors::CoreError;
use trading_journal_core::models::journal::JournalField;
use trading_journal_core::models::settings::PresetKind;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn validation_names_the_field() {
        let e = CoreError::Validation { field: JournalField::RiskReward };
        assert_eq!(e.to_string(), "Please provide a value for risk:reward");
        let e = CoreError::Validation { field: JournalField::Quality };
        assert_eq!(e.to_string(), "Please provide a value for execution quality");
    }

    #[test]
    fn missing_input() {
        assert_eq!(CoreError::MissingInput("profile name").to_string(), "Please provide a profile name");
    }

    #[test]
    fn duplicate_name() {
        let e = CoreError::DuplicateName("Alice".into());
        assert_eq!(e.to_string(), "A profile named 'Alice' already exists");
    }

    #[test]
    fn duplicate_preset() {
        let e = CoreError::DuplicatePreset { kind: PresetKind::Symbols, value: "XAUUSD".into() };
        assert_eq!(e.to_string(), "'XAUUSD' is already in the symbol list");
        let e = CoreError::DuplicatePreset { kind: PresetKind::Stops, value: "Fake Break".into() };
        assert_eq!(e.to_string(), "'Fake Break' is already in the stop type list");
    }

    #[test]
    fn reorder_integrity() {
        let e = CoreError::ReorderIntegrity("unknown id 5".into());
        assert_eq!(e.to_string(), "Custom order does not match the journal list: unknown id 5");
    }

    #[test]
    fn state_errors() {
        assert_eq!(CoreError::NoStorageRoot.to_string(), "No storage root selected");
        assert_eq!(CoreError::NoActiveProfile.to_string(), "No profile selected");
        assert_eq!(CoreError::ProfileNotFound("Bob".into()).to_string(), "Profile not found: Bob");
        assert_eq!(CoreError::JournalNotFound(17).to_string(), "Journal entry not found: 17");
        assert_eq!(CoreError::NoBackup.to_string(), "No reorder backup available for this profile");
    }

    #[test]
    fn storage_errors() {
        assert_eq!(CoreError::StorageUnavailable("quota".into()).to_string(), "Storage unavailable: quota");
        assert_eq!(CoreError::InvalidFileFormat("bad".into()).to_string(), "Invalid file format: bad");
        assert_eq!(CoreError::UnsupportedVersion(99).to_string(), "Unsupported file version: 99");
        assert_eq!(CoreError::Serialization("x".into()).to_string(), "Serialization error: x");
        assert_eq!(CoreError::Deserialization("y".into()).to_string(), "Deserialization error: y");
        assert_eq!(CoreError::FileIO("z".into()).to_string(), "File I/O error: z");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::FileIO(msg) => assert!(msg.contains("access denied")),
            other => panic!("Expected FileIO, got {:?}", other),
        }
    }

    #[test]
    fn from_bincode_error() {
        let bad_data: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<String, _> = bincode::deserialize(bad_data);
        let core_err: CoreError = result.unwrap_err().into();
        match &core_err {
            CoreError::Serialization(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Serialization, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let result: Result<String, _> = serde_json::from_str("{{invalid json");
        let core_err: CoreError = result.unwrap_err().into();
        assert!(matches!(core_err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_converts() {
        fn read_missing() -> Result<Vec<u8>, CoreError> {
            Ok(std::fs::read("/definitely/not/here.tjkv")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}
