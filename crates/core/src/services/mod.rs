pub mod backup_service;
pub mod journal_service;
pub mod list_service;
pub mod preset_service;
pub mod profile_service;
pub mod stats_service;
