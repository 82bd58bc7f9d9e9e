pub mod backup;
pub mod journal;
pub mod settings;
pub mod stats;
pub mod view;
