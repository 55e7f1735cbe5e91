// Durable storage for Dishboard
//
// The pipeline itself is ephemeral by design; the only thing an admin
// expects to survive a restart is their notification preferences.

pub mod preference_store;

pub use preference_store::{
    FilePreferenceStore, InMemoryPreferenceStore, PreferenceStore, PREFERENCES_RECORD,
};
