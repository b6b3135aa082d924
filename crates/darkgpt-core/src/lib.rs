// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for DarkGPT.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by every crate in the workspace. Adapters (the AI provider, the
//! message store, the identity provider) implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DarkgptError;
pub use types::{
    AdapterType, ChatReply, ChatRequest, HealthStatus, Message, Role, UserProfile, UserRecord,
};

pub use traits::{AuthAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkgpt_error_has_all_variants() {
        let _config = DarkgptError::Config("test".into());
        let _storage = DarkgptError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = DarkgptError::Provider {
            message: "test".into(),
            source: None,
        };
        let _tool = DarkgptError::ToolExecution {
            message: "test".into(),
            source: None,
        };
        let _unavailable = DarkgptError::PersistenceUnavailable("test".into());
        let _validation = DarkgptError::Validation("test".into());
        let _auth = DarkgptError::Auth("test".into());
        let _busy = DarkgptError::SessionBusy;
        let _internal = DarkgptError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Provider, AdapterType::Storage, AdapterType::Auth] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_auth_adapter<T: AuthAdapter>() {}
    }
}
