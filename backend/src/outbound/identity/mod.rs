//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `IdentityProvider` port against the
//! Identity Toolkit admin API (or its local emulator).

mod dto;
mod identity_toolkit;

pub use identity_toolkit::{
    IdentityToolkitBuildError, IdentityToolkitConfig, IdentityToolkitProvider,
};
