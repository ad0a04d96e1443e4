//! bundleguard: install and submit guards behind one dependency.
//!
//! `core` holds the event and rejection types; `host` holds the guards, the
//! capability traits, and the harness that runs them.

pub mod core {
    pub use bundleguard_core::*;
}

pub mod host {
    pub use bundleguard_host::*;
}
