//! Tray profiles: the expected-item layout a scan is verified against.
//!
//! A profile is pure data: an ordered list of zones, each with an expected
//! count, a region and an optional logo reference. Profiles are read-only
//! after load; there is no mutation API. The [`ProfileStore`] resolves tray
//! ids against a directory of JSON documents and memoizes what it has loaded.

mod store;
mod types;

pub use store::ProfileStore;
pub use types::{ExpectedItem, LogoRef, TrayProfile};
