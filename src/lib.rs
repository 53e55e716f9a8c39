//! Web audio player workspace facade.
//!
//! Re-exports the player core together with the host bridge for the target
//! being built, so hosts can depend on one crate:
//! - `desktop-shims` (default): `bridge_desktop` on native targets
//! - `wasm`: `bridge_wasm` plus the `getPlayer` JavaScript bindings

pub use bridge_traits;
pub use core_playback::*;
pub use core_runtime::logging;

#[cfg(all(not(target_arch = "wasm32"), feature = "desktop-shims"))]
pub use bridge_desktop;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use bridge_wasm;
