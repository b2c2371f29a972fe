//! Platform abstraction layer
//!
//! Wall-clock and entropy sources. The engine itself only ever receives
//! timestamps as arguments; these helpers are for the outer loop.

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Monotonic frame clock in milliseconds (falls back to wall clock)
#[cfg(target_arch = "wasm32")]
pub fn frame_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(now_ms)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn frame_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Non-reproducible bits for held-cube draws
pub fn entropy() -> u64 {
    let ms = now_ms();
    // Mix the sub-millisecond fraction in as well; Date.now() is coarse.
    let frac = (frame_ms().fract() * 1_000_000.0) as u64;
    (ms as u64).wrapping_mul(2_654_435_761) ^ frac
}
