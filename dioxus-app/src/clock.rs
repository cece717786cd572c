use time::OffsetDateTime;

/// Milliseconds since the epoch, from the browser clock on wasm.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}

pub fn now() -> OffsetDateTime {
    let nanos = (now_ms() * 1_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// A fresh seed for the widgets' random sources.
#[cfg(target_arch = "wasm32")]
pub fn seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64 ^ now_ms() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn seed() -> u64 {
    now_ms() as u64
}
