use std::time::{SystemTime, UNIX_EPOCH};

fn emit_build_version() {
    let n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    println!("cargo:rustc-env=SILICA_BUILD_N={n}");
    println!(
        "cargo:rustc-env=SILICA_DISPLAY_VERSION={}+{n}",
        env!("CARGO_PKG_VERSION")
    );
}

fn main() {
    emit_build_version();
}
