// WifiRemoteController - Build Script
//
// Exposes version info and the compiled-in network overrides.

use std::process::Command;

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=VERSION_STRING=RemoteCtl v{}-g{}", version, git_hash);

    // Credentials are read with option_env! in config::network
    println!("cargo:rerun-if-env-changed=REMOTE_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=REMOTE_WIFI_PASSWORD");

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
