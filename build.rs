//! # Build Script
//!
//! Embeds the Windows Application Manifest (`app.manifest`, via `launcher.rc`) into the
//! launcher executable so it identifies as Win10/11 compatible and runs without elevation.

fn main() {
    println!("cargo:rerun-if-changed=launcher.rc");
    println!("cargo:rerun-if-changed=app.manifest");

    // Resources only mean something for Windows targets.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        // If it fails, the launcher still builds, just without the manifest.
        let _ = embed_resource::compile("launcher.rc", embed_resource::NONE);
    }
}
