use std::env;
use std::path::PathBuf;

const WATCHED_VARIABLES: [&str; 4] = [
    "FFMPEG_DIR",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

/// Windows has no system FFmpeg; point users at a vcpkg install when
/// `ffmpeg-sys-next` is left to guess.
fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Some(vcpkg_root) = env::var_os("VCPKG_ROOT") else {
        println!(
            "cargo:warning=framesplit needs FFmpeg development libraries. Set FFMPEG_DIR, or install ffmpeg through vcpkg and set VCPKG_ROOT."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| String::from("x64-windows"));
    let install_dir = PathBuf::from(vcpkg_root).join("installed").join(&triplet);

    if !install_dir.exists() {
        println!(
            "cargo:warning=No vcpkg install for triplet {triplet} under {}; FFmpeg discovery will likely fail.",
            install_dir.display()
        );
        return;
    }

    println!(
        "cargo:warning=Using vcpkg FFmpeg candidate {}. Export FFMPEG_DIR to silence this message.",
        install_dir.display()
    );
    if triplet.ends_with("-static") || env::var_os("VCPKGRS_DYNAMIC").is_some() {
        return;
    }
    println!("cargo:warning=VCPKGRS_DYNAMIC is unset; set it to 1 for dynamically linked vcpkg FFmpeg.");
}
