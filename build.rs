//! Build script for the sporlstats dashboard.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory so that a ready-to-edit example sits next to the `.env`
//! file the application reads at startup.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/sporlstats/`.
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or to write the file aborts the build.
///
/// Target locations:
/// - Linux: `~/.local/share/sporlstats/.env.example`
/// - macOS: `~/Library/Application Support/sporlstats/.env.example`
/// - Windows: `%LOCALAPPDATA%/sporlstats/.env.example`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sporlstats");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
