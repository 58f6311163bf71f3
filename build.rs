//! Build script: validates prompts.json at compile time.

use std::path::PathBuf;

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let config_path: PathBuf = [&manifest_dir, "config", "prompts.json"].iter().collect();
    println!("cargo:rerun-if-changed={}", config_path.display());
    let json = std::fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. prompts.json must exist and be valid.",
            config_path.display(),
            e
        )
    });
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct PromptEntry {
        mode: String,
        label: String,
        system: String,
    }
    let entries: Vec<PromptEntry> = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!(
            "prompts.json is invalid JSON: {}. Fix the file and rebuild.",
            e
        )
    });
    for required in ["solve", "theory"] {
        if !entries.iter().any(|e| e.mode == required) {
            panic!("prompts.json has no entry for mode \"{}\"", required);
        }
    }
}
