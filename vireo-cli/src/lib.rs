use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Compile every view island in `input` and write the result, under the
/// same file name, into `out_dir` (default: `target/vireo-gen`).
pub fn build_cmd(input: &Path, out_dir: Option<&Path>) -> Result<PathBuf> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;

    let code = match vireo_compiler::compile_source(&src) {
        Ok(code) => code,
        Err(e) => {
            // Fatal for the whole file: no partial output for a failed island.
            eprintln!("{e}");
            anyhow::bail!("failed to compile {}", input.display());
        }
    };
    log::debug!("compiled {}", input.display());

    let out_dir = out_dir
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("target/vireo-gen"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("out.rs");
    let out_path = out_dir.join(name);
    fs::write(&out_path, code)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!("Generated: {}", out_path.display());
    Ok(out_path)
}

/// Compile without writing anything; report diagnostics only.
pub fn check_cmd(input: &Path) -> Result<()> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;

    match vireo_compiler::compile_source(&src) {
        Ok(_) => {
            println!("OK: {}", input.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            anyhow::bail!("failed to compile {}", input.display());
        }
    }
}
