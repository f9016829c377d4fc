use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::PackerConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: PackerConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: PackerConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve input patterns to actual file paths.
    ///
    /// Glob patterns are expanded in sorted order, and all paths are
    /// resolved relative to the config file directory. Pattern order is
    /// kept, so it doubles as frame order.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            if is_glob_pattern(pattern) {
                let full_pattern = self.config_dir.join(pattern);
                let pattern_str = full_pattern.to_string_lossy();

                let paths = glob::glob(&pattern_str)
                    .with_context(|| format!("invalid glob pattern: {}", pattern))?;

                for entry in paths {
                    let path =
                        entry.with_context(|| format!("failed to read glob entry: {}", pattern))?;
                    results.push(path);
                }
            } else {
                results.push(self.config_dir.join(pattern));
            }
        }

        Ok(results)
    }

    /// Resolve the output atlas path relative to the config file directory.
    pub fn resolve_output(&self) -> Option<PathBuf> {
        self.config
            .output
            .as_ref()
            .map(|output| self.config_dir.join(output))
    }
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.tga"));
        assert!(is_glob_pattern("frames/*.tga"));
        assert!(is_glob_pattern("frames/**/*.png"));
        assert!(is_glob_pattern("frame?.tga"));
        assert!(is_glob_pattern("frame[0-9].tga"));
        assert!(!is_glob_pattern("frame.tga"));
        assert!(!is_glob_pattern("frames/idle_00.tga"));
    }

    #[test]
    fn test_load_resolves_relative_to_config() {
        let dir = std::env::temp_dir().join(format!("preload_packer_config_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("frames")).unwrap();
        for name in ["b.tga", "a.tga", "notes.txt"] {
            std::fs::write(dir.join("frames").join(name), b"").unwrap();
        }
        let config_path = dir.join("atlas.json");
        std::fs::write(
            &config_path,
            r#"{ "input": ["frames/*.tga", "extra.tga"], "output": "out/atl.tga", "frames": 12 }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        let inputs = loaded.resolve_inputs().unwrap();
        let output = loaded.resolve_output();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(
            inputs,
            vec![
                dir.join("frames").join("a.tga"),
                dir.join("frames").join("b.tga"),
                dir.join("extra.tga"),
            ]
        );
        assert_eq!(output, Some(dir.join("out/atl.tga")));
        assert_eq!(loaded.config.frames, 12);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let path = std::env::temp_dir().join(format!(
            "preload_packer_bad_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        let result = LoadedConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
