// ---------------------------------------------------------------------------
// MiradorConfig — file-based config loader (mirador.json) with env-var fallback
// ---------------------------------------------------------------------------

/// Top-level config loaded from `mirador.json`. Every field is optional;
/// the `resolve_*` accessors fall back to an env var, then a default.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct MiradorConfig {
    pub port: Option<u16>,
    /// Path of the JSON seed file backing the in-memory catalog.
    pub seed_path: Option<String>,
    /// When set, the service reads the catalog from this upstream API
    /// instead of the seed file.
    pub upstream_base_url: Option<String>,
    pub upstream_timeout_ms: Option<u64>,
    /// Search-response cache TTL. 0 disables the cache entirely.
    pub cache_ttl_secs: Option<u64>,
    pub cache_capacity: Option<u64>,
}

impl MiradorConfig {
    /// Port: JSON field → `MIRADOR_PORT` env var → `PORT` → 8080.
    pub fn resolve_port(&self) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        for key in ["MIRADOR_PORT", "PORT"] {
            if let Ok(v) = std::env::var(key) {
                if let Ok(p) = v.trim().parse::<u16>() {
                    return p;
                }
            }
        }
        8080
    }

    /// Seed path: JSON field → `MIRADOR_SEED_PATH` → `seed/catalog.json`.
    pub fn resolve_seed_path(&self) -> String {
        if let Some(p) = &self.seed_path {
            if !p.trim().is_empty() {
                return p.clone();
            }
        }
        std::env::var("MIRADOR_SEED_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "seed/catalog.json".to_string())
    }

    /// Upstream base URL: JSON field → `MIRADOR_UPSTREAM_URL` → `None`
    /// (no upstream — serve from the seeded in-memory catalog).
    pub fn resolve_upstream_base_url(&self) -> Option<String> {
        if let Some(u) = &self.upstream_base_url {
            if !u.trim().is_empty() {
                return Some(u.clone());
            }
        }
        std::env::var("MIRADOR_UPSTREAM_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    /// Per-call upstream deadline: JSON field →
    /// `MIRADOR_UPSTREAM_TIMEOUT_MS` → 2500ms, floored at 250ms.
    pub fn resolve_upstream_timeout_ms(&self) -> u64 {
        let ms = self.upstream_timeout_ms.or_else(|| {
            std::env::var("MIRADOR_UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
        });
        ms.unwrap_or(2_500).max(250)
    }

    /// Cache TTL: JSON field → `MIRADOR_CACHE_TTL_SECS` → 600.
    pub fn resolve_cache_ttl_secs(&self) -> u64 {
        if let Some(n) = self.cache_ttl_secs {
            return n;
        }
        std::env::var("MIRADOR_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600)
    }

    /// Cache capacity: JSON field → `MIRADOR_CACHE_CAPACITY` → 10_000.
    pub fn resolve_cache_capacity(&self) -> u64 {
        if let Some(n) = self.cache_capacity {
            return n;
        }
        std::env::var("MIRADOR_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000)
    }
}

/// Load `mirador.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `MIRADOR_CONFIG` env var path
/// 2. `./mirador.json` (process cwd)
/// 3. `../mirador.json` (one level up, when running from a subdirectory)
///
/// Missing file → `MiradorConfig::default()` (silent, env-var fallbacks
/// apply). Parse error → log a warning, return the default.
pub fn load_config() -> MiradorConfig {
    let candidates: Vec<std::path::PathBuf> = {
        let mut v = vec![
            std::path::PathBuf::from("mirador.json"),
            std::path::PathBuf::from("../mirador.json"),
        ];
        if let Ok(env_path) = std::env::var("MIRADOR_CONFIG") {
            v.insert(0, std::path::PathBuf::from(env_path));
        }
        v
    };

    for path in &candidates {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<MiradorConfig>(&contents) {
                Ok(cfg) => {
                    tracing::info!("mirador.json loaded from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(
                        "mirador.json parse error at {}: {} — using defaults",
                        path.display(),
                        e
                    );
                    return MiradorConfig::default();
                }
            },
            Err(_) => continue, // file not found at this path — try next
        }
    }

    MiradorConfig::default()
}
