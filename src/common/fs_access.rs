use std::path::PathBuf;

use anyhow::Result;

/// Well-known per-user directories used for runtime caches, e.g.
/// `~/.cache/vigil/trt-engine-cache`.
#[derive(Debug, Clone, Copy)]
pub enum AppDirs {
    Cache,
    Config,
}

impl AppDirs {
    fn base(self) -> Option<PathBuf> {
        match self {
            AppDirs::Cache => dirs::cache_dir(),
            AppDirs::Config => dirs::config_dir(),
        }
    }

    /// Resolves `<base>/vigil/<subs..>`, creating the directory when missing.
    pub fn path_with_subs(self, subs: &[&str]) -> Result<PathBuf> {
        let mut path = self
            .base()
            .ok_or_else(|| anyhow::anyhow!("no usable base directory on this platform"))?;
        path.push("vigil");
        for sub in subs {
            path.push(sub);
        }
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    pub fn path(self) -> Result<PathBuf> {
        self.path_with_subs(&[])
    }
}
