use crate::catalog::CatalogSource;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://routineloreal.emaantovska2005.workers.dev/";

#[derive(Debug, Clone, Parser)]
#[command(name = "routine-picker", version, about = "Product picker with a routine-building chat assistant")]
pub struct Config {
    /// Catalog file path or http(s) URL
    #[arg(long, default_value = "data/products.json")]
    pub catalog: String,

    /// Chat completion endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Directory for the saved selection and exported transcripts
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
}

impl Config {
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    pub fn state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("routine-picker"))
            .unwrap_or_else(|| PathBuf::from(".routine-picker"))
    }
}
