use clap::Parser;
use std::net::SocketAddr;

use crate::engine::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

/// Server settings, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tableview",
    version,
    about = "Browser-based CSV table viewer with a single-slot snapshot store"
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TABLEVIEW_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: SocketAddr,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "TABLEVIEW_BODY_LIMIT_MB", default_value_t = 50)]
    pub body_limit_mb: usize,

    /// Rows per page when the viewer starts (10, 50 or 100)
    #[arg(long, env = "TABLEVIEW_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            body_limit_mb: 50,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }

    /// The configured page size, or the default if it is not one on offer.
    pub fn initial_page_size(&self) -> usize {
        if PAGE_SIZES.contains(&self.page_size) {
            self.page_size
        } else {
            log::warn!(
                "Page size {} is not one of {:?}; using {}",
                self.page_size,
                PAGE_SIZES,
                DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        }
    }
}
