//! Utils

use clap::Parser;

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Directory for the durable store (cart and availability blobs)
    #[clap(short, long, default_value = "target/storefront-demo")]
    pub store: String,

    /// Base flavor to customize
    #[clap(short, long, default_value = "original")]
    pub flavor: String,

    /// Size tier for the custom cup
    #[clap(long, default_value = "regular")]
    pub size: String,

    /// Number of custom cups to add
    #[clap(short, long, default_value_t = 1)]
    pub cups: u32,

    /// Clear the persisted cart before starting
    #[clap(long)]
    pub fresh: bool,
}
