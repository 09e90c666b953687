//! Main entry point for ChainmapCli

#![deny(warnings, missing_docs, trivial_casts, unused_qualifications)]
#![forbid(unsafe_code)]

use chainmap_cli::application::APP;

/// Boot ChainmapCli
fn main() {
    abscissa_core::boot(&APP);
}
