//! grepzip: search a directory tree and zip the files that match

use anyhow::Result;

fn main() -> Result<()> {
    grepzip::cli::run()
}
