//! Dev command: build in dev mode, then watch.

use sammi_bundler::BuildMode;

use crate::cli::DevArgs;
use crate::commands::build;
use crate::error::Result;

/// Execute the dev command. Builds in dev mode unless `--mode` says
/// otherwise; only dev mode watches.
pub async fn execute(args: DevArgs) -> Result<()> {
    build::run(args.root.as_deref(), &args.flags, BuildMode::Dev).await
}
