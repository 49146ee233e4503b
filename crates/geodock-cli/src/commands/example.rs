use super::dock;
use crate::cli::{ExampleArgs, RunArgs};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXAMPLE_CHECKPOINT: &str = "weights/dips.ckpt";
pub const EXAMPLE_PARTNER1: &str = "./data/test/a9_1a95.pdb1_3.dill_r_b_COMPLEX.pdb";
pub const EXAMPLE_PARTNER2: &str = "./data/test/a9_1a95.pdb1_3.dill_l_b_COMPLEX.pdb";
pub const EXAMPLE_OUTPUT: &str = "test";

pub async fn run(args: ExampleArgs) -> Result<()> {
    let run_args = example_run_args(args.run);
    info!(
        "Running bundled example with checkpoint {:?}",
        run_args.checkpoint
    );
    dock::execute(
        &run_args,
        Path::new(EXAMPLE_PARTNER1),
        Path::new(EXAMPLE_PARTNER2),
        Some(Path::new(EXAMPLE_OUTPUT)),
    )
    .await
}

/// The example pins its checkpoint unless the caller overrides it.
fn example_run_args(mut run_args: RunArgs) -> RunArgs {
    run_args
        .checkpoint
        .get_or_insert_with(|| PathBuf::from(EXAMPLE_CHECKPOINT));
    run_args
}
