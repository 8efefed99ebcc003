//! Command lines for each stage
//!
//! Pure constructors: nothing here runs a process.

use precheck_platform::binary::RELOCATIONS;
use precheck_platform::PlatformCommand;
use std::path::{Path, PathBuf};

use crate::options::Parallelism;

/// Make flag that reports uses of undefined variables
pub const WARN_UNDEFINED: &str = "--warn-undefined-variables";

/// Test suite directory, relative to the source tree
pub const TESTSUITE_DIR: &str = "testsuite";

/// Parallel test runner looked up on the PATH
pub const PARALLEL_RUNNER: &str = "parallel";

fn make(make_program: &str, dir: &Path, targets: &[&str]) -> PlatformCommand {
    let mut cmd = PlatformCommand::new(make_program);
    cmd.arg(WARN_UNDEFINED).args(targets).current_dir(dir);
    cmd
}

/// `<make> distclean`
#[must_use]
pub fn distclean(make_program: &str, dir: &Path) -> PlatformCommand {
    let mut cmd = PlatformCommand::new(make_program);
    cmd.arg("distclean").current_dir(dir);
    cmd
}

/// `git clean -f -d -x`
#[must_use]
pub fn force_clean(dir: &Path) -> PlatformCommand {
    let mut cmd = PlatformCommand::new("git");
    cmd.args(["clean", "-f", "-d", "-x"]).current_dir(dir);
    cmd
}

/// `patch -f -p1 -i <file>`
#[must_use]
pub fn apply_patch(dir: &Path, patch: &Path) -> PlatformCommand {
    let mut cmd = PlatformCommand::new("patch");
    cmd.args(["-f", "-p1", "-i"])
        .arg(patch.to_string_lossy())
        .current_dir(dir);
    cmd
}

/// `<make> [-jN] --warn-undefined-variables world.opt|world`
#[must_use]
pub fn build(
    make_program: &str,
    dir: &Path,
    native: bool,
    parallelism: Option<Parallelism>,
) -> PlatformCommand {
    let mut cmd = PlatformCommand::new(make_program);
    if let Some(jobs) = parallelism {
        cmd.arg(jobs.as_flag());
    }
    cmd.arg(WARN_UNDEFINED)
        .arg(if native { "world.opt" } else { "world" })
        .current_dir(dir);
    cmd
}

/// `<make> --warn-undefined-variables alldepend`
#[must_use]
pub fn dependency_check(make_program: &str, dir: &Path) -> PlatformCommand {
    make(make_program, dir, &["alldepend"])
}

/// `rebase -b <addr> <lib>` for every relocated library
#[must_use]
pub fn relocations(dir: &Path) -> Vec<PlatformCommand> {
    RELOCATIONS
        .iter()
        .map(|relocation| {
            let mut cmd = relocation.command();
            cmd.current_dir(dir);
            cmd
        })
        .collect()
}

/// `<make> --warn-undefined-variables install`
#[must_use]
pub fn install(make_program: &str, dir: &Path) -> PlatformCommand {
    make(make_program, dir, &["install"])
}

/// Test suite invocation
///
/// With a parallelism value and the parallel runner available, the suite is
/// run through the `parallel` target with `PARALLEL="-jN $PARALLEL"`;
/// otherwise sequentially through `all`.
#[must_use]
pub fn run_tests(
    make_program: &str,
    dir: &Path,
    parallel: Option<(Parallelism, Option<&str>)>,
) -> PlatformCommand {
    let testsuite: PathBuf = dir.join(TESTSUITE_DIR);
    match parallel {
        Some((jobs, inherited)) => {
            let mut cmd = make(make_program, &testsuite, &["parallel"]);
            cmd.env(
                "PARALLEL",
                format!("{} {}", jobs.as_flag(), inherited.unwrap_or_default()),
            );
            cmd
        }
        None => make(make_program, &testsuite, &["all"]),
    }
}
