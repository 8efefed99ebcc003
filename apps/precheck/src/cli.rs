//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// precheck - build, install and test a compiler source tree on one platform
///
/// The platform comes from `OCAML_ARCH` and the default job count from
/// `OCAML_JOBS`. Remaining arguments are run overrides: `-conf <arg>`,
/// `-patch1 <file>`, `-no-native` and `-jN`.
#[derive(Parser, Debug)]
#[command(name = "precheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-platform build-and-test orchestrator")]
pub struct Cli {
    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source tree to drive (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Run overrides, parsed by the orchestrator
    #[arg(
        value_name = "OVERRIDES",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub overrides: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_collected_verbatim() {
        let cli = Cli::try_parse_from([
            "precheck",
            "--source-dir",
            "/src/ocaml",
            "-conf",
            "-no-shared-libs",
            "-no-native",
            "-j4",
        ])
        .unwrap();

        assert_eq!(cli.source_dir, Some(PathBuf::from("/src/ocaml")));
        assert_eq!(cli.overrides, ["-conf", "-no-shared-libs", "-no-native", "-j4"]);
        assert!(!cli.json);
    }

    #[test]
    fn unknown_overrides_reach_the_orchestrator() {
        let cli = Cli::try_parse_from(["precheck", "--json", "-badflag"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.overrides, ["-badflag"]);
    }
}
