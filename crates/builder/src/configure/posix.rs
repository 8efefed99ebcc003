use precheck_platform::process::shell::{quote, quote_all};

use super::ConfigureInputs;

/// Flags enabling the optimizing backend and its invariant checks
const FLAMBDA_FLAGS: &str = "-flambda -with-flambda-invariants";

/// Script passed to `sh -c`
///
/// The configure options from the environment are a shell fragment and stay
/// unquoted; each `-conf` value is quoted so it reaches configure as one
/// argument.
#[must_use]
pub fn configure_script(inputs: &ConfigureInputs<'_>) -> String {
    let mut parts = vec![
        "./configure".to_string(),
        "-prefix".to_string(),
        quote(&inputs.install_dir.to_string_lossy()),
    ];

    if let Some(options) = inputs.configure_options.map(str::trim) {
        if !options.is_empty() {
            parts.push(options.to_string());
        }
    }

    if !inputs.options.extra_configure_args.is_empty() {
        parts.push(quote_all(&inputs.options.extra_configure_args));
    }

    if inputs.flambda {
        parts.push(FLAMBDA_FLAGS.to_string());
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BuildOptions;
    use std::path::Path;

    fn inputs<'a>(options: &'a BuildOptions, configure_options: Option<&'a str>, flambda: bool) -> ConfigureInputs<'a> {
        ConfigureInputs {
            source_dir: Path::new("/src"),
            install_dir: Path::new("/home/ci/ocaml-tmp-install-12"),
            options,
            configure_options,
            flambda,
        }
    }

    #[test]
    fn bare_script() {
        let options = BuildOptions::default();
        assert_eq!(
            configure_script(&inputs(&options, None, false)),
            "./configure -prefix '/home/ci/ocaml-tmp-install-12'"
        );
    }

    #[test]
    fn options_then_quoted_args_then_flambda() {
        let options = BuildOptions {
            extra_configure_args: vec!["-cc".into(), "gcc -O2 -DX='1'".into()],
            ..BuildOptions::default()
        };
        assert_eq!(
            configure_script(&inputs(&options, Some(" -no-debugger "), true)),
            "./configure -prefix '/home/ci/ocaml-tmp-install-12' -no-debugger \
             '-cc' 'gcc -O2 -DX='\\''1'\\''' -flambda -with-flambda-invariants"
        );
    }
}
