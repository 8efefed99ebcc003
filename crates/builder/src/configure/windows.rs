use precheck_errors::{BuildError, Error};
use precheck_platform::WindowsLayout;
use regex::{NoExpand, Regex};
use std::path::Path;
use tokio::fs;

use super::ConfigureInputs;

const PREFIX_LINE: &str = r"(?m)^PREFIX=.*$";
/// Matches the line even when commented out
const RUNTIMED_LINE: &str = r"(?m)^#*[ \t]*RUNTIMED=.*$";
const FLAMBDA_LINE: &str = r"(?m)^FLAMBDA=.*$";

fn line_pattern(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| {
        BuildError::ConfigureFailed {
            message: format!("invalid settings pattern {pattern}: {e}"),
        }
        .into()
    })
}

/// Settings values forced into the copied template
#[derive(Debug, Clone, Copy)]
pub struct SettingsRewrite<'a> {
    pub install_dir: &'a Path,
    pub flambda: bool,
}

/// Rewrite a settings file: install prefix, debug runtime, and optionally
/// the optimizing backend
///
/// # Errors
///
/// Returns `BuildError::ConfigureFailed` if a line pattern fails to compile.
pub fn rewrite_settings(contents: &str, rewrite: &SettingsRewrite<'_>) -> Result<String, Error> {
    let prefix = format!("PREFIX={}", rewrite.install_dir.to_string_lossy());
    let text = line_pattern(PREFIX_LINE)?.replace_all(contents, NoExpand(&prefix));
    let text = line_pattern(RUNTIMED_LINE)?.replace_all(&text, NoExpand("RUNTIMED=true"));
    if rewrite.flambda {
        Ok(line_pattern(FLAMBDA_LINE)?
            .replace_all(&text, NoExpand("FLAMBDA=true"))
            .into_owned())
    } else {
        Ok(text.into_owned())
    }
}

fn configure_failed(action: &str, path: &Path, e: &std::io::Error) -> Error {
    BuildError::ConfigureFailed {
        message: format!("{action} {}: {e}", path.display()),
    }
    .into()
}

async fn copy(source_dir: &Path, from: &str, to: &str) -> Result<(), Error> {
    let from = source_dir.join(from);
    let to = source_dir.join(to);
    fs::copy(&from, &to)
        .await
        .map_err(|e| configure_failed("cannot copy", &from, &e))?;
    Ok(())
}

/// Copy the header pair and settings template, then rewrite the settings
pub(super) async fn write_settings(
    layout: &WindowsLayout,
    inputs: &ConfigureInputs<'_>,
) -> Result<(), Error> {
    for (from, to) in WindowsLayout::HEADERS {
        copy(inputs.source_dir, from, to).await?;
    }
    copy(
        inputs.source_dir,
        layout.settings_template,
        WindowsLayout::SETTINGS_FILE,
    )
    .await?;

    let settings = inputs.source_dir.join(WindowsLayout::SETTINGS_FILE);
    let contents = fs::read_to_string(&settings)
        .await
        .map_err(|e| configure_failed("cannot read", &settings, &e))?;
    let rewritten = rewrite_settings(
        &contents,
        &SettingsRewrite {
            install_dir: inputs.install_dir,
            flambda: inputs.flambda,
        },
    )?;
    fs::write(&settings, rewritten)
        .await
        .map_err(|e| configure_failed("cannot write", &settings, &e))?;
    Ok(())
}
