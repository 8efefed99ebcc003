//! Binary relocation (DLL rebasing)
//!
//! Shared libraries produced by the build are moved to fixed base addresses
//! so they do not collide when loaded together under the emulation layer.

use crate::process::PlatformCommand;

/// Tool that rewrites the preferred load address of a DLL
pub const REBASE_PROGRAM: &str = "rebase";

/// One library and the base address it is moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    /// Library path relative to the source tree
    pub library: &'static str,
    /// Base address passed to `rebase -b`
    pub base: u32,
}

impl Relocation {
    /// Command performing this relocation
    #[must_use]
    pub fn command(&self) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(REBASE_PROGRAM);
        cmd.arg("-b")
            .arg(format!("{:#x}", self.base))
            .arg(self.library);
        cmd
    }
}

/// Libraries rebased after the build, in order
pub const RELOCATIONS: [Relocation; 2] = [
    Relocation {
        library: "otherlibs/unix/dllunix.so",
        base: 0x7cd2_0000,
    },
    Relocation {
        library: "otherlibs/systhreads/dllthreads.so",
        base: 0x7cdc_0000,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_commands() {
        let commands: Vec<String> = RELOCATIONS.iter().map(|r| r.command().to_string()).collect();
        assert_eq!(
            commands,
            [
                "rebase -b 0x7cd20000 otherlibs/unix/dllunix.so",
                "rebase -b 0x7cdc0000 otherlibs/systhreads/dllthreads.so",
            ]
        );
    }
}
