// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command builders for the external compiler toolchain.

use br_core::{CommandSpec, JobId};
use br_storage::Layout;

/// Environment variable naming the R user library.
pub const R_LIBS_USER: &str = "R_LIBS_USER";

/// Builds the commands the engine launches.
///
/// The engine treats every command as opaque: it only interprets the exit
/// code and captures the output.
pub trait Toolchain: Send + Sync {
    /// Build the source(s) of `job` into `binary/`. A failing build may
    /// leave details in `info/`.
    fn build(&self, job: &JobId, layout: &Layout) -> CommandSpec;

    /// Refresh the packages in the private library.
    fn upgrade(&self, layout: &Layout) -> CommandSpec;

    /// Populate an empty private library, if the toolchain needs one.
    fn bootstrap(&self, layout: &Layout) -> Option<CommandSpec>;
}

/// Toolchain driving `Rscript` and the `buildr` R package.
#[derive(Debug, Clone)]
pub struct RscriptToolchain {
    rscript: String,
    host_library: Option<String>,
}

impl RscriptToolchain {
    /// `host_library` is the user library that provides `buildr` itself
    /// while bootstrapping.
    pub fn new(rscript: impl Into<String>, host_library: Option<String>) -> Self {
        Self { rscript: rscript.into(), host_library }
    }

    fn expr(&self, expr: String) -> CommandSpec {
        CommandSpec::new(&self.rscript).arg("-e").arg(expr)
    }
}

impl Toolchain for RscriptToolchain {
    fn build(&self, job: &JobId, layout: &Layout) -> CommandSpec {
        let lib = layout.lib();
        self.expr(format!(
            "buildr:::build_binary_main({}, {}, {}, {}, {})",
            r_string(&job.to_string()),
            r_string(&layout.source().to_string_lossy()),
            r_string(&layout.binary().to_string_lossy()),
            r_string(&layout.info().to_string_lossy()),
            r_string(&lib.to_string_lossy()),
        ))
        .env(R_LIBS_USER, lib.to_string_lossy())
    }

    fn upgrade(&self, layout: &Layout) -> CommandSpec {
        // Base R only: loading packages from the library being upgraded
        // would hold file locks on some platforms.
        let lib = layout.lib();
        self.expr(format!("update.packages({}, ask = FALSE)", r_string(&lib.to_string_lossy())))
            .env(R_LIBS_USER, lib.to_string_lossy())
    }

    fn bootstrap(&self, layout: &Layout) -> Option<CommandSpec> {
        let command = self.expr(format!(
            "buildr:::bootstrap({})",
            r_string(&layout.lib().to_string_lossy())
        ));
        Some(match &self.host_library {
            Some(host) => command.env(R_LIBS_USER, host),
            None => command,
        })
    }
}

/// Quote `s` as an R string literal.
fn r_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod script {
    use super::Toolchain;
    use br_core::{CommandSpec, JobId};
    use br_storage::Layout;

    /// Toolchain running `sh -c` snippets, for tests.
    ///
    /// Build scripts receive `$1` job id, `$2` source dir, `$3` binary dir,
    /// `$4` info dir, `$5` library dir. Other scripts receive only `$5`.
    #[derive(Debug, Clone)]
    pub struct ScriptToolchain {
        pub build: String,
        pub upgrade: String,
        pub bootstrap: Option<String>,
    }

    impl ScriptToolchain {
        /// Builds copy each source to `binary/` and succeed.
        pub fn succeeding() -> Self {
            Self::with_build(
                r#"for id in $(echo "$1" | tr ',' ' '); do echo "*** buildr: $id"; cp "$2/$id" "$3/$id"; done"#,
            )
        }

        /// Builds print to the log and exit 1.
        pub fn failing() -> Self {
            Self::with_build(r#"echo "building $1"; exit 1"#)
        }

        pub fn with_build(build: &str) -> Self {
            Self { build: build.to_string(), upgrade: "true".to_string(), bootstrap: None }
        }

        fn sh(script: &str, args: [String; 5]) -> CommandSpec {
            let base = CommandSpec::new("sh").arg("-c").arg(script).arg("buildr");
            args.into_iter().fold(base, |command, arg| command.arg(arg))
        }
    }

    impl Toolchain for ScriptToolchain {
        fn build(&self, job: &JobId, layout: &Layout) -> CommandSpec {
            let dir = |p: std::path::PathBuf| p.to_string_lossy().into_owned();
            Self::sh(
                &self.build,
                [
                    job.to_string(),
                    dir(layout.source()),
                    dir(layout.binary()),
                    dir(layout.info()),
                    dir(layout.lib()),
                ],
            )
        }

        fn upgrade(&self, layout: &Layout) -> CommandSpec {
            let lib = layout.lib().to_string_lossy().into_owned();
            Self::sh(&self.upgrade, [String::new(), String::new(), String::new(), String::new(), lib])
        }

        fn bootstrap(&self, layout: &Layout) -> Option<CommandSpec> {
            let lib = layout.lib().to_string_lossy().into_owned();
            self.bootstrap.as_deref().map(|script| {
                Self::sh(script, [String::new(), String::new(), String::new(), String::new(), lib])
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use script::ScriptToolchain;

#[cfg(test)]
#[path = "toolchain_tests.rs"]
mod tests;
