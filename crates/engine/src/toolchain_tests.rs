// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use br_core::{PackageId, SpecialJob};

fn layout() -> Layout {
    Layout::new("/srv/buildr")
}

#[test]
fn build_passes_id_and_store_directories() {
    let toolchain = RscriptToolchain::new("Rscript", None);
    let id = PackageId::of_bytes(b"pkg");
    let command = toolchain.build(&JobId::from(id.clone()), &layout());

    assert_eq!(command.program, "Rscript");
    assert_eq!(command.args[0], "-e");
    assert_eq!(
        command.args[1],
        format!(
            "buildr:::build_binary_main(\"{}\", \"/srv/buildr/source\", \"/srv/buildr/binary\", \
             \"/srv/buildr/info\", \"/srv/buildr/lib\")",
            id
        )
    );
    assert_eq!(command.env, vec![(R_LIBS_USER.to_string(), "/srv/buildr/lib".to_string())]);
}

#[test]
fn build_of_batch_passes_joined_id() {
    let toolchain = RscriptToolchain::new("Rscript", None);
    let job = JobId::batch(vec![PackageId::of_bytes(b"a"), PackageId::of_bytes(b"b")]).unwrap();
    let command = toolchain.build(&job, &layout());
    assert!(command.args[1].contains(&format!("\"{}\"", job)));
}

#[test]
fn upgrade_uses_private_library() {
    let toolchain = RscriptToolchain::new("/usr/bin/Rscript", None);
    let command = toolchain.upgrade(&layout());
    assert_eq!(command.program, "/usr/bin/Rscript");
    assert_eq!(command.args[1], "update.packages(\"/srv/buildr/lib\", ask = FALSE)");
}

#[test]
fn bootstrap_uses_host_library_when_given() {
    let with_host = RscriptToolchain::new("Rscript", Some("/home/me/R".to_string()));
    let command = with_host.bootstrap(&layout()).unwrap();
    assert_eq!(command.args[1], "buildr:::bootstrap(\"/srv/buildr/lib\")");
    assert_eq!(command.env, vec![(R_LIBS_USER.to_string(), "/home/me/R".to_string())]);

    let without = RscriptToolchain::new("Rscript", None);
    assert!(without.bootstrap(&layout()).unwrap().env.is_empty());
}

#[yare::parameterized(
    plain     = { "/srv/lib",        "\"/srv/lib\"" },
    quote     = { "a\"b",            "\"a\\\"b\"" },
    backslash = { "C:\\R\\lib",      "\"C:\\\\R\\\\lib\"" },
    newline   = { "a\nb",            "\"a\\nb\"" },
)]
fn r_string_quoting(input: &str, expected: &str) {
    assert_eq!(r_string(input), expected);
}

#[test]
fn script_toolchain_passes_positional_arguments() {
    let toolchain = ScriptToolchain::with_build("exit 0");
    let job = JobId::from(SpecialJob::Upgrade);
    let command = toolchain.build(&job, &layout());
    assert_eq!(command.argv()[..5], ["sh", "-c", "exit 0", "buildr", "upgrade"]);
    assert_eq!(command.args.last().map(String::as_str), Some("/srv/buildr/lib"));
    assert!(toolchain.bootstrap(&layout()).is_none());
}
