//! Demo command E2E smoke tests.

use std::io;
use std::process::{Command, Output};

const SCOPED_ENV: [&str; 5] = [
    "SORTGUARD_LOCALE",
    "SORTGUARD_LOG_LEVEL",
    "SORTGUARD_LOG_FORMAT",
    "SORTGUARD_DEFAULT_TARGET",
    "RUST_LOG",
];

fn run_demo(args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sortguard"));
    command.arg("demo").args(args);
    for key in SCOPED_ENV {
        command.env_remove(key);
    }
    command.output()
}

#[test]
fn demo_accepts_reference_value() -> io::Result<()> {
    let output = run_demo(&["--locale", "zh"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "验证通过\n");
    Ok(())
}

#[test]
fn demo_reports_rejection_without_failing() -> io::Result<()> {
    let output = run_demo(&["--value", "bogus", "--locale", "zh"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "SortField的值bogus必须是field_str1, field_str2, field_str3, str4, str5中的一个\n"
    );
    Ok(())
}

#[test]
fn demo_output_is_deterministic() -> io::Result<()> {
    let first = run_demo(&["--output", "json", "--target", "articles-legacy"])?;
    let second = run_demo(&["--output", "json", "--target", "articles-legacy"])?;

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout, "demo output should be deterministic");
    Ok(())
}

#[test]
fn demo_rejects_unknown_target() -> io::Result<()> {
    let output = run_demo(&["--target", "users"])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown target `users`"), "stderr: {stderr}");
    Ok(())
}
