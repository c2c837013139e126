use std::io::Write;
use std::process::Stdio;

use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_php_and_template_occurrences_merge_into_one_entry() -> Result<()> {
    let test = CliTest::with_file(
        "a.php",
        "<?php\n\nfunction intro() {\n  $x = 1;\n  echo ts(\"Hello\");\n}\n",
    )?;
    test.write_file("b.tpl", "<div>\n{ts msgid=\"Hello\"}\n</div>\n")?;

    let output = test.command().args(["a.php", "b.tpl"]).output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "#: a.php:5\n#: b.tpl:2\nmsgid \"Hello\"\nmsgstr \"\"\n"
    );
    assert!(stderr_of(&output).contains("Extracted 1 entry from 2 files"));

    Ok(())
}

#[test]
fn test_backup_file_is_never_dispatched() -> Result<()> {
    let test = CliTest::with_file("x.php~", "<?php ts('Ghost');\n")?;

    let output = test.command().arg("x.php~").output()?;

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "");
    assert!(stderr_of(&output).contains("Extracted 0 entries from 0 files"));

    Ok(())
}

#[test]
fn test_directory_discovery_skips_dependency_dirs() -> Result<()> {
    let test = CliTest::with_file("src/app.php", "<?php ts('Kept');\n")?;
    test.write_file("node_modules/dep/lib.js", "ts('Dropped');\n")?;
    test.write_file("vendor/autoload.php", "<?php ts('Dropped too');\n")?;

    let output = test.command().arg(".").output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "#: src/app.php:1\nmsgid \"Kept\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_stdin_path_list() -> Result<()> {
    let test = CliTest::with_file("c.js", "alert(ts('From stdin list'));\n")?;

    let mut child = test
        .command()
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(b"c.js\n")?;
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "#: c.js:1\nmsgid \"From stdin list\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_append_writes_header_exactly_once() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts('First');\n")?;
    test.write_file("b.php", "<?php ts('Second');\n")?;
    test.write_file("pot-header.txt", "# Generated header\n")?;

    let first = test
        .command()
        .args(["a.php", "--out", "messages.pot", "--header", "pot-header.txt"])
        .output()?;
    assert!(first.status.success());

    let second = test
        .command()
        .args([
            "b.php",
            "--out",
            "messages.pot",
            "--header",
            "pot-header.txt",
            "--append",
        ])
        .output()?;
    assert!(second.status.success());

    let written = test.read_file("messages.pot")?;
    assert_eq!(written.matches("# Generated header").count(), 1);
    assert_eq!(
        written,
        "# Generated header\n#: a.php:1\nmsgid \"First\"\nmsgstr \"\"\n\n#: b.php:1\nmsgid \"Second\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_default_msgctxt_flag() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts('Save');\n")?;

    let output = test
        .command()
        .args(["a.php", "--msgctxt", "admin"])
        .output()?;

    assert_eq!(
        stdout_of(&output),
        "#: a.php:1\nmsgctxt \"admin\"\nmsgid \"Save\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_config_file_supplies_defaults_and_cli_overrides() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts('Save');\n")?;
    test.write_file(".potxrc.json", "{ \"msgctxt\": \"from-config\" }")?;

    let from_config = test.command().arg("a.php").output()?;
    assert!(stdout_of(&from_config).contains("msgctxt \"from-config\""));

    let from_cli = test
        .command()
        .args(["a.php", "--msgctxt", "from-cli"])
        .output()?;
    assert!(stdout_of(&from_cli).contains("msgctxt \"from-cli\""));
    assert!(!stdout_of(&from_cli).contains("from-config"));

    Ok(())
}

#[test]
fn test_extensionless_php_script_is_sniffed() -> Result<()> {
    let test = CliTest::with_file("bin/cron", "#!/usr/bin/env php\n<?php ts('Cron job');\n")?;

    let output = test.command().arg("bin/cron").output()?;

    assert_eq!(
        stdout_of(&output),
        "#: bin/cron:2\nmsgid \"Cron job\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_settings_file_extracts_bare_title() -> Result<()> {
    let test = CliTest::with_file(
        "mail.setting.php",
        "<?php\nreturn array(\n  'title' => 'Mailer Limit',\n);\n",
    )?;

    let output = test.command().arg("mail.setting.php").output()?;

    assert_eq!(
        stdout_of(&output),
        "#. setting title\n#: mail.setting.php:3\nmsgid \"Mailer Limit\"\nmsgstr \"\"\n"
    );

    Ok(())
}

#[test]
fn test_non_literal_argument_warns_but_succeeds() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts($dynamic);\n")?;

    let quiet = test.command().arg("a.php").output()?;
    assert!(quiet.status.success());
    assert_eq!(stdout_of(&quiet), "");
    assert!(stderr_of(&quiet).contains("1 extraction warning(s)"));

    let verbose = test.command().args(["a.php", "-v"]).output()?;
    assert!(stderr_of(&verbose).contains("non-literal argument to ts()"));

    Ok(())
}

#[test]
fn test_missing_header_file_is_fatal() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts('X');\n")?;

    let output = test
        .command()
        .args(["a.php", "--out", "messages.pot", "--header", "missing.txt"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Error:"));
    assert!(stderr_of(&output).contains("Failed to read header file"));

    Ok(())
}

#[test]
fn test_no_arguments_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Usage"));

    Ok(())
}

#[test]
fn test_output_is_stable_across_runs() -> Result<()> {
    let test = CliTest::with_file("a.php", "<?php ts('One'); ts('Two');\n")?;
    test.write_file("b.js", "ts('One');\n")?;

    let first = test.command().args(["b.js", "a.php"]).output()?;
    let second = test.command().args(["a.php", "b.js"]).output()?;

    assert_eq!(stdout_of(&first), stdout_of(&second));

    Ok(())
}
