//! End-to-end tests against the `clifw-demo` binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command pointing to the demo binary, with any ambient config unset
fn demo() -> Command {
    let mut cmd = cargo_bin_cmd!("clifw-demo");
    cmd.env_remove("CLIFW_CONFIG").env_remove("CLIFW_LOG");
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ============================================
// Help and version
// ============================================

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help() {
        demo()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("clifw-demo v"))
            .stdout(predicate::str::contains("Commands:"))
            .stdout(predicate::str::contains("greet"))
            .stdout(predicate::str::contains("Global Options:"))
            .stdout(predicate::str::contains("secret").not());
    }

    #[test]
    fn no_arguments_shows_general_help() {
        demo()
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage: clifw-demo <command> [options]"));
    }

    #[test]
    fn marks_deprecated_commands() {
        demo()
            .arg("help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Old entry point (deprecated)"));
    }

    #[test]
    fn shows_version() {
        let expected = format!("clifw-demo {}\n", env!("CARGO_PKG_VERSION"));
        demo().arg("--version").assert().success().stdout(expected.clone());
        demo().arg("-v").assert().success().stdout(expected.clone());
        demo().arg("version").assert().success().stdout(expected);
    }

    #[test]
    fn shows_command_help() {
        demo()
            .args(["deploy", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("deploy - Deploy the application"))
            .stdout(predicate::str::contains("Aliases: d"))
            .stdout(predicate::str::contains("-e, --env <string>"))
            .stdout(predicate::str::contains("(required)"))
            .stdout(predicate::str::contains("Choices: dev, staging, production"));
    }

    #[test]
    fn help_builtin_and_help_flag_agree() {
        let via_builtin = demo().args(["help", "greet"]).output().unwrap();
        let via_flag = demo().args(["greet", "-h"]).output().unwrap();
        let via_value = demo().args(["--help", "greet"]).output().unwrap();
        assert!(via_builtin.status.success());
        assert_eq!(via_builtin.stdout, via_flag.stdout);
        assert_eq!(via_builtin.stdout, via_value.stdout);
    }

    #[test]
    fn group_without_subcommand_shows_its_help() {
        demo()
            .arg("db")
            .assert()
            .success()
            .stdout(predicate::str::contains("Subcommands:"))
            .stdout(predicate::str::contains("migrate"))
            .stdout(predicate::str::contains("seed"));
    }

    #[test]
    fn deprecated_command_help_warns() {
        demo()
            .args(["help", "legacy"])
            .assert()
            .success()
            .stdout(predicate::str::contains("WARNING: This command is deprecated"));
    }
}

// ============================================
// Command execution
// ============================================

mod commands {
    use super::*;

    #[test]
    fn greet_uses_default() {
        demo().arg("greet").assert().success().stdout("Hello, world!\n");
    }

    #[test]
    fn greet_by_alias_with_positional() {
        demo()
            .args(["hi", "Alice", "--shout"])
            .assert()
            .success()
            .stdout("HELLO, ALICE!\n");
    }

    #[test]
    fn greet_with_short_option() {
        demo().args(["greet", "-n", "Bob"]).assert().success().stdout("Hello, Bob!\n");
    }

    #[test]
    fn deploy_succeeds() {
        demo()
            .args(["deploy", "--env", "staging", "--tags", "v1", "stable"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tags: v1, stable"))
            .stdout(predicate::str::contains("✓ Deployed to staging (1 replicas)"));
    }

    #[test]
    fn deploy_force_warns_on_stderr() {
        demo()
            .args(["d", "-e", "dev", "-f", "--replicas=3"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Force deploy"))
            .stdout(predicate::str::contains("(3 replicas)"));
    }

    #[test]
    fn nested_group_commands() {
        demo()
            .args(["db", "migrate", "--steps", "3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Applied 3 migration(s)"));
        demo()
            .args(["db", "m", "--dry-run"])
            .assert()
            .success()
            .stdout("Dry run: 1 migration(s) pending\n");
        demo()
            .args(["db", "seed", "users.sql"])
            .assert()
            .success()
            .stdout("Seeding database from users.sql\n");
    }

    #[test]
    fn count_and_number_options() {
        demo()
            .args(["calc", "-n", "42", "-vvv"])
            .assert()
            .success()
            .stdout("Number: 42, Verbosity: 3\n");
    }

    #[test]
    fn report_prints_table() {
        demo()
            .arg("report")
            .assert()
            .success()
            .stdout(predicate::str::contains("│ Service │ Status  │"))
            .stdout(predicate::str::contains("│ worker  │ stopped │"));
    }

    #[test]
    fn confirm_reads_stdin() {
        demo().arg("confirm").write_stdin("y\n").assert().success().stdout("Confirmed\n");
        demo().arg("confirm").write_stdin("n\n").assert().success().stdout("Aborted\n");
    }

    #[test]
    fn hidden_command_still_runs() {
        demo()
            .arg("secret")
            .assert()
            .success()
            .stdout("You found the secret command\n");
    }
}

// ============================================
// Errors and exit codes
// ============================================

mod errors {
    use super::*;

    #[test]
    fn unknown_command_suggests() {
        demo()
            .arg("gret")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Command \"gret\" not found."))
            .stderr(predicate::str::contains("Did you mean: greet"));
    }

    #[test]
    fn unknown_subcommand_in_group() {
        demo()
            .args(["db", "migrat"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Command \"migrat\" not found."));
    }

    #[test]
    fn missing_required_option() {
        demo()
            .arg("deploy")
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Error: Validation failed: Option --env is required",
            ));
    }

    #[test]
    fn invalid_choice_and_validator() {
        demo()
            .args(["deploy", "--env", "qa"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Option --env must be one of: dev, staging, production",
            ));
        demo()
            .args(["deploy", "--env", "dev", "--replicas", "0"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Option --replicas must be a positive integer",
            ));
    }

    #[test]
    fn coded_command_error() {
        demo()
            .args(["auth", "--token", "nope"])
            .assert()
            .code(2)
            .stderr("Error: [AUTH_FAILED] Invalid token\n");
        demo()
            .args(["auth", "--token", "letmein"])
            .assert()
            .success()
            .stdout("✓ Authenticated\n");
    }

    #[test]
    fn plain_failure() {
        demo()
            .arg("fail")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error: database connection refused"));
    }

    #[test]
    fn panic_is_reported_as_unknown() {
        demo()
            .arg("crash")
            .assert()
            .code(1)
            .stderr("An unknown error occurred\n");
    }

    #[test]
    fn quiet_panic_leaves_stderr_empty() {
        demo().args(["-q", "crash"]).assert().code(1).stderr("");
    }

    #[test]
    fn debug_panic_adds_detail_without_backtrace() {
        demo()
            .args(["crash", "meltdown", "--debug"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("An unknown error occurred\nmeltdown\n"))
            .stderr(predicate::str::contains("panicked at").not());
    }

    #[test]
    fn quiet_suppresses_error_report() {
        demo().args(["-q", "fail"]).assert().code(1).stderr("");
    }
}

// ============================================
// Global flags and plugin hooks
// ============================================

mod global_flags {
    use super::*;

    #[test]
    fn debug_enables_audit_lines() {
        demo()
            .args(["--debug", "greet"])
            .assert()
            .success()
            .stdout("Hello, world!\n")
            .stderr(predicate::str::contains("audit: running greet"))
            .stderr(predicate::str::contains("audit: finished greet"));
    }

    #[test]
    fn audit_lines_hidden_without_debug() {
        demo()
            .arg("greet")
            .assert()
            .success()
            .stderr(predicate::str::contains("audit:").not());
    }

    #[test]
    fn debug_reports_failures_through_error_hook() {
        demo()
            .args(["fail", "--debug"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("audit: failed with Failure"));
    }

    #[test]
    fn global_flags_are_taken_after_double_dash() {
        demo()
            .args(["greet", "--", "--debug"])
            .assert()
            .success()
            .stdout("Hello, world!\n")
            .stderr(predicate::str::contains("audit: running greet"));
    }

    #[test]
    fn other_options_after_double_dash_are_positional() {
        demo().args(["greet", "--", "-n"]).assert().success().stdout("Hello, -n!\n");
    }
}

// ============================================
// Configuration file
// ============================================

mod config {
    use super::*;

    #[test]
    fn name_and_version_from_config() {
        let file = config_file("name = \"acme\"\nversion = \"9.9.9\"\n");
        demo()
            .env("CLIFW_CONFIG", file.path())
            .arg("--version")
            .assert()
            .success()
            .stdout("acme 9.9.9\n");
    }

    #[test]
    fn disabled_builtins() {
        let file = config_file("name = \"acme\"\nbuiltin_commands = false\n");
        demo()
            .env("CLIFW_CONFIG", file.path())
            .arg("help")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Command \"help\" not found."));
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let file = config_file("name = [not toml");
        demo()
            .env("CLIFW_CONFIG", file.path())
            .arg("--version")
            .assert()
            .success()
            .stdout("cli 0.0.0\n");
    }
}
