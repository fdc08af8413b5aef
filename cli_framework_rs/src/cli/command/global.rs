//! Global flags recognised on every invocation.

/// Flags that apply to all commands and are stripped before command parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    /// Verbose diagnostics, debug output and error details (--debug)
    pub debug: bool,

    /// Suppress informational output and error messages (--quiet, -q)
    pub quiet: bool,

    /// Disable ANSI styling (--no-color)
    pub no_color: bool,
}

/// Pull global flags out of `args`, returning them and the remaining tokens.
///
/// The flags are matched anywhere in argv, `--` included, so they never reach
/// a command as options or positionals.
pub fn extract_global_flags(args: &[String]) -> (GlobalFlags, Vec<String>) {
    let mut flags = GlobalFlags::default();
    let mut remaining = Vec::with_capacity(args.len());

    for arg in args {
        match arg.as_str() {
            "--debug" => flags.debug = true,
            "--quiet" | "-q" => flags.quiet = true,
            "--no-color" => flags.no_color = true,
            _ => remaining.push(arg.clone()),
        }
    }

    (flags, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_flags_anywhere() {
        let (flags, rest) = extract_global_flags(&args(&["--debug", "deploy", "-q", "--env", "dev"]));
        assert!(flags.debug);
        assert!(flags.quiet);
        assert!(!flags.no_color);
        assert_eq!(rest, args(&["deploy", "--env", "dev"]));
    }

    #[test]
    fn strips_flags_after_separator_too() {
        let (flags, rest) = extract_global_flags(&args(&["run", "--", "--no-color", "-q", "file"]));
        assert_eq!(
            flags,
            GlobalFlags {
                debug: false,
                quiet: true,
                no_color: true,
            }
        );
        assert_eq!(rest, args(&["run", "--", "file"]));
    }
}
