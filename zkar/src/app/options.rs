use std::path::PathBuf;

use clap::{crate_description, crate_version, value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};

use serz::stream::parser::DecodeOptions;

use crate::app::error::RuntimeError;

// CLI Arg Names
pub const SUBCOMMAND_DUMP: &str = "dump";
pub const SUBCOMMAND_GENERATE: &str = "generate";
pub const OPTION_FILE: &str = "file";
pub const OPTION_BASE64: &str = "base64";
pub const OPTION_JDK8U20: &str = "jdk8u20";
pub const OPTION_GOLANG: &str = "golang";
pub const OPTION_MAX_DEPTH: &str = "max-depth";
pub const OPTION_OUTPUT: &str = "output";
pub const OPTION_LIST: &str = "list";

/// Where the serialized bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Read the bytes from a file on disk
    File(PathBuf),
    /// Decode the bytes from a base64 string
    Base64(String),
}

/// Settings for the `dump` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: Input,
    /// The stream has no header, as jdk8u20 gadget payloads do
    pub jdk8u20: bool,
    /// Emit Go struct declarations instead of the record tree
    pub golang: bool,
    /// Limits applied while decoding
    pub decode_options: DecodeOptions,
}

/// What the user asked us to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dump(Options),
    Generate,
}

impl Action {
    pub fn from_args(args: &ArgMatches) -> Result<Self, RuntimeError> {
        match args.subcommand() {
            Some((SUBCOMMAND_DUMP, dump_args)) => Ok(Action::Dump(Options::from_args(dump_args)?)),
            Some((SUBCOMMAND_GENERATE, _)) => Ok(Action::Generate),
            _ => Err(RuntimeError::InvalidOptions(format!(
                "Expected one of `{SUBCOMMAND_DUMP}` or `{SUBCOMMAND_GENERATE}`"
            ))),
        }
    }
}

impl Options {
    pub fn from_args(args: &ArgMatches) -> Result<Self, RuntimeError> {
        let file = args.get_one::<PathBuf>(OPTION_FILE);
        let base64 = args.get_one::<String>(OPTION_BASE64);
        let jdk8u20 = args.get_flag(OPTION_JDK8U20);
        let golang = args.get_flag(OPTION_GOLANG);
        let max_depth = args.get_one::<usize>(OPTION_MAX_DEPTH).copied();

        let input = match (file, base64) {
            (Some(path), None) => Input::File(path.clone()),
            (None, Some(data)) => Input::Base64(data.clone()),
            _ => {
                return Err(RuntimeError::InvalidOptions(format!(
                    "Exactly one of `--{OPTION_FILE}` or `--{OPTION_BASE64}` is required"
                )))
            }
        };

        let mut decode_options = DecodeOptions::default();
        if let Some(max_depth) = max_depth {
            if max_depth == 0 {
                return Err(RuntimeError::InvalidOptions(format!(
                    "`--{OPTION_MAX_DEPTH}` must be at least 1"
                )));
            }
            decode_options.max_depth = max_depth;
        }

        Ok(Options {
            input,
            jdk8u20,
            golang,
            decode_options,
        })
    }
}

/// Build the command line interface
pub fn get_command() -> Command {
    Command::new("zkar")
        .version(crate_version!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(SUBCOMMAND_DUMP)
                .about("Decode a serialization stream and print it")
                .arg(
                    Arg::new(OPTION_FILE)
                        .short('f')
                        .long(OPTION_FILE)
                        .help("Path to a file containing the serialized data")
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf))
                        .display_order(0),
                )
                .arg(
                    Arg::new(OPTION_BASE64)
                        .short('B')
                        .long(OPTION_BASE64)
                        .help("The serialized data, encoded as standard base64")
                        .value_name("DATA")
                        .display_order(1),
                )
                .arg(
                    Arg::new(OPTION_JDK8U20)
                        .long(OPTION_JDK8U20)
                        .help("The data is a header-less jdk8u20 payload")
                        .action(ArgAction::SetTrue)
                        .display_order(2),
                )
                .arg(
                    Arg::new(OPTION_GOLANG)
                        .long(OPTION_GOLANG)
                        .help("Print Go struct declarations for the classes in the stream")
                        .action(ArgAction::SetTrue)
                        .display_order(3),
                )
                .arg(
                    Arg::new(OPTION_MAX_DEPTH)
                        .long(OPTION_MAX_DEPTH)
                        .help("How deeply records may nest before decoding fails")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .display_order(4),
                )
                .group(
                    ArgGroup::new("input")
                        .args([OPTION_FILE, OPTION_BASE64])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(SUBCOMMAND_GENERATE)
                .about("Generate a payload (not implemented)")
                .arg(
                    Arg::new(OPTION_OUTPUT)
                        .short('o')
                        .long(OPTION_OUTPUT)
                        .help("Where to write the generated payload")
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new(OPTION_LIST)
                        .short('l')
                        .long(OPTION_LIST)
                        .help("List the available payloads")
                        .action(ArgAction::SetTrue),
                ),
        )
}

#[cfg(test)]
mod arg_tests {
    use std::path::PathBuf;

    use serz::stream::parser::DecodeOptions;

    use crate::app::options::{get_command, Action, Input, Options};

    fn action(args: &[&str]) -> Action {
        let matches = get_command().try_get_matches_from(args).unwrap();
        Action::from_args(&matches).unwrap()
    }

    #[test]
    fn can_parse_file_dump() {
        assert_eq!(
            action(&["zkar", "dump", "-f", "payload.ser"]),
            Action::Dump(Options {
                input: Input::File(PathBuf::from("payload.ser")),
                jdk8u20: false,
                golang: false,
                decode_options: DecodeOptions::default(),
            })
        );
    }

    #[test]
    fn can_parse_base64_dump_with_flags() {
        assert_eq!(
            action(&[
                "zkar",
                "dump",
                "--base64",
                "rO0ABXA=",
                "--jdk8u20",
                "--golang",
                "--max-depth",
                "16"
            ]),
            Action::Dump(Options {
                input: Input::Base64("rO0ABXA=".to_string()),
                jdk8u20: true,
                golang: true,
                decode_options: DecodeOptions { max_depth: 16 },
            })
        );
    }

    #[test]
    fn can_parse_generate() {
        assert_eq!(action(&["zkar", "generate", "-l"]), Action::Generate);
    }

    #[test]
    fn cant_dump_two_inputs() {
        assert!(get_command()
            .try_get_matches_from(["zkar", "dump", "-f", "a.ser", "-B", "rO0ABXA="])
            .is_err());
    }

    #[test]
    fn cant_dump_without_input() {
        assert!(get_command()
            .try_get_matches_from(["zkar", "dump"])
            .is_err());
    }

    #[test]
    fn cant_use_zero_depth() {
        let matches = get_command()
            .try_get_matches_from(["zkar", "dump", "-B", "rO0ABXA=", "--max-depth", "0"])
            .unwrap();
        assert!(Action::from_args(&matches).is_err());
    }
}
