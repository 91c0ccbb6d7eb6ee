// Command-line definitions: the clap parser and the value types its flags accept.
pub mod cmd_enums;
pub mod type_enums;
