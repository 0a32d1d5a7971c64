use anyhow::Error;
use entourage_config::ConfigError;
use entourage_core::CoreError;
use entourage_notify::NotifyError;
use entourage_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    SignupFailed(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn signup_failed(message: impl Into<String>) -> Error {
    CliError::SignupFailed(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::SignupFailed(_) => EXIT_FAILURE,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if cause.downcast_ref::<NotifyError>().is_some() {
            return ExitCode::from(EXIT_FAILURE);
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidId
        | StoreErrorKind::InvalidDataPath
        | StoreErrorKind::DuplicateEmail => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::Preferences
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidBind(_)
        | ConfigError::InvalidNotificationsField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code_for, invalid_input, signup_failed};
    use anyhow::Context as _;
    use entourage_config::ConfigError;
    use entourage_store::error::StoreError;
    use std::path::PathBuf;
    use std::process::ExitCode;

    #[test]
    fn exit_codes_follow_error_chain() {
        assert_eq!(exit_code_for(&invalid_input("bad")), ExitCode::from(3));
        assert_eq!(exit_code_for(&signup_failed("nope")), ExitCode::from(1));

        let wrapped = Err::<(), _>(ConfigError::MissingConfigFile(PathBuf::from("x")))
            .context("load config")
            .unwrap_err();
        assert_eq!(exit_code_for(&wrapped), ExitCode::from(3));

        let store = anyhow::Error::new(StoreError::Migration("too new".to_string()));
        assert_eq!(exit_code_for(&store), ExitCode::from(1));
    }
}
