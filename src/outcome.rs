//! @acp:module "Outcome"
//! @acp:summary "Multi-channel result contract shared by long-running operations"
//! @acp:domain cli
//! @acp:layer model
//!
//! An operation with several anticipated results returns an [`Outcome`];
//! the caller reacts by implementing [`OutcomeHandlers`] and calling
//! [`Outcome::report`], which fires exactly one channel. Channels a caller
//! does not override fall back to [`OutcomeHandlers::error`].

use std::fmt;

/// Result of an operation, one variant per channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation completed; carries its structured result
    Success(T),
    /// Target of a generator already exists
    AlreadyExists,
    /// Working directory is not a Sails app
    NotSailsApp,
    /// `sails new` without a name or path
    MissingAppName,
    /// The framework could not be loaded or lifted
    FailedToLoadSails(String),
    /// The command exists but does nothing yet
    NotImplemented(String),
    /// Catch-all for anything unexpected
    Error(String),
}

/// Channel callbacks for an [`Outcome`]
pub trait OutcomeHandlers<T> {
    fn success(&mut self, payload: T);

    /// Catch-all; always receives a diagnostic
    fn error(&mut self, detail: String);

    fn already_exists(&mut self) {
        self.error("Target already exists".to_string());
    }

    fn not_sails_app(&mut self) {
        self.error("The current directory does not appear to be a Sails app".to_string());
    }

    fn missing_app_name(&mut self) {
        self.error("Missing app name".to_string());
    }

    fn failed_to_load_sails(&mut self, detail: String) {
        self.error(format!("Failed to load Sails: {}", detail));
    }

    fn not_implemented(&mut self, detail: String) {
        self.error(detail);
    }
}

impl<T> Outcome<T> {
    /// Catch-all outcome from any displayable fault
    pub fn error(err: impl fmt::Display) -> Self {
        Outcome::Error(err.to_string())
    }

    /// Fire the single channel matching this outcome
    pub fn report<H>(self, handlers: &mut H)
    where
        H: OutcomeHandlers<T> + ?Sized,
    {
        match self {
            Outcome::Success(payload) => handlers.success(payload),
            Outcome::AlreadyExists => handlers.already_exists(),
            Outcome::NotSailsApp => handlers.not_sails_app(),
            Outcome::MissingAppName => handlers.missing_app_name(),
            Outcome::FailedToLoadSails(detail) => handlers.failed_to_load_sails(detail),
            Outcome::NotImplemented(detail) => handlers.not_implemented(detail),
            Outcome::Error(detail) => handlers.error(detail),
        }
    }

    /// Wire name of the channel
    pub fn channel(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::AlreadyExists => "alreadyExists",
            Outcome::NotSailsApp => "notSailsApp",
            Outcome::MissingAppName => "missingAppName",
            Outcome::FailedToLoadSails(_) => "failedToLoadSails",
            Outcome::NotImplemented(_) => "notImplemented",
            Outcome::Error(_) => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(payload) => Outcome::Success(f(payload)),
            Outcome::AlreadyExists => Outcome::AlreadyExists,
            Outcome::NotSailsApp => Outcome::NotSailsApp,
            Outcome::MissingAppName => Outcome::MissingAppName,
            Outcome::FailedToLoadSails(detail) => Outcome::FailedToLoadSails(detail),
            Outcome::NotImplemented(detail) => Outcome::NotImplemented(detail),
            Outcome::Error(detail) => Outcome::Error(detail),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => Outcome::error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Only the two required channels; everything else falls back
    #[derive(Default)]
    struct Minimal {
        successes: Vec<u32>,
        errors: Vec<String>,
    }

    impl OutcomeHandlers<u32> for Minimal {
        fn success(&mut self, payload: u32) {
            self.successes.push(payload);
        }

        fn error(&mut self, detail: String) {
            self.errors.push(detail);
        }
    }

    #[test]
    fn test_success_channel() {
        let mut handlers = Minimal::default();
        Outcome::Success(7).report(&mut handlers);
        assert_eq!(handlers.successes, vec![7]);
        assert!(handlers.errors.is_empty());
    }

    #[test]
    fn test_omitted_channel_falls_back_to_error() {
        let mut handlers = Minimal::default();
        Outcome::<u32>::AlreadyExists.report(&mut handlers);
        assert_eq!(handlers.errors, vec!["Target already exists"]);

        let mut handlers = Minimal::default();
        Outcome::<u32>::FailedToLoadSails("bad config".into()).report(&mut handlers);
        assert_eq!(handlers.errors, vec!["Failed to load Sails: bad config"]);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Outcome::Success(()).channel(), "success");
        assert_eq!(Outcome::<()>::NotSailsApp.channel(), "notSailsApp");
        assert_eq!(Outcome::<()>::MissingAppName.channel(), "missingAppName");
    }

    #[test]
    fn test_from_result() {
        let ok: Outcome<u8> = Ok::<u8, String>(1).into();
        assert!(ok.is_success());
        let err: Outcome<u8> = Err::<u8, String>("nope".into()).into();
        assert_eq!(err, Outcome::Error("nope".into()));
    }
}
