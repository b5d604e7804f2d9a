use alloc::borrow::Cow;
use core::{fmt, num::NonZeroU32};

/// What a test callback returns. `Ok(())` is a pass.
pub type TestResult = Result<(), Failure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureLocation {
    pub file: &'static str,
    pub line: u32,
}

/// A failed test.
///
/// `count` is what the failure contributes to the run's failure total, one unless
/// a test explicitly reports more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    count: NonZeroU32,
    location: Option<FailureLocation>,
    message: Cow<'static, str>,
}

impl Failure {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            count: NonZeroU32::MIN,
            location: None,
            message: message.into(),
        }
    }

    pub fn at(file: &'static str, line: u32, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            location: Some(FailureLocation { file, line }),
            ..Self::new(message)
        }
    }

    pub fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = count;
        self
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn location(&self) -> Option<FailureLocation> {
        self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(FailureLocation { file, line }) => write!(f, "{}:{}: {}", file, line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_default_count_is_one() {
        assert_eq!(Failure::new("boom").count(), 1);
    }

    #[test]
    fn test_with_count() {
        let failure = Failure::new("boom").with_count(NonZeroU32::new(3).unwrap());
        assert_eq!(failure.count(), 3);
    }

    #[test]
    fn test_display_with_location() {
        let failure = Failure::at("src/lib.rs", 12, "failed assertion: 1 == 2");

        assert_eq!(failure.to_string(), "src/lib.rs:12: failed assertion: 1 == 2");
        assert_eq!(
            failure.location(),
            Some(FailureLocation {
                file: "src/lib.rs",
                line: 12
            })
        );
    }

    #[test]
    fn test_display_without_location() {
        let failure = Failure::new(alloc::format!("panicked: {}", "oops"));

        assert_eq!(failure.to_string(), "panicked: oops");
        assert_eq!(failure.message(), "panicked: oops");
        assert!(failure.location().is_none());
    }
}
