use std::fmt;

use crate::error::FetchError;

const PUBLIC_KEY_LENGTH: usize = 32;

/// Wallet address as provided by the user. Nothing is checked until `validate` is called.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account(String);

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Account {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trims every entry and skips the blank ones.
    pub fn parse_list<I, S>(lines: I) -> Vec<Account>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .map(Account)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        let invalid = || FetchError::InvalidFormat {
            account: self.0.to_string(),
        };

        let bytes = bs58::decode(&self.0).into_vec().map_err(|_| invalid())?;

        if bytes.len() == PUBLIC_KEY_LENGTH {
            Ok(())
        } else {
            Err(invalid())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_skips_blank_lines() {
        let accounts = Account::parse_list(vec!["  A ", "", "   ", "B", "\tC\r"]);

        assert_eq!(
            accounts,
            vec![Account::new("A"), Account::new("B"), Account::new("C")]
        );
    }

    #[test]
    fn accepts_public_keys() {
        assert!(Account::new("11111111111111111111111111111111").validate().is_ok());
        assert!(Account::new("So11111111111111111111111111111111111111112")
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_non_base58_text() {
        let err = Account::new("invalid").validate().unwrap_err();

        assert!(matches!(err, FetchError::InvalidFormat { account } if account == "invalid"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Account::new("1111").validate().is_err());
        assert!(Account::new("").validate().is_err());
    }
}
