use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingValueError {
  #[error("Shop name must be between 1 and {max} characters")]
  InvalidShopName { max: usize },

  #[error("Low stock threshold must be between {min} and {max}")]
  InvalidLowStockThreshold { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopName(String);

impl ShopName {
  const MAX_LENGTH: usize = 100;

  pub fn new(value: &str) -> Result<Self, SettingValueError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > Self::MAX_LENGTH {
      return Err(SettingValueError::InvalidShopName {
        max: Self::MAX_LENGTH,
      });
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockThreshold(i64);

impl LowStockThreshold {
  pub const DEFAULT: i64 = 5;
  /// A stored zero reads back as the default, so it is never accepted.
  const MIN: i64 = 1;
  const MAX: i64 = 100_000;

  pub fn new(value: i64) -> Result<Self, SettingValueError> {
    if !(Self::MIN..=Self::MAX).contains(&value) {
      return Err(SettingValueError::InvalidLowStockThreshold {
        min: Self::MIN,
        max: Self::MAX,
      });
    }
    Ok(Self(value))
  }

  /// Lenient read of the stored setting: the leading integer of the text is
  /// used, and a missing, unparsable or zero value falls back to the default.
  pub fn from_setting(raw: Option<&str>) -> i64 {
    raw
      .and_then(parse_leading_int)
      .filter(|v| *v != 0)
      .unwrap_or(Self::DEFAULT)
  }

  pub fn value(&self) -> i64 {
    self.0
  }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
  let s = raw.trim_start();
  let (sign, digits) = match s.as_bytes().first() {
    Some(b'-') => (-1, &s[1..]),
    Some(b'+') => (1, &s[1..]),
    _ => (1, s),
  };

  let end = digits
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(digits.len());
  if end == 0 {
    return None;
  }

  digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_low_stock_threshold_defaults() {
    assert_eq!(LowStockThreshold::from_setting(None), 5);
    assert_eq!(LowStockThreshold::from_setting(Some("")), 5);
    assert_eq!(LowStockThreshold::from_setting(Some("abc")), 5);
    assert_eq!(LowStockThreshold::from_setting(Some("0")), 5);
  }

  #[test]
  fn test_low_stock_threshold_parses_leading_integer() {
    assert_eq!(LowStockThreshold::from_setting(Some("12")), 12);
    assert_eq!(LowStockThreshold::from_setting(Some(" 8 items")), 8);
    assert_eq!(LowStockThreshold::from_setting(Some("3.7")), 3);
    assert_eq!(LowStockThreshold::from_setting(Some("-2")), -2);
    assert_eq!(LowStockThreshold::from_setting(Some("-")), 5);
  }

  #[test]
  fn test_accepted_threshold_reads_back_unchanged() {
    for value in [1, 5, 42, 100_000] {
      let threshold = LowStockThreshold::new(value).unwrap();
      let stored = threshold.value().to_string();
      assert_eq!(LowStockThreshold::from_setting(Some(&stored)), value);
    }
  }

  #[test]
  fn test_low_stock_threshold_range() {
    assert!(LowStockThreshold::new(1).is_ok());
    assert!(LowStockThreshold::new(100_000).is_ok());
    assert!(LowStockThreshold::new(-1).is_err());
    assert_eq!(
      LowStockThreshold::new(0).unwrap_err().to_string(),
      "Low stock threshold must be between 1 and 100000"
    );
    assert!(LowStockThreshold::new(100_001).is_err());
  }

  #[test]
  fn test_shop_name() {
    assert_eq!(ShopName::new("  Key Shop ").unwrap().value(), "Key Shop");
    assert!(ShopName::new("   ").is_err());
    assert!(ShopName::new(&"x".repeat(101)).is_err());
  }
}
