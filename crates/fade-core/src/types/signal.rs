//! Trade direction, signal, and stop-mode enumerations.

use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Get the opposite side, used when flattening a position.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// Outcome of a signal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    None,
    Long,
    Short,
}

impl TradeSignal {
    /// Trade side for an actionable signal, `None` for `TradeSignal::None`.
    pub fn side(&self) -> Option<Side> {
        match self {
            TradeSignal::None => None,
            TradeSignal::Long => Some(Side::Long),
            TradeSignal::Short => Some(Side::Short),
        }
    }
}

impl From<Side> for TradeSignal {
    fn from(side: Side) -> Self {
        match side {
            Side::Long => TradeSignal::Long,
            Side::Short => TradeSignal::Short,
        }
    }
}

/// How stop-loss/take-profit parameters are interpreted when deriving
/// absolute price levels from an entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    /// Fraction of entry price (0.01 = 1%)
    Percent,
    /// Absolute price offset
    Price,
    /// Offset against position notional (entry * lots); requires lot size
    Value,
    /// Offset in instrument tick units; requires tick size
    Tick,
}

impl std::fmt::Display for StopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopMode::Percent => write!(f, "Percent"),
            StopMode::Price => write!(f, "Price"),
            StopMode::Value => write!(f, "Value"),
            StopMode::Tick => write!(f, "Tick"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Long.opposite(), Side::Short);
        assert_eq!(Side::Short.opposite(), Side::Long);
    }

    #[test]
    fn test_signal_side() {
        assert_eq!(TradeSignal::None.side(), None);
        assert_eq!(TradeSignal::Long.side(), Some(Side::Long));
        assert_eq!(TradeSignal::from(Side::Short), TradeSignal::Short);
    }
}
