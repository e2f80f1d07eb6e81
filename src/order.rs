use sea_orm::sea_query::Order;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering direction of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderDirection {
    /// Ascending, `"asc"`
    Ascend = 1,
    /// Descending, `"desc"`
    Descend = 2,
    /// Unordered, `"none"`
    None = 3,
}

/// Returned when a string or discriminant names no direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirectionError(&'static str);

impl fmt::Display for OrderDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for OrderDirectionError {}

impl OrderDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascend => "asc",
            Self::Descend => "desc",
            Self::None => "none",
        }
    }

    /// SQL order for this direction, `None` when the list stays unordered.
    #[must_use]
    pub fn to_order(self) -> Option<Order> {
        match self {
            Self::Ascend => Some(Order::Asc),
            Self::Descend => Some(Order::Desc),
            Self::None => None,
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = OrderDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Ascend),
            "desc" => Ok(Self::Descend),
            "none" => Ok(Self::None),
            _ => Err(OrderDirectionError("Value does not exist")),
        }
    }
}

impl TryFrom<i32> for OrderDirection {
    type Error = OrderDirectionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascend),
            2 => Ok(Self::Descend),
            3 => Ok(Self::None),
            _ => Err(OrderDirectionError("Direction does not exist")),
        }
    }
}

impl TryFrom<String> for OrderDirection {
    type Error = OrderDirectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderDirection> for String {
    fn from(direction: OrderDirection) -> Self {
        direction.as_str().to_string()
    }
}
