//! Type-safe enumerations for the fixed-choice project fields.
//!
//! The store file keeps these as plain strings; the enums pin the accepted
//! values at the type level and own the conversion in both directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Service offered for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    /// Print design work: business cards or a flyer.
    #[serde(rename = "Business cards/flyer")]
    BusinessCardsOrFlyer,
    /// Website build.
    #[serde(rename = "Web Development")]
    WebDevelopment,
}

impl Service {
    /// Returns the string stored in the `Services` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::BusinessCardsOrFlyer => "Business cards/flyer",
            Service::WebDevelopment => "Web Development",
        }
    }

    /// All services, in form-display order.
    pub const ALL: [Service; 2] = [Service::BusinessCardsOrFlyer, Service::WebDevelopment];
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Service {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Business cards/flyer" => Ok(Service::BusinessCardsOrFlyer),
            "Web Development" => Ok(Service::WebDevelopment),
            other => Err(ModelError::UnknownService(other.to_string())),
        }
    }
}

/// How the client paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferMethod {
    Account,
    Cash,
}

impl TransferMethod {
    /// Returns the string stored in the `Transfer Method` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferMethod::Account => "Account",
            TransferMethod::Cash => "Cash",
        }
    }

    /// All transfer methods, in form-display order.
    pub const ALL: [TransferMethod; 2] = [TransferMethod::Account, TransferMethod::Cash];
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Account" => Ok(TransferMethod::Account),
            "Cash" => Ok(TransferMethod::Cash),
            other => Err(ModelError::UnknownTransferMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_round_trips_through_str() {
        for service in Service::ALL {
            assert_eq!(service.as_str().parse::<Service>().unwrap(), service);
        }
    }

    #[test]
    fn service_rejects_unknown() {
        let err = "Logo Design".parse::<Service>().unwrap_err();
        assert_eq!(err, ModelError::UnknownService("Logo Design".to_string()));
    }

    #[test]
    fn transfer_method_round_trips_through_str() {
        for method in TransferMethod::ALL {
            assert_eq!(method.as_str().parse::<TransferMethod>().unwrap(), method);
        }
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&Service::BusinessCardsOrFlyer).unwrap();
        assert_eq!(json, "\"Business cards/flyer\"");
        let back: Service = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Service::BusinessCardsOrFlyer);
    }
}
