use thiserror::Error;

use crate::record::{Amount, Units};

/// One named contract operation with its parsed arguments.
///
/// The ledger host hands the core an operation name plus ordered string
/// arguments; numeric arguments arrive as decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateUser {
        investor_id: String,
        balance: Amount,
    },
    RegisterAsset {
        isin: String,
        company_name: String,
        asset_type: String,
        total_units: Units,
        price_per_unit: Amount,
    },
    SubscribeAsset {
        investor_id: String,
        isin: String,
        units: Units,
    },
    RedeemAsset {
        investor_id: String,
        isin: String,
        units: Units,
    },
    GetPortfolio {
        investor_id: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationParseError {
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error("{name} expects {expected} arguments, got {got}")]
    WrongArgumentCount {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("`{0}` is not a valid integer")]
    InvalidInteger(String),
    #[error("investor identifier must not be empty")]
    EmptyIdentifier,
}

impl Operation {
    pub fn parse(name: &str, args: &[String]) -> Result<Self, OperationParseError> {
        match name {
            "CreateUser" => {
                expect_args("CreateUser", args, 2)?;
                if args[0].is_empty() {
                    return Err(OperationParseError::EmptyIdentifier);
                }
                Ok(Self::CreateUser {
                    investor_id: args[0].clone(),
                    balance: parse_int(&args[1])?,
                })
            }
            "RegisterAsset" => {
                expect_args("RegisterAsset", args, 5)?;
                Ok(Self::RegisterAsset {
                    isin: args[0].clone(),
                    company_name: args[1].clone(),
                    asset_type: args[2].clone(),
                    total_units: parse_int(&args[3])?,
                    price_per_unit: parse_int(&args[4])?,
                })
            }
            "SubscribeAsset" => {
                expect_args("SubscribeAsset", args, 3)?;
                Ok(Self::SubscribeAsset {
                    investor_id: args[0].clone(),
                    isin: args[1].clone(),
                    units: parse_int(&args[2])?,
                })
            }
            "RedeemAsset" => {
                expect_args("RedeemAsset", args, 3)?;
                Ok(Self::RedeemAsset {
                    investor_id: args[0].clone(),
                    isin: args[1].clone(),
                    units: parse_int(&args[2])?,
                })
            }
            "GetPortfolio" => {
                expect_args("GetPortfolio", args, 1)?;
                Ok(Self::GetPortfolio {
                    investor_id: args[0].clone(),
                })
            }
            other => Err(OperationParseError::UnknownOperation(other.to_string())),
        }
    }
}

fn expect_args(
    name: &'static str,
    args: &[String],
    expected: usize,
) -> Result<(), OperationParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(OperationParseError::WrongArgumentCount {
            name,
            expected,
            got: args.len(),
        })
    }
}

fn parse_int(value: &str) -> Result<i64, OperationParseError> {
    value
        .parse()
        .map_err(|_| OperationParseError::InvalidInteger(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_every_operation() {
        let op = Operation::parse("CreateUser", &args(&["investor1", "10000"])).unwrap();
        assert_eq!(
            op,
            Operation::CreateUser {
                investor_id: "investor1".to_string(),
                balance: 10000
            }
        );

        let op = Operation::parse(
            "RegisterAsset",
            &args(&["US1234567890", "Tech Corp", "Equity", "1000", "50"]),
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::RegisterAsset {
                isin: "US1234567890".to_string(),
                company_name: "Tech Corp".to_string(),
                asset_type: "Equity".to_string(),
                total_units: 1000,
                price_per_unit: 50,
            }
        );

        let op = Operation::parse(
            "SubscribeAsset",
            &args(&["investor1", "US1234567890", "100"]),
        )
        .unwrap();
        assert!(matches!(op, Operation::SubscribeAsset { units: 100, .. }));

        let op =
            Operation::parse("RedeemAsset", &args(&["investor1", "US1234567890", "50"])).unwrap();
        assert!(matches!(op, Operation::RedeemAsset { units: 50, .. }));

        let op = Operation::parse("GetPortfolio", &args(&["investor1"])).unwrap();
        assert!(matches!(op, Operation::GetPortfolio { .. }));
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = Operation::parse("TransferAsset", &args(&["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            OperationParseError::UnknownOperation("TransferAsset".to_string())
        );
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let err = Operation::parse("SubscribeAsset", &args(&["investor1"])).unwrap_err();
        assert_eq!(
            err,
            OperationParseError::WrongArgumentCount {
                name: "SubscribeAsset",
                expected: 3,
                got: 1
            }
        );
        assert_eq!(err.to_string(), "SubscribeAsset expects 3 arguments, got 1");
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        let err = Operation::parse("CreateUser", &args(&["investor1", "lots"])).unwrap_err();
        assert_eq!(err, OperationParseError::InvalidInteger("lots".to_string()));
    }

    #[test]
    fn rejects_empty_investor_id() {
        let err = Operation::parse("CreateUser", &args(&["", "100"])).unwrap_err();
        assert_eq!(err, OperationParseError::EmptyIdentifier);
    }
}
