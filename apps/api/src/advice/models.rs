use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    InitialAdvice,
    FinancialCheck,
}

impl RequestType {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "initial_advice" => Some(RequestType::InitialAdvice),
            "financial_check" => Some(RequestType::FinancialCheck),
            _ => None,
        }
    }
}

/// Request body as posted by the client. Values stay untyped until
/// `validate` so that form-style strings and falsy values can be judged
/// the same way the browser client sends them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAdviceRequest {
    pub age: Option<Value>,
    pub income: Option<Value>,
    pub loan_amount: Option<Value>,
    pub loan_term: Option<Value>,
    pub request_type: Option<Value>,
}

/// A validated application. Monetary amounts are VND.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub age: u32,
    /// Monthly income.
    pub income: f64,
    pub loan_amount: f64,
    /// Years.
    pub loan_term: u32,
    pub request_type: RequestType,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Invalid request type")]
    InvalidRequestType,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl RawAdviceRequest {
    /// Parses a request body. An empty body is treated as an empty object.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
    }

    pub fn validate(self) -> Result<AdviceRequest, ValidationError> {
        let fields: [(&'static str, &Option<Value>); 5] = [
            ("age", &self.age),
            ("income", &self.income),
            ("loanAmount", &self.loan_amount),
            ("loanTerm", &self.loan_term),
            ("requestType", &self.request_type),
        ];

        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| match value {
                Some(v) => is_falsy(v),
                None => true,
            })
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let age = positive_whole("age", self.age.as_ref())?;
        let income = positive_number("income", self.income.as_ref())?;
        let loan_amount = positive_number("loanAmount", self.loan_amount.as_ref())?;
        let loan_term = positive_whole("loanTerm", self.loan_term.as_ref())?;

        let request_type = self
            .request_type
            .as_ref()
            .and_then(Value::as_str)
            .and_then(RequestType::from_wire)
            .ok_or(ValidationError::InvalidRequestType)?;

        Ok(AdviceRequest {
            age,
            income,
            loan_amount,
            loan_term,
            request_type,
        })
    }
}

/// null, false, 0 and "" all count as absent.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn positive_number(field: &'static str, value: Option<&Value>) -> Result<f64, ValidationError> {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidField {
        field,
        reason: "must be a number",
    })?;

    if !number.is_finite() || number <= 0.0 {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must be a positive number",
        });
    }
    Ok(number)
}

fn positive_whole(field: &'static str, value: Option<&Value>) -> Result<u32, ValidationError> {
    let number = positive_number(field, value)?;
    if number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must be a whole number",
        });
    }
    Ok(number as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAdviceRequest {
        serde_json::from_value(value).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "age": 30,
            "income": 20000000,
            "loanAmount": 2000000000,
            "loanTerm": 20,
            "requestType": "financial_check"
        })
    }

    #[test]
    fn test_valid_request() {
        let req = raw(valid_body()).validate().unwrap();
        assert_eq!(
            req,
            AdviceRequest {
                age: 30,
                income: 20_000_000.0,
                loan_amount: 2_000_000_000.0,
                loan_term: 20,
                request_type: RequestType::FinancialCheck,
            }
        );
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let req = raw(json!({
            "age": "45",
            "income": "35000000.5",
            "loanAmount": " 1500000000 ",
            "loanTerm": "15",
            "requestType": "initial_advice"
        }))
        .validate()
        .unwrap();
        assert_eq!(req.age, 45);
        assert_eq!(req.income, 35_000_000.5);
        assert_eq!(req.loan_amount, 1_500_000_000.0);
        assert_eq!(req.request_type, RequestType::InitialAdvice);
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in ["age", "income", "loanAmount", "loanTerm", "requestType"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let err = raw(body).validate().unwrap_err();
            assert_eq!(err, ValidationError::MissingFields(vec![field]), "{field}");
        }
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        let err = raw(json!({
            "age": 0,
            "income": "",
            "loanAmount": null,
            "loanTerm": false,
            "requestType": ""
        }))
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "age",
                "income",
                "loanAmount",
                "loanTerm",
                "requestType"
            ])
        );
        assert!(err.to_string().starts_with("Missing required fields"));
    }

    #[test]
    fn test_missing_fields_message_lists_names() {
        let err = raw(json!({ "age": 30, "income": 1, "requestType": "initial_advice" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: loanAmount, loanTerm");
    }

    #[test]
    fn test_unknown_request_type() {
        let mut body = valid_body();
        body["requestType"] = json!("refinance");
        assert_eq!(
            raw(body).validate().unwrap_err(),
            ValidationError::InvalidRequestType
        );
    }

    #[test]
    fn test_non_string_request_type_is_invalid() {
        let mut body = valid_body();
        body["requestType"] = json!(1);
        assert_eq!(
            raw(body).validate().unwrap_err(),
            ValidationError::InvalidRequestType
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut body = valid_body();
        body["loanAmount"] = json!(-5);
        assert_eq!(
            raw(body).validate().unwrap_err(),
            ValidationError::InvalidField {
                field: "loanAmount",
                reason: "must be a positive number"
            }
        );
    }

    #[test]
    fn test_fractional_term_rejected() {
        let mut body = valid_body();
        body["loanTerm"] = json!(12.5);
        assert!(matches!(
            raw(body).validate().unwrap_err(),
            ValidationError::InvalidField { field: "loanTerm", .. }
        ));
    }

    #[test]
    fn test_garbage_string_rejected() {
        let mut body = valid_body();
        body["income"] = json!("a lot");
        assert_eq!(
            raw(body).validate().unwrap_err(),
            ValidationError::InvalidField {
                field: "income",
                reason: "must be a number"
            }
        );
    }

    #[test]
    fn test_empty_body_is_all_missing() {
        let err = RawAdviceRequest::from_body(b"  ").unwrap().validate().unwrap_err();
        assert!(matches!(err, ValidationError::MissingFields(f) if f.len() == 5));
    }

    #[test]
    fn test_malformed_body_is_validation_error() {
        let err = RawAdviceRequest::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Invalid JSON body")));
    }
}
