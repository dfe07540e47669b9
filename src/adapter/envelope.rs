//! Uniform `{ success, message, data }` response envelope

use serde_json::Value;

use super::Fields;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// `None` when the backend omitted the flag
    pub success: Option<bool>,
    pub message: Option<String>,
    /// Envelope `data`, or the whole body when there is none
    pub data: Value,
}

impl Envelope {
    pub fn from_value(body: Value) -> Self {
        let f = Fields::new(&body);
        let success = match f.get(&["Success", "IsSuccess"]) {
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => Some(f.bool(&["Success", "IsSuccess"])),
            None => None,
        };
        let message = f.opt_string(&["Message"]);
        let data = f.get(&["Data"]).cloned();

        Self {
            success,
            message,
            data: data.unwrap_or(body),
        }
    }
}

/// Error message carried by a non-2xx body, if any
pub fn error_message(body: &Value) -> Option<String> {
    let f = Fields::new(body);
    f.opt_string(&["Message", "Title", "Error"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_envelope() {
        let env = Envelope::from_value(json!({
            "success": true,
            "message": "Approved",
            "data": { "result": [] }
        }));
        assert_eq!(env.success, Some(true));
        assert_eq!(env.message.as_deref(), Some("Approved"));
        assert_eq!(env.data, json!({ "result": [] }));
    }

    #[test]
    fn test_pascal_envelope() {
        let env = Envelope::from_value(json!({ "Success": false, "Message": "Not found" }));
        assert_eq!(env.success, Some(false));
        assert_eq!(env.message.as_deref(), Some("Not found"));
    }

    #[test]
    fn test_bare_body_becomes_data() {
        let body = json!({ "result": { "items": [] } });
        let env = Envelope::from_value(body.clone());
        assert_eq!(env.success, None);
        assert_eq!(env.data, body);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(&json!({ "title": "Bad Request" })).as_deref(), Some("Bad Request"));
        assert_eq!(error_message(&json!("oops")), None);
    }
}
