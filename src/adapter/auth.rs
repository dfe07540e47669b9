//! Login payload normalization

use serde_json::Value;

use super::Fields;

/// Token and user type from a login or OTP response `data`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginData {
    pub token: Option<String>,
    pub user_type: Option<String>,
}

pub fn login_data(data: &Value) -> LoginData {
    let f = Fields::new(data);
    LoginData {
        token: f.opt_string(&["Token", "AccessToken"]),
        user_type: f.opt_string(&["UserType", "Role"]),
    }
}
