//! Customer contact details attached to a quote request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Field-keyed error messages, one per invalid field.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("invalid contact details: {}", field_list(.0))]
pub struct ContactErrors(pub BTreeMap<&'static str, &'static str>);

fn field_list(errors: &BTreeMap<&'static str, &'static str>) -> String {
    errors.keys().copied().collect::<Vec<_>>().join(", ")
}

impl ContactDetails {
    /// Check all three fields and collect every problem found.
    pub fn validate(&self) -> Result<(), ContactErrors> {
        let mut errors = BTreeMap::new();

        for (field, value) in [("name", &self.name), ("email", &self.email), ("phone", &self.phone)] {
            if value.trim().is_empty() {
                errors.insert(field, "required");
            }
        }
        if !errors.contains_key("email") && !is_valid_email(&self.email) {
            errors.insert("email", "not a valid email address");
        }
        if !errors.contains_key("phone") && !is_valid_phone(&self.phone) {
            errors.insert("phone", "not a valid phone number");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactErrors(errors))
        }
    }
}

/// `local@domain.tld`: exactly one `@`, no whitespace, and a dot inside the
/// domain with text on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Romanian numbers: `+40` or `0` followed by nine digits. Whitespace is ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let rest = compact
        .strip_prefix("+40")
        .or_else(|| compact.strip_prefix('0'));
    match rest {
        Some(digits) => digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
