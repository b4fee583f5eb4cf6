use serde::{Deserialize, Serialize};

use lomartex_core::{ClientId, DomainError, DomainResult, Entity};

/// Postal address of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Address {
    /// Ordered `(field name, value)` pairs, used for required-field checks.
    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("address.street", &self.street),
            ("address.postalCode", &self.postal_code),
            ("address.city", &self.city),
            ("address.state", &self.state),
            ("address.country", &self.country),
        ]
    }
}

/// Client record.
///
/// Missing string fields deserialize as empty strings so partially filled
/// form snapshots (and the copy embedded in a packing list) stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: Some(address),
        }
    }

    /// Full validation applied before a client is persisted: every contact
    /// and address field is required.
    pub fn validate(&self) -> DomainResult<()> {
        let contact = [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ];
        for (field, value) in contact {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }

        let address = self
            .address
            .as_ref()
            .ok_or_else(|| DomainError::validation("address is required"))?;
        for (field, value) in address.fields() {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    /// Case-insensitive substring match on name or email.
    ///
    /// An empty (or whitespace-only) query matches every client.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sort clients for listing: name ascending (case-insensitive), id as tiebreak.
pub fn sort_by_name(clients: &mut [Client]) {
    clients.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_address() -> Address {
        Address {
            street: "Rua das Flores 12".to_string(),
            postal_code: "4000-123".to_string(),
            city: "Porto".to_string(),
            state: "Porto".to_string(),
            country: "Portugal".to_string(),
        }
    }

    fn test_client(name: &str, email: &str) -> Client {
        Client::new(name, email, "+351 900 000 000", test_address())
    }

    #[test]
    fn complete_client_passes_validation() {
        assert!(test_client("Acme Apparel", "orders@acme.test").validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let client = test_client("   ", "orders@acme.test");
        match client.validate().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn missing_address_is_rejected() {
        let mut client = test_client("Acme", "orders@acme.test");
        client.address = None;
        assert_eq!(
            client.validate().unwrap_err(),
            DomainError::validation("address is required")
        );
    }

    #[test]
    fn blank_address_field_names_the_field() {
        let mut client = test_client("Acme", "orders@acme.test");
        if let Some(address) = client.address.as_mut() {
            address.postal_code = String::new();
        }
        match client.validate().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("address.postalCode")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let client = test_client("Acme Apparel", "Orders@Northwind.test");
        assert!(client.matches("acme"));
        assert!(client.matches("APPAREL"));
        assert!(client.matches("northwind"));
        assert!(client.matches(""));
        assert!(!client.matches("globex"));
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let mut clients = vec![
            test_client("zeta", "z@test"),
            test_client("Alpha", "a@test"),
            test_client("beta", "b@test"),
        ];
        sort_by_name(&mut clients);
        let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn partial_json_degrades_to_empty_strings() {
        let client: Client = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(client.name, "Acme");
        assert_eq!(client.email, "");
        assert!(client.address.is_none());

        let client: Client =
            serde_json::from_str(r#"{"name":"Acme","address":{"city":"Braga"}}"#).unwrap();
        let address = client.address.unwrap();
        assert_eq!(address.city, "Braga");
        assert_eq!(address.street, "");
    }

    proptest! {
        #[test]
        fn any_substring_of_the_name_matches(name in "[a-zA-Z ]{1,24}", start in 0usize..24, len in 1usize..8) {
            let client = test_client(&name, "x@test");
            let chars: Vec<char> = name.chars().collect();
            let start = start.min(chars.len() - 1);
            let end = (start + len).min(chars.len());
            let needle: String = chars[start..end].iter().collect();
            prop_assert!(client.matches(&needle.to_uppercase()));
        }
    }
}
