//! Supplier and driver registration.

use crate::api::RegistryStore;
use crate::error::{CoreError, CoreResult};
use crate::ids::parse_register_id;
use crate::models::{Driver, NewDriver, NewSupplier, Supplier};

fn require(fields: &[(&str, &str)]) -> CoreResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Please fill in all required fields (missing: {}).",
            missing.join(", ")
        )))
    }
}

pub fn validate_supplier(input: &NewSupplier, existing: &[Supplier]) -> CoreResult<NewSupplier> {
    require(&[
        ("register id", &input.id),
        ("full name", &input.full_name),
        ("address", &input.address),
        ("contact number", &input.contact_no),
        ("account number", &input.account_number),
        ("bank name", &input.bank_name),
        ("branch", &input.branch),
        ("email", &input.email),
        ("username", &input.username),
        ("password", &input.password),
    ])?;
    let id = parse_register_id(&input.id, "supplier id")?;
    let email = input.email.trim();
    if existing.iter().any(|s| s.id.trim() == id) {
        return Err(CoreError::validation(format!("Supplier {} already exists", id)));
    }
    if existing.iter().any(|s| s.email.trim().eq_ignore_ascii_case(email)) {
        return Err(CoreError::validation(format!("Email {} is already registered", email)));
    }
    Ok(NewSupplier {
        id,
        full_name: input.full_name.trim().to_string(),
        address: input.address.trim().to_string(),
        contact_no: input.contact_no.trim().to_string(),
        account_number: input.account_number.trim().to_string(),
        bank_name: input.bank_name.trim().to_string(),
        branch: input.branch.trim().to_string(),
        email: email.to_string(),
        username: input.username.trim().to_string(),
        password: input.password.clone(),
    })
}

pub fn validate_driver(input: &NewDriver, existing: &[Driver]) -> CoreResult<NewDriver> {
    require(&[
        ("register id", &input.id),
        ("full name", &input.full_name),
        ("contact number", &input.contact_number),
        ("email", &input.email),
        ("vehicle number", &input.vehicle_number),
        ("route", &input.route),
        ("serial code", &input.serial_code),
    ])?;
    let id = parse_register_id(&input.id, "driver id")?;
    let email = input.email.trim();
    let route = input.route.trim();
    if existing.iter().any(|d| d.id.trim() == id) {
        return Err(CoreError::validation(format!("Driver {} already exists", id)));
    }
    if existing.iter().any(|d| d.email.trim().eq_ignore_ascii_case(email)) {
        return Err(CoreError::validation(format!("Email {} is already registered", email)));
    }
    if existing.iter().any(|d| d.route.trim().eq_ignore_ascii_case(route)) {
        return Err(CoreError::validation(format!("Route {} already has a driver", route)));
    }
    Ok(NewDriver {
        id,
        full_name: input.full_name.trim().to_string(),
        contact_number: input.contact_number.trim().to_string(),
        email: email.to_string(),
        vehicle_number: input.vehicle_number.trim().to_string(),
        route: route.to_string(),
        serial_code: input.serial_code.trim().to_string(),
    })
}

pub async fn add_supplier<S: RegistryStore + ?Sized>(
    store: &S,
    input: &NewSupplier,
    existing: &[Supplier],
) -> CoreResult<()> {
    let input = validate_supplier(input, existing)?;
    store.create_supplier(&input).await?;
    tracing::info!("supplier {} added", input.id);
    Ok(())
}

pub async fn add_driver<S: RegistryStore + ?Sized>(
    store: &S,
    input: &NewDriver,
    existing: &[Driver],
) -> CoreResult<()> {
    let input = validate_driver(input, existing)?;
    store.create_driver(&input).await?;
    tracing::info!("driver {} added", input.id);
    Ok(())
}

/// Delete a supplier. The backend refuses while collections or ledgers still reference it;
/// that refusal is reported in operator terms.
pub async fn delete_supplier<S: RegistryStore + ?Sized>(store: &S, id: &str) -> CoreResult<()> {
    let id = parse_register_id(id, "supplier id")?;
    match store.delete_supplier(&id).await {
        Ok(()) => {
            tracing::info!("supplier {} deleted", id);
            Ok(())
        }
        Err(CoreError::Write { status, message }) if message.contains("REFERENCE constraint") => {
            Err(CoreError::Write {
                status,
                message: "Cannot delete supplier because related collections or data exist. \
                          Please remove related data first."
                    .to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRegistryStore;

    fn new_supplier(id: &str, email: &str) -> NewSupplier {
        NewSupplier {
            id: id.to_string(),
            full_name: "Nimal Perera".to_string(),
            address: "Hill Road".to_string(),
            contact_no: "0771234567".to_string(),
            account_number: "123".to_string(),
            bank_name: "BOC".to_string(),
            branch: "Kandy".to_string(),
            email: email.to_string(),
            username: "nimal".to_string(),
            password: "secret".to_string(),
        }
    }

    fn supplier(id: &str, email: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            full_name: String::new(),
            address: String::new(),
            contact_no: String::new(),
            account_number: String::new(),
            bank_name: String::new(),
            branch: String::new(),
            email: email.to_string(),
            username: String::new(),
        }
    }

    #[test]
    fn missing_fields_are_listed() {
        let mut input = new_supplier("S9", "a@b.lk");
        input.password.clear();
        input.branch = "  ".to_string();
        let err = validate_supplier(&input, &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("branch") && msg.contains("password"), "{}", msg);
    }

    #[test]
    fn duplicate_id_or_email_rejected() {
        let existing = vec![supplier("S1", "nimal@tea.lk")];
        assert!(validate_supplier(&new_supplier("S1", "x@tea.lk"), &existing).is_err());
        assert!(validate_supplier(&new_supplier("S2", "NIMAL@tea.lk"), &existing).is_err());
        assert!(validate_supplier(&new_supplier("S2", "other@tea.lk"), &existing).is_ok());
    }

    #[test]
    fn duplicate_route_rejected_for_drivers() {
        let existing = vec![Driver {
            id: "D1".to_string(),
            full_name: "Kamal".to_string(),
            contact_number: String::new(),
            email: "kamal@tea.lk".to_string(),
            vehicle_number: String::new(),
            route: "Route A".to_string(),
            serial_code: String::new(),
            latitude: None,
            longitude: None,
            status: String::new(),
            last_updated: None,
        }];
        let input = NewDriver {
            id: "D2".to_string(),
            full_name: "Sunil".to_string(),
            contact_number: "0779999999".to_string(),
            email: "sunil@tea.lk".to_string(),
            vehicle_number: "WP-1234".to_string(),
            route: "route a".to_string(),
            serial_code: "SN-2".to_string(),
        };
        assert!(validate_driver(&input, &existing).is_err());
        let ok = NewDriver { route: "Route B".to_string(), ..input };
        assert!(validate_driver(&ok, &existing).is_ok());
    }

    #[tokio::test]
    async fn invalid_supplier_never_reaches_store() {
        let mut store = MockRegistryStore::new();
        store.expect_create_supplier().never();
        let err = add_supplier(&store, &NewSupplier::default(), &[]).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn reference_constraint_is_explained() {
        let mut store = MockRegistryStore::new();
        store.expect_delete_supplier().returning(|_| {
            Err(CoreError::Write {
                status: 500,
                message: "Failed to delete supplier: The DELETE statement conflicted with the REFERENCE constraint".to_string(),
            })
        });
        let err = delete_supplier(&store, "S1").await.unwrap_err();
        assert!(err.to_string().contains("related collections"));
    }
}
