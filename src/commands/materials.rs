//! Material catalog queries.

use serde::Serialize;

use crate::catalog::MaterialCatalog;
use crate::error::AppError;
use crate::quote::{format_price, ServiceType};

/// One catalog entry as shown in the material picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialListing {
    pub service: ServiceType,
    pub id: String,
    pub name: String,
    pub price: f64,
    /// e.g. `25,00 RON/cm³` or `15,00 RON/100 cm²`.
    pub price_label: String,
    pub colors: Vec<String>,
}

/// Testable inner logic for listing materials.
///
/// With `service` set, only that technology's materials are returned.
pub fn list_materials_inner(
    catalog: &MaterialCatalog,
    service: Option<&str>,
) -> Result<Vec<MaterialListing>, AppError> {
    let services: Vec<ServiceType> = match service {
        Some(key) => vec![ServiceType::from_key(key)
            .ok_or_else(|| AppError::Request(format!("unknown service: {key}")))?],
        None => ServiceType::ALL.to_vec(),
    };

    Ok(services
        .into_iter()
        .flat_map(|s| {
            catalog.materials(s).iter().map(move |m| MaterialListing {
                service: s,
                id: m.id.clone(),
                name: m.name.clone(),
                price: m.price,
                price_label: format!("{}/{}", format_price(m.price), unit_label(s)),
                colors: m.colors.clone(),
            })
        })
        .collect())
}

fn unit_label(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Fdm | ServiceType::Sla => "cm³",
        ServiceType::LaserEngraving => "100 cm²",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_service_by_default() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let all = list_materials_inner(&catalog, None).expect("list");
        assert_eq!(all.len(), 7);
        assert_eq!(all[0].service, ServiceType::Fdm);
        assert_eq!(all[6].service, ServiceType::LaserEngraving);
    }

    #[test]
    fn filters_by_service() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let laser = list_materials_inner(&catalog, Some("laser")).expect("list");
        assert_eq!(laser.len(), 2);
        assert!(laser.iter().all(|m| m.service == ServiceType::LaserEngraving));
        assert_eq!(laser[0].price_label, "15,00 RON/100 cm²");
    }

    #[test]
    fn printing_prices_are_per_cubic_centimetre() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let fdm = list_materials_inner(&catalog, Some("fdm")).expect("list");
        assert_eq!(fdm[0].price_label, "25,00 RON/cm³");
    }

    #[test]
    fn unknown_service_is_request_error() {
        let catalog = MaterialCatalog::builtin().unwrap();
        assert!(matches!(
            list_materials_inner(&catalog, Some("cnc")),
            Err(AppError::Request(_))
        ));
    }
}
