use chrono::{NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Field;

use super::table::{Cell, RawTable};

pub const DEMO_ROWS: usize = 500;
pub const DEMO_SEED: u64 = 42;
/// Upper bound accepted from callers asking for a demo log.
pub const MAX_DEMO_ROWS: usize = 100_000;

const DEMO_TYPES: [&str; 8] = [
    "DOCUMENTO_NO_ENCONTRADO",
    "ERROR_AUTENTICACION",
    "TIMEOUT",
    "ESTUDIO_NO_DISPONIBLE",
    "PROMOCION_ERROR",
    "PACIENTE_NO_ENCONTRADO",
    "ERROR_SERVIDOR",
    "NO_CLASIFICADO",
];

const DEMO_SEVERITIES: [&str; 4] = ["CRITICA", "ALTA", "MEDIA", "BAJA"];

const DEMO_MESSAGES: [&str; 8] = [
    "El estudio 15166 DETECCIÓN DE ANTÍGENO no se encuentra activo",
    "El código de promoción 203174 no se encuentra vigente",
    "No se encontraron resultados para el entidadId solicitado",
    "El código de promoción 203088 no está asociado a la sucursal",
    "Error de autenticación: Token expirado",
    "Timeout al conectar con el servidor",
    "Paciente no encontrado en el sistema",
    "Error interno del servidor 500",
];

const DEMO_ENDPOINTS: [&str; 4] = ["GetDocument", "CreateOrder", "ValidatePromo", "GetPatient"];

/// Deterministic sample log spread over the 30 days before `reference`.
pub(crate) fn demo_table(rows: usize, seed: u64, reference: NaiveDateTime) -> RawTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = reference.date().and_time(chrono::NaiveTime::MIN) - TimeDelta::days(30);

    let headers = Field::ALL
        .iter()
        .map(|field| field.column_name().to_string())
        .collect();

    let rows = (0..rows)
        .map(|_| {
            let when = base
                + TimeDelta::days(rng.random_range(0..=30))
                + TimeDelta::hours(rng.random_range(6..=22))
                + TimeDelta::minutes(rng.random_range(0..60));
            let error_type = DEMO_TYPES[rng.random_range(0..DEMO_TYPES.len())];
            let severity = severity_for(error_type, &mut rng);
            vec![
                Cell::DateTime(when),
                Cell::Text(error_type.to_string()),
                Cell::Text(severity.to_string()),
                Cell::Text(DEMO_MESSAGES[rng.random_range(0..DEMO_MESSAGES.len())].to_string()),
                Cell::Text(rng.random_range(100_000..=999_999_u32).to_string()),
                Cell::Text(DEMO_ENDPOINTS[rng.random_range(0..DEMO_ENDPOINTS.len())].to_string()),
            ]
        })
        .collect();

    RawTable { headers, rows }
}

fn severity_for(error_type: &str, rng: &mut StdRng) -> &'static str {
    match error_type {
        "ERROR_AUTENTICACION" | "ERROR_SERVIDOR" => "CRITICA",
        "TIMEOUT" => "ALTA",
        "DOCUMENTO_NO_ENCONTRADO" | "ESTUDIO_NO_DISPONIBLE" => "MEDIA",
        _ => DEMO_SEVERITIES[rng.random_range(0..DEMO_SEVERITIES.len())],
    }
}
